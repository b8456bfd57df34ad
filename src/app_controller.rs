use anyhow::{anyhow, Result, Context};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn, info, debug};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, FailurePolicy};
use crate::blocks::BlockSequence;
use crate::document::Document;
use crate::errors::AppError;
use crate::file_utils::{FileManager, TrackingRules};
use crate::hashes::HashStore;
use crate::translation::{LinkRewriter, MarkupBridge, MergeEngine};

// @module: Repository synchronization controller

/// Outcome of a repository run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Tracked source files synchronized without error
    pub processed: usize,
    /// Translated files whose content changed, all languages together
    pub translated: usize,
    /// Source files skipped after an error
    pub failed: usize,
    /// Translated files removed because their source is gone
    pub removed: usize,
}

/// Inventory of one destination language
struct LanguageTree {
    language: String,
    root: PathBuf,
    store: HashStore,
}

/// Main application controller for repository synchronization
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Engine and converter round trip
    bridge: MarkupBridge,
    // @field: Link rewriting of fresh translations
    links: LinkRewriter,
    // @field: Tracked file selection
    rules: TrackingRules,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let bridge = MarkupBridge::from_config(&config).context("Failed to set up the translation engine")?;
        Self::with_bridge(config, bridge)
    }

    /// Create a controller around an already built bridge
    pub fn with_bridge(config: Config, bridge: MarkupBridge) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let links = LinkRewriter::from_config(&config);
        let rules = TrackingRules::new(config.managed_extension(), &config.include_files, &config.exclude_files);

        Ok(Self { config, bridge, links, rules })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn source_language(&self) -> Option<&str> {
        let language = self.config.source_language.trim();
        (!language.is_empty()).then_some(language)
    }

    /// Synchronize every destination language tree with the source tree
    pub async fn sync<P1: AsRef<Path>, P2: AsRef<Path>>(&self, source: P1, destination: P2) -> Result<SyncReport> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(source.as_ref()) {
            return Err(anyhow!("Source directory does not exist: {:?}", source.as_ref()));
        }
        FileManager::ensure_dir(destination.as_ref())?;

        let source = source.as_ref().canonicalize()
            .with_context(|| format!("Failed to resolve source directory: {:?}", source.as_ref()))?;
        let destination = destination.as_ref().canonicalize()
            .with_context(|| format!("Failed to resolve destination directory: {:?}", destination.as_ref()))?;

        let trees = self.open_trees(&destination)?;
        let skip = destination.starts_with(&source).then_some(destination.as_path());
        let tracked = self.rules.discover(&source, skip)?;
        debug!("{} tracked file(s) in {:?}", tracked.len(), source);

        let mut report = SyncReport::default();

        if self.config.keep_clean {
            report.removed = self.clean(&tracked, &trees)?;
        }

        let progress_bar = ProgressBar::new(tracked.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        for relative in &tracked {
            let key = FileManager::relative_key("", relative)?;
            progress_bar.set_message(key.clone());

            match self.sync_file(&source, relative, &key, &trees).await {
                Ok(translated) => {
                    report.processed += 1;
                    report.translated += translated;
                }
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::Abort => {
                        progress_bar.abandon_with_message("Synchronization aborted");
                        return Err(anyhow!("Failed to synchronize {}: {}", key, e));
                    }
                    FailurePolicy::Skip => {
                        error!("Failed to synchronize {}: {}", key, e);
                        report.failed += 1;
                    }
                },
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();

        info!(
            "Synchronization completed in {}: {} processed, {} translated, {} failed, {} removed",
            Self::format_duration(start_time.elapsed()),
            report.processed,
            report.translated,
            report.failed,
            report.removed
        );

        Ok(report)
    }

    fn open_trees(&self, destination: &Path) -> Result<Vec<LanguageTree>> {
        self.config
            .destination_languages
            .iter()
            .map(|language| {
                let root = destination.join(language);
                FileManager::ensure_dir(&root)?;
                let store = HashStore::open(self.config.versioning, &root)
                    .map_err(|e| anyhow!("Failed to open hash inventory of {:?}: {}", root, e))?;
                Ok(LanguageTree { language: language.clone(), root, store })
            })
            .collect()
    }

    /// Synchronize one source file in every language, returns the number of changed outputs
    async fn sync_file(
        &self,
        source: &Path,
        relative: &Path,
        key: &str,
        trees: &[LanguageTree],
    ) -> Result<usize, AppError> {
        let mut document = Document::load(source.join(relative))?;
        document.standardize(self.bridge.converter())?;
        let source_blocks = document.sequence();

        let results = stream::iter(trees)
            .map(|tree| async move {
                let result = self.sync_language(source_blocks, tree, relative, key).await;
                (tree.language.as_str(), result)
            })
            .buffer_unordered(self.config.translation.concurrent_requests)
            .collect::<Vec<_>>()
            .await;

        let mut translated = 0;
        let mut first_error = None;
        for (language, result) in results {
            match result {
                Ok(true) => translated += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!("{} failed for {}: {}", language, key, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(translated),
        }
    }

    /// Update the translation of one file in one language
    async fn sync_language(
        &self,
        source_blocks: &BlockSequence,
        tree: &LanguageTree,
        relative: &Path,
        key: &str,
    ) -> Result<bool, AppError> {
        let path = tree.root.join(relative);
        let mut target = Document::load_restored(&path, &tree.store, key)?;

        let merge = MergeEngine::new(&self.bridge, &self.links, self.config.translation.per_block);
        merge
            .update(target.sequence_mut(), source_blocks, &tree.language, self.source_language())
            .await?;

        let updated = target.is_updated();
        if self.config.verbose && updated {
            info!("{} translated: {}", tree.language, key);
        }

        target.save(&tree.store, key)?;
        Ok(updated)
    }

    /// Remove translated files whose source is no longer tracked, then empty directories
    fn clean(&self, tracked: &BTreeSet<PathBuf>, trees: &[LanguageTree]) -> Result<usize> {
        let mut removed = 0;

        for tree in trees {
            let existing = self.rules.discover(&tree.root, None)?;
            for relative in existing.difference(tracked) {
                let key = FileManager::relative_key("", relative)?;
                Document::delete(tree.root.join(relative), &tree.store, &key)
                    .map_err(|e| anyhow!("Failed to remove {:?}: {}", tree.root.join(relative), e))?;
                debug!("{} removed: {}", tree.language, key);
                removed += 1;
            }

            FileManager::remove_empty_dirs(&tree.root)?;
        }

        Ok(removed)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
