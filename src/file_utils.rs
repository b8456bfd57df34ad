use anyhow::{Result, Context};
use std::collections::BTreeSet;
use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to file: {:?}", path))?;
        writer.flush()
            .with_context(|| format!("Failed to flush file: {:?}", path))?;

        Ok(())
    }

    /// Remove a file if it exists
    pub fn remove_file<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if Self::file_exists(path) {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove file: {:?}", path))?;
        }
        Ok(())
    }

    /// Inventory key of a path: relative to `root`, '/' separated
    pub fn relative_key<P1: AsRef<Path>, P2: AsRef<Path>>(root: P1, path: P2) -> Result<String> {
        let relative = path.as_ref().strip_prefix(root.as_ref())
            .with_context(|| format!("{:?} is not under {:?}", path.as_ref(), root.as_ref()))?;
        Ok(path_segments(relative).join("/"))
    }

    /// Remove every empty directory below `root`, deepest first
    ///
    /// `root` itself is kept. Returns the number of removed directories.
    pub fn remove_empty_dirs<P: AsRef<Path>>(root: P) -> Result<usize> {
        let root = root.as_ref();
        let mut removed = 0;

        for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
            let entry = entry.context("Failed to read directory entry")?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let is_empty = fs::read_dir(entry.path())
                .with_context(|| format!("Failed to list directory: {:?}", entry.path()))?
                .next()
                .is_none();
            if is_empty {
                fs::remove_dir(entry.path())
                    .with_context(|| format!("Failed to remove directory: {:?}", entry.path()))?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}

/// Normal components of a path as strings
fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().to_string()),
            _ => None,
        })
        .collect()
}

/// Selection of the files managed in a source tree
#[derive(Debug, Clone)]
pub struct TrackingRules {
    extension: String,
    include: Vec<Vec<String>>,
    exclude: Vec<Vec<String>>,
}

impl TrackingRules {
    pub fn new(extension: &str, include: &[String], exclude: &[String]) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            include: include.iter().map(|rule| rule_segments(rule)).filter(|rule| !rule.is_empty()).collect(),
            exclude: exclude.iter().map(|rule| rule_segments(rule)).filter(|rule| !rule.is_empty()).collect(),
        }
    }

    /// Whether a relative path is tracked
    ///
    /// A rule matches when its segments equal a contiguous run of the path's
    /// segments, so "drafts" excludes "a/drafts/b.md" and "a/b.md" includes
    /// "x/a/b.md".
    pub fn is_tracked<P: AsRef<Path>>(&self, relative: P) -> bool {
        let relative = relative.as_ref();
        let segments = path_segments(relative);
        if segments.is_empty() {
            return false;
        }

        let has_extension = relative
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false);
        let included = has_extension || self.include.iter().any(|rule| window_matches(&segments, rule));

        included && !self.exclude.iter().any(|rule| window_matches(&segments, rule))
    }

    /// Relative paths of every tracked file under `root`, sorted
    ///
    /// Anything under `skip` (the destination tree when it lives inside the
    /// source) is ignored.
    pub fn discover<P: AsRef<Path>>(&self, root: P, skip: Option<&Path>) -> Result<BTreeSet<PathBuf>> {
        let root = root.as_ref();
        let mut tracked = BTreeSet::new();

        let walker = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| skip.map_or(true, |skip| !entry.path().starts_with(skip)));

        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(root)
                .with_context(|| format!("{:?} is not under {:?}", entry.path(), root))?;
            if self.is_tracked(relative) {
                tracked.insert(relative.to_path_buf());
            }
        }

        Ok(tracked)
    }
}

fn rule_segments(rule: &str) -> Vec<String> {
    rule.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .map(str::to_string)
        .collect()
}

fn window_matches(segments: &[String], rule: &[String]) -> bool {
    rule.len() <= segments.len() && segments.windows(rule.len()).any(|window| window == rule)
}
