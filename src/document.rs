/*!
 * Markdown documents on disk.
 *
 * A document is a block sequence plus the file it was read from. Translated
 * documents get their identities back from the hash inventory of their
 * language root when loaded, and record them again when saved.
 */

use std::path::{Path, PathBuf};

use log::debug;

use crate::blocks::BlockSequence;
use crate::errors::{AppError, TranslationError};
use crate::file_utils::FileManager;
use crate::hashes::HashStore;
use crate::markdown;
use crate::translation::MarkupConverter;

/// A block sequence bound to an optional file
#[derive(Debug, Clone, Default)]
pub struct Document {
    sequence: BlockSequence,
    path: Option<PathBuf>,
    loaded: String,
}

impl Document {
    /// Build a document from Markdown text, not bound to any file
    pub fn from_text(text: &str) -> Self {
        let sequence = BlockSequence::split(text);
        let loaded = sequence.render();
        Self { sequence, path: None, loaded }
    }

    /// Read a document; a missing file gives an empty document bound to `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let mut document = if FileManager::file_exists(path) {
            Self::from_text(&FileManager::read_to_string(path)?)
        } else {
            debug!("{:?} does not exist yet, starting from an empty document", path);
            Self::default()
        };
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    /// Read a translated document and restore the identities recorded for `key`
    ///
    /// Without a record the identities stay the fingerprints of the
    /// translated content. A record left behind by a deleted file is ignored
    /// and gets replaced on the next save. A record that does not line up
    /// with the blocks of an existing file is an error.
    pub fn load_restored<P: AsRef<Path>>(path: P, store: &HashStore, key: &str) -> Result<Self, AppError> {
        let path = path.as_ref();
        let mut document = Self::load(path)?;
        if let Some(identities) = store.get(key)? {
            if FileManager::file_exists(path) {
                document.sequence.remap(&identities)?;
            } else {
                debug!("Ignoring inventory record of missing file {:?}", path);
            }
        }
        Ok(document)
    }

    /// Normalize the Markdown through an HTML round trip
    ///
    /// Source documents are standardized so their blocks hash the same way
    /// translated documents do after conversion.
    pub fn standardize(&mut self, converter: &dyn MarkupConverter) -> Result<(), TranslationError> {
        if self.sequence.is_empty() {
            return Ok(());
        }
        let html = markdown::to_html(&self.sequence.render(), false);
        self.sequence = BlockSequence::split(&converter.convert(&html)?);
        Ok(())
    }

    /// Write the document to its file and record its identities under `key`
    pub fn save(&mut self, store: &HashStore, key: &str) -> Result<(), AppError> {
        let path = self.path.clone()
            .ok_or_else(|| AppError::File("Document has no file to save to".to_string()))?;
        self.save_as(path, store, key)
    }

    /// Write the document to `path` and record its identities under `key`
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P, store: &HashStore, key: &str) -> Result<(), AppError> {
        let path = path.as_ref();
        let rendered = self.sequence.render();
        FileManager::write_to_file(path, &format!("{}\n", rendered))?;
        store.set(key, self.sequence.hashes())?;

        self.path = Some(path.to_path_buf());
        self.loaded = rendered;
        Ok(())
    }

    /// Remove a document file and its inventory record
    pub fn delete<P: AsRef<Path>>(path: P, store: &HashStore, key: &str) -> Result<(), AppError> {
        FileManager::remove_file(path)?;
        store.delete(key)
    }

    /// Whether the rendered content differs from what was loaded or last saved
    pub fn is_updated(&self) -> bool {
        self.sequence.render() != self.loaded
    }

    pub fn sequence(&self) -> &BlockSequence {
        &self.sequence
    }

    pub fn sequence_mut(&mut self) -> &mut BlockSequence {
        &mut self.sequence
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sequence)
    }
}
