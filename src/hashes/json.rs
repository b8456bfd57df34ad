/*!
 * Hash inventory stored in a single JSON document.
 */

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use parking_lot::Mutex;

use crate::blocks::BlockHash;
use crate::errors::AppError;

/// Default inventory filename inside a destination root
pub const JSON_INVENTORY_FILENAME: &str = "hashes.json";

/// File-backed inventory: a JSON object mapping paths to identity arrays
#[derive(Debug)]
pub struct JsonHashStore {
    path: PathBuf,
    data: Mutex<BTreeMap<String, Vec<BlockHash>>>,
}

impl JsonHashStore {
    /// Open the inventory of a destination root, loading any previous content
    pub fn open<P: AsRef<Path>>(folder: P) -> Result<Self, AppError> {
        Self::open_file(folder.as_ref().join(JSON_INVENTORY_FILENAME))
    }

    /// Open an inventory at an explicit file path
    pub fn open_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        debug!("Opened JSON hash inventory at {:?} ({} entries)", path, data.len());

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// Location of the inventory file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set(&self, key: &str, hashes: &[BlockHash]) -> Result<(), AppError> {
        let mut data = self.data.lock();
        data.insert(key.to_string(), hashes.to_vec());
        self.save(&data)
    }

    pub fn get(&self, key: &str) -> Option<Vec<BlockHash>> {
        self.data.lock().get(key).cloned()
    }

    pub fn delete(&self, key: &str) -> Result<(), AppError> {
        let mut data = self.data.lock();
        if data.remove(key).is_some() {
            self.save(&data)?;
        }
        Ok(())
    }

    // Caller holds the lock
    fn save(&self, data: &BTreeMap<String, Vec<BlockHash>>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, data)?;
        writer.flush()?;
        Ok(())
    }
}
