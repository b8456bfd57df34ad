/*!
 * Hash inventories for identity continuity across synchronization runs.
 *
 * A translated file keeps the fingerprints of the source blocks it was built
 * from. The inventory records, per relative path, the ordered list of those
 * fingerprints so the next run can map the translated blocks back onto the
 * source identity space.
 *
 * - `json`: single JSON document per destination root
 * - `sqlite`: SQLite table per destination root
 */

pub mod json;
pub mod sqlite;

use std::path::Path;

use crate::app_config::VersioningMode;
use crate::blocks::BlockHash;
use crate::errors::AppError;

pub use self::json::JsonHashStore;
pub use self::sqlite::SqlHashStore;

/// Inventory variants, selected once from the configuration
#[derive(Debug)]
pub enum HashStore {
    /// Identity tracking disabled: nothing is recorded, every run retranslates
    Disabled,
    /// JSON document store
    Json(JsonHashStore),
    /// Relational store
    Sql(SqlHashStore),
}

impl HashStore {
    /// Open the inventory of a destination root for the configured mode
    pub fn open<P: AsRef<Path>>(mode: VersioningMode, folder: P) -> Result<Self, AppError> {
        Ok(match mode {
            VersioningMode::Disabled => HashStore::Disabled,
            VersioningMode::Json => HashStore::Json(JsonHashStore::open(folder)?),
            VersioningMode::Sql => HashStore::Sql(SqlHashStore::open(folder)?),
        })
    }

    /// Record the ordered identities of a document
    pub fn set(&self, key: &str, hashes: &[BlockHash]) -> Result<(), AppError> {
        match self {
            HashStore::Disabled => Ok(()),
            HashStore::Json(store) => store.set(key, hashes),
            HashStore::Sql(store) => store.set(key, hashes),
        }
    }

    /// Ordered identities recorded for a document, if any
    pub fn get(&self, key: &str) -> Result<Option<Vec<BlockHash>>, AppError> {
        match self {
            HashStore::Disabled => Ok(None),
            HashStore::Json(store) => Ok(store.get(key)),
            HashStore::Sql(store) => store.get(key),
        }
    }

    /// Forget the identities of a document
    pub fn delete(&self, key: &str) -> Result<(), AppError> {
        match self {
            HashStore::Disabled => Ok(()),
            HashStore::Json(store) => store.delete(key),
            HashStore::Sql(store) => store.delete(key),
        }
    }

    pub fn mode(&self) -> VersioningMode {
        match self {
            HashStore::Disabled => VersioningMode::Disabled,
            HashStore::Json(_) => VersioningMode::Json,
            HashStore::Sql(_) => VersioningMode::Sql,
        }
    }
}
