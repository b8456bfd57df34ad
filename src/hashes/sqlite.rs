/*!
 * Hash inventory stored in a SQLite table.
 *
 * One row per document: `hashes (path TEXT PRIMARY KEY, identities TEXT)`,
 * where `identities` holds the JSON-encoded array of fingerprints.
 */

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};

use crate::blocks::BlockHash;
use crate::errors::AppError;

/// Default database filename inside a destination root
pub const SQL_INVENTORY_FILENAME: &str = "hashes.db";

/// Relational inventory with thread-safe access to the connection
#[derive(Clone, Debug)]
pub struct SqlHashStore {
    db_path: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl SqlHashStore {
    /// Open (or create) the inventory database of a destination root
    pub fn open<P: AsRef<Path>>(folder: P) -> Result<Self, AppError> {
        let db_path = folder.as_ref().join(SQL_INVENTORY_FILENAME);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening hash inventory database at: {:?}", db_path);
        let conn = Connection::open(&db_path)?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory inventory (for testing)
    pub fn open_in_memory() -> Result<Self, AppError> {
        debug!("Creating in-memory hash inventory");
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), AppError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS hashes (
                path TEXT PRIMARY KEY,
                identities TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn execute<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Connection) -> Result<T, AppError>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| AppError::Inventory(format!("Failed to acquire database lock: {}", e)))?;

        f(&conn)
    }

    pub fn set(&self, key: &str, hashes: &[BlockHash]) -> Result<(), AppError> {
        let encoded = serde_json::to_string(hashes)?;
        self.execute(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO hashes (path, identities) VALUES (?1, ?2)",
                params![key, encoded],
            )?;
            Ok(())
        })
    }

    pub fn get(&self, key: &str) -> Result<Option<Vec<BlockHash>>, AppError> {
        self.execute(|conn| {
            let encoded: Option<String> = conn
                .query_row(
                    "SELECT identities FROM hashes WHERE path = ?1",
                    [key],
                    |row| row.get(0),
                )
                .optional()?;

            match encoded {
                Some(encoded) => Ok(Some(serde_json::from_str(&encoded)?)),
                None => Ok(None),
            }
        })
    }

    pub fn delete(&self, key: &str) -> Result<(), AppError> {
        self.execute(|conn| {
            conn.execute("DELETE FROM hashes WHERE path = ?1", [key])?;
            Ok(())
        })
    }
}
