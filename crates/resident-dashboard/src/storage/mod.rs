//! Local override store.
//!
//! This module provides `SQLite`-backed persistence for admin edits. It
//! behaves like browser local storage: a flat map of namespaced keys to JSON
//! text, where the dashboard uses a single key for its override record.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{DashboardRecord, RecordOverride};

/// Namespaced key holding the serialized override record.
pub const OVERRIDE_KEY: &str = "residentDashboard.override.v1";

/// Default cap on a single stored value, matching typical browser quotas.
pub const DEFAULT_MAX_VALUE_BYTES: usize = 5 * 1024 * 1024;

/// Persistent key-value store for the admin override.
///
/// Reads of the override never fail: a missing, unreadable or corrupt value
/// is reported as "no override" so the base data always displays. Writes are
/// a single upsert statement, so a failed save leaves the previous value in
/// place.
#[derive(Debug)]
pub struct OverrideStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Largest value `set_item` accepts, in bytes.
    max_value_bytes: usize,
}

/// Metadata about the stored override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideInfo {
    /// When the value was last written.
    pub stored_at: Option<DateTime<Utc>>,
    /// Size of the serialized value in bytes.
    pub size_bytes: usize,
    /// Whether the value parses as an override record.
    pub readable: bool,
}

impl OverrideStore {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening override store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path,
            conn,
            max_value_bytes: DEFAULT_MAX_VALUE_BYTES,
        })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            max_value_bytes: DEFAULT_MAX_VALUE_BYTES,
        })
    }

    /// Set the per-value size limit.
    #[must_use]
    pub fn with_max_value_bytes(mut self, max_value_bytes: usize) -> Self {
        self.max_value_bytes = max_value_bytes;
        self
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the value exceeds the size limit or
    /// the database rejects the write.
    pub fn set_item(&self, key: &str, value: &str, now: DateTime<Utc>) -> Result<()> {
        if value.len() > self.max_value_bytes {
            return Err(Error::storage_write(format!(
                "value for '{key}' is {} bytes, over the {} byte limit",
                value.len(),
                self.max_value_bytes
            )));
        }

        self.conn
            .execute(
                r"
                INSERT INTO local_storage (key, value, stored_at) VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, stored_at = excluded.stored_at
                ",
                params![key, value, now.to_rfc3339()],
            )
            .map_err(|e| Error::storage_write(e.to_string()))?;

        debug!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }

    /// Remove the value under `key`.
    ///
    /// Returns `true` if a value was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn remove_item(&self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?1", [key])?;
        Ok(affected > 0)
    }

    /// Read the persisted override.
    ///
    /// Returns `None` when nothing is stored or the stored value cannot be
    /// read or parsed.
    #[must_use]
    pub fn read_override(&self) -> Option<RecordOverride> {
        let raw = match self.get_item(OVERRIDE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Ignoring override store: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                warn!("Ignoring unreadable override: {}", e);
                None
            }
        }
    }

    /// Persist `record` in full as the override, stamped with `now`.
    ///
    /// Returns the record as stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the record cannot be saved.
    pub fn write_override(
        &self,
        record: &DashboardRecord,
        now: DateTime<Utc>,
    ) -> Result<DashboardRecord> {
        let mut stamped = record.clone();
        stamped.updated_at = Some(now);

        let json = serde_json::to_string(&stamped).map_err(|e| Error::storage_write(e.to_string()))?;
        self.set_item(OVERRIDE_KEY, &json, now)?;

        info!(
            events = stamped.events.len(),
            photos = stamped.photos.len(),
            "Saved dashboard override"
        );
        Ok(stamped)
    }

    /// Remove the persisted override.
    ///
    /// Returns `true` if an override was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear_override(&self) -> Result<bool> {
        let removed = self.remove_item(OVERRIDE_KEY)?;
        if removed {
            info!("Cleared dashboard override");
        }
        Ok(removed)
    }

    /// BLAKE3 hash of the raw stored override, used to notice changes made
    /// by another process.
    #[must_use]
    pub fn fingerprint(&self) -> Option<String> {
        match self.get_item(OVERRIDE_KEY) {
            Ok(raw) => raw.map(|raw| blake3::hash(raw.as_bytes()).to_hex().to_string()),
            Err(e) => {
                warn!("Cannot fingerprint override store: {}", e);
                None
            }
        }
    }

    /// Describe the stored override, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn info(&self) -> Result<Option<OverrideInfo>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT value, stored_at FROM local_storage WHERE key = ?1",
                [OVERRIDE_KEY],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(row.map(|(value, stored_at)| OverrideInfo {
            stored_at: DateTime::parse_from_rfc3339(&stored_at)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            size_bytes: value.len(),
            readable: serde_json::from_str::<RecordOverride>(&value).is_ok(),
        }))
    }
}
