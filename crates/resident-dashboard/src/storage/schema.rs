//! `SQLite` schema for the override store.
//!
//! The store mirrors browser local storage: one flat table of namespaced
//! keys holding serialized JSON values.

/// The key-value table.
pub const CREATE_LOCAL_STORAGE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    stored_at TEXT NOT NULL
)
";
