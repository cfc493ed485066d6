//! Error types for the resident dashboard.
//!
//! This module defines all error types used throughout the crate, providing
//! enough context for log lines and user-facing messages alike.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for resident dashboard operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Load Errors ===
    /// The base document could not be read or requested.
    #[error("failed to load dashboard data from {location}: {message}")]
    Load {
        /// Path or URL of the base document.
        location: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The base document was served with a non-success status.
    #[error("failed to load dashboard data from {location} ({status})")]
    LoadStatus {
        /// URL of the base document.
        location: String,
        /// HTTP status code returned.
        status: u16,
    },

    /// The base document is not a valid dashboard record.
    #[error("failed to parse dashboard data from {location}: {source}")]
    LoadParse {
        /// Path or URL of the base document.
        location: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Storage Errors ===
    /// Failed to open or create the override database.
    #[error("failed to open override store at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// Persisting the override failed; any earlier override is untouched.
    #[error("could not save: {message}")]
    StorageWrite {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Editor Errors ===
    /// No event carries the given id.
    #[error("no event with id '{id}'")]
    EventNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A photo index is past the end of the photo list.
    #[error("photo index {index} is out of range (have {len})")]
    PhotoOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of photos in the record.
        len: usize,
    },

    /// The edited record failed validation.
    #[error("invalid record: {}", .issues.join("; "))]
    InvalidRecord {
        /// Every problem found.
        issues: Vec<String>,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for resident dashboard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a load error for the given location.
    #[must_use]
    pub fn load(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a storage write error.
    #[must_use]
    pub fn storage_write(message: impl Into<String>) -> Self {
        Self::StorageWrite {
            message: message.into(),
        }
    }

    /// Check if this error came from loading the base document.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::Load { .. } | Self::LoadStatus { .. } | Self::LoadParse { .. }
        )
    }

    /// Check if this error came from saving the override.
    #[must_use]
    pub fn is_storage_write(&self) -> bool {
        matches!(self, Self::StorageWrite { .. })
    }
}
