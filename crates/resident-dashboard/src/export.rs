//! Export of the merged record.
//!
//! The file is the record's two-space-indented JSON with no trailing
//! newline, ready to replace the bundled base document.

use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::record::DashboardRecord;

/// Default export file name.
pub const DEFAULT_EXPORT_FILE: &str = "dashboard.json";

/// Write `record` to `path`, creating parent directories as needed.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized or the file cannot be written.
pub fn export_record(record: &DashboardRecord, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let json = record.to_pretty_json()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    std::fs::write(path, json.as_bytes())?;
    info!("Exported dashboard record to {}", path.display());
    Ok(json.len())
}
