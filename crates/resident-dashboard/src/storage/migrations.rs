//! Schema versioning for the override store.
//!
//! The version lives in `SQLite`'s `user_version` pragma. A fresh file
//! reports 0.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::CREATE_LOCAL_STORAGE_TABLE;

/// The schema version this build writes.
pub const CURRENT_VERSION: i32 = 1;

/// Bring the store up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns [`Error::DatabaseMigration`] if the file was written by a newer
/// build, or a query error if a step fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let found = schema_version(conn)?;
    if found > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "store was written by a newer version (schema {found}, supported {CURRENT_VERSION})"
            ),
        });
    }

    for version in (found + 1)..=CURRENT_VERSION {
        apply(conn, version)?;
        conn.pragma_update(None, "user_version", version)?;
    }

    // Recreates the table if it was dropped by hand.
    conn.execute(CREATE_LOCAL_STORAGE_TABLE, [])?;
    Ok(())
}

fn schema_version(conn: &Connection) -> Result<i32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

fn apply(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => {
            conn.execute(CREATE_LOCAL_STORAGE_TABLE, [])?;
            Ok(())
        }
        _ => Err(Error::DatabaseMigration {
            message: format!("unknown migration version: {version}"),
        }),
    }
}
