//! Credential storage.
//!
//! Passwords are stored and compared as plain text so existing `Users`
//! rows keep working. Anything beyond a single trusted workstation needs a
//! password hash here.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{LibraryError, Result};
use crate::models::Credentials;

use super::map_constraint;

pub fn create_user(conn: &Connection, credentials: &Credentials) -> Result<()> {
    conn.execute(
        "INSERT INTO Users (Username, Password) VALUES (?1, ?2)",
        params![credentials.username, credentials.password],
    )
    .map_err(|err| {
        map_constraint(err, || {
            LibraryError::Duplicate("Username already exists".to_string())
        })
    })?;
    Ok(())
}

/// Exact match on both columns.
pub fn credentials_match(conn: &Connection, credentials: &Credentials) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM Users WHERE Username = ?1 AND Password = ?2",
            params![credentials.username, credentials.password],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}
