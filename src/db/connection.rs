use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;

/// Open a connection to the database file and enable foreign keys. SQLite
/// scopes the pragma to the connection, so every caller goes through here to
/// get the same referential checks.
pub fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    Ok(conn)
}

/// Create the database file (and its directory) if needed and make sure all
/// four tables exist. Safe to call on every launch.
pub fn ensure_schema(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let conn = open_connection(path)?;
    create_tables(&conn)?;
    debug!(path = %path.display(), "schema ready");
    Ok(())
}

/// Table names and column casing follow the on-disk format other tools
/// already read, so they stay exactly as written here.
pub(crate) fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS Books (
            BookID TEXT PRIMARY KEY,
            Title TEXT,
            Author TEXT,
            Status TEXT DEFAULT 'Available'
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Borrowers (
            BorrowerID TEXT PRIMARY KEY,
            LastName TEXT,
            FirstName TEXT,
            MiddleName TEXT,
            Course TEXT,
            ContactNumber TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Borrow (
            BookID TEXT,
            BorrowerID TEXT,
            BorrowDate TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (BookID, BorrowerID),
            FOREIGN KEY (BookID) REFERENCES Books(BookID),
            FOREIGN KEY (BorrowerID) REFERENCES Borrowers(BorrowerID)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Users (
            Username TEXT PRIMARY KEY,
            Password TEXT
        )",
        [],
    )?;

    Ok(())
}

/// In-memory database with the full schema, for query-level tests.
#[cfg(test)]
pub(crate) fn open_in_memory() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory database");
    conn.execute("PRAGMA foreign_keys = ON", [])
        .expect("enable foreign keys");
    create_tables(&conn).expect("create tables");
    conn
}
