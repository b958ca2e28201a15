//! Database connection management
//!
//! Provides utilities for opening and managing SQLite connections

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection: WAL journal, and a busy timeout so a second
/// process writing the same file waits instead of failing at once
pub fn configure(conn: &Connection) -> Result<()> {
    // journal_mode returns a row, so it cannot go through `execute`
    conn.execute_batch("PRAGMA journal_mode = WAL;")
        .map_err(from_rusqlite)?;

    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(from_rusqlite)?;

    Ok(())
}
