//! SQLite connection pool.
//!
//! A single connection behind a mutex. The CLI is the only writer, so
//! there is no need for a real multi-connection pool.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use thiserror::Error;
use tracing::debug;

/// Database error types.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Connection(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection lock poisoned")]
    Poisoned,
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Shared handle to the extraction database.
pub struct DbPool {
    conn: Mutex<Connection>,
}

impl DbPool {
    /// Open (or create) a database file, creating parent directories as needed.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %path.display(), "Opening database");
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open a private in-memory database. Used by tests.
    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Run a closure with a shared borrow of the connection.
    pub fn with_conn<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.conn.lock().map_err(|_| DbError::Poisoned)?;
        f(&conn)
    }

    /// Run a closure with a mutable borrow of the connection (migrations, transactions).
    pub fn with_conn_mut<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T>,
    {
        let mut conn = self.conn.lock().map_err(|_| DbError::Poisoned)?;
        f(&mut conn)
    }
}
