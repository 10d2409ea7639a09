//! Tokenscope Database Layer
//!
//! SQLite persistence for saved extractions. Rows are opaque to this crate:
//! the extraction result and consistency report are stored as JSON text and
//! decoded by `tokenscope-core`.

pub mod migrations;
pub mod pool;
pub mod queries;

pub use pool::{DbError, DbPool, DbResult};

use std::path::Path;

/// Open the database at `path` and bring its schema up to date.
pub fn init_pool(path: &Path) -> DbResult<DbPool> {
    let pool = DbPool::open(path)?;
    migrations::run_migrations(&pool)?;
    Ok(pool)
}

/// Open a migrated in-memory database.
pub fn init_memory_pool() -> DbResult<DbPool> {
    let pool = DbPool::in_memory()?;
    migrations::run_migrations(&pool)?;
    Ok(pool)
}
