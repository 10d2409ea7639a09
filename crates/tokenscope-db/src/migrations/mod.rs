//! Versioned schema migrations.
//!
//! Each step is applied once and recorded in SQLite's `user_version`, so new
//! steps go at the end of [`migrations`] and existing ones are never edited.

use rusqlite_migration::{Migrations, M};
use tracing::debug;

use crate::pool::{DbError, DbPool, DbResult};

const EXTRACTIONS: &str = include_str!("001_extractions.sql");
const EXTRACTIONS_USER_INDEX: &str = include_str!("002_extractions_user_index.sql");

/// Number of migration steps shipped with this build.
pub const SCHEMA_VERSION: i64 = 2;

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(EXTRACTIONS), M::up(EXTRACTIONS_USER_INDEX)])
}

/// Apply any pending migrations.
pub fn run_migrations(pool: &DbPool) -> DbResult<()> {
    pool.with_conn_mut(|conn| {
        migrations()
            .to_latest(conn)
            .map_err(|e| DbError::Migration(e.to_string()))
    })?;
    debug!(version = schema_version(pool)?, "Database schema up to date");
    Ok(())
}

/// Schema version recorded in the database.
pub fn schema_version(pool: &DbPool) -> DbResult<i64> {
    pool.with_conn(|conn| Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?))
}
