//! Saved extraction queries.

use crate::pool::{DbError, DbPool};
use rusqlite::{params, OptionalExtension};

/// Row from the extractions table.
#[derive(Debug, Clone)]
pub struct ExtractionRow {
    pub id: String,
    pub user_id: String,
    pub url: String,
    pub result_json: String,
    pub report_json: String,
    pub created_at: String,
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ExtractionRow> {
    Ok(ExtractionRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        url: row.get(2)?,
        result_json: row.get(3)?,
        report_json: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Create a new extraction entry. Returns the creation timestamp.
pub fn create_extraction(
    pool: &DbPool,
    id: &str,
    user_id: &str,
    url: &str,
    result_json: &str,
    report_json: &str,
) -> Result<String, DbError> {
    let created_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true);
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO extractions (id, user_id, url, result_json, report_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, user_id, url, result_json, report_json, created_at],
        )?;
        Ok(())
    })?;
    tracing::debug!(id, user_id, url, "Stored extraction");
    Ok(created_at)
}

/// Get a single extraction owned by `user_id`.
pub fn get_extraction(pool: &DbPool, user_id: &str, id: &str) -> Result<Option<ExtractionRow>, DbError> {
    pool.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT id, user_id, url, result_json, report_json, created_at
                 FROM extractions
                 WHERE user_id = ?1 AND id = ?2",
                params![user_id, id],
                map_row,
            )
            .optional()?;
        Ok(row)
    })
}

/// List all extractions for a user, most recent first.
pub fn list_extractions(pool: &DbPool, user_id: &str) -> Result<Vec<ExtractionRow>, DbError> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, user_id, url, result_json, report_json, created_at
             FROM extractions
             WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC"
        )?;

        let rows = stmt.query_map(params![user_id], map_row)?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(DbError::Connection)
    })
}

/// Delete an extraction owned by `user_id`.
pub fn delete_extraction(pool: &DbPool, user_id: &str, id: &str) -> Result<(), DbError> {
    pool.with_conn(|conn| {
        let affected = conn.execute(
            "DELETE FROM extractions WHERE user_id = ?1 AND id = ?2",
            params![user_id, id],
        )?;
        if affected == 0 {
            return Err(DbError::NotFound(format!("Extraction: {}", id)));
        }
        Ok(())
    })
}
