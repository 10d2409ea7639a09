//! Saved extractions.
//!
//! Each extraction is stored once per user under an opaque UUID with its
//! consistency report; both are serialized as JSON.

use serde::{Deserialize, Serialize};
use tokenscope_db::queries::extractions::{self as queries, ExtractionRow};
use tokenscope_db::{DbError, DbPool};
use tracing::info;

use crate::compare::{compare_extractions, ComparisonResult};
use crate::consistency::ConsistencyReport;
use crate::error::{ScopeError, ScopeResult};
use crate::extraction::ExtractionResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedExtraction {
    pub id: String,
    pub user_id: String,
    pub url: String,
    pub result: ExtractionResult,
    pub report: ConsistencyReport,
    pub created_at: String,
}

impl SavedExtraction {
    fn from_row(row: ExtractionRow) -> ScopeResult<Self> {
        Ok(Self {
            result: serde_json::from_str(&row.result_json)?,
            report: serde_json::from_str(&row.report_json)?,
            id: row.id,
            user_id: row.user_id,
            url: row.url,
            created_at: row.created_at,
        })
    }
}

/// Persist an extraction and its report. Returns the saved record.
pub fn save_extraction(
    pool: &DbPool,
    user_id: &str,
    result: &ExtractionResult,
    report: &ConsistencyReport,
) -> ScopeResult<SavedExtraction> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = queries::create_extraction(
        pool,
        &id,
        user_id,
        &result.url,
        &serde_json::to_string(result)?,
        &serde_json::to_string(report)?,
    )?;
    info!(id = %id, url = %result.url, "Saved extraction");

    Ok(SavedExtraction {
        id,
        user_id: user_id.to_string(),
        url: result.url.clone(),
        result: result.clone(),
        report: report.clone(),
        created_at,
    })
}

pub fn get_extraction(pool: &DbPool, user_id: &str, id: &str) -> ScopeResult<SavedExtraction> {
    queries::get_extraction(pool, user_id, id)?
        .ok_or_else(|| ScopeError::ExtractionNotFound(id.to_string()))
        .and_then(SavedExtraction::from_row)
}

/// All extractions for `user_id`, most recent first.
pub fn list_extractions(pool: &DbPool, user_id: &str) -> ScopeResult<Vec<SavedExtraction>> {
    queries::list_extractions(pool, user_id)?
        .into_iter()
        .map(SavedExtraction::from_row)
        .collect()
}

pub fn delete_extraction(pool: &DbPool, user_id: &str, id: &str) -> ScopeResult<()> {
    match queries::delete_extraction(pool, user_id, id) {
        Err(DbError::NotFound(_)) => Err(ScopeError::ExtractionNotFound(id.to_string())),
        other => Ok(other?),
    }
}

/// Resolve two saved extractions and diff `id_b` against `id_a`.
pub fn compare_saved(
    pool: &DbPool,
    user_id: &str,
    id_a: &str,
    id_b: &str,
) -> ScopeResult<(SavedExtraction, SavedExtraction, ComparisonResult)> {
    let a = get_extraction(pool, user_id, id_a)?;
    let b = get_extraction(pool, user_id, id_b)?;
    let comparison = compare_extractions(&a.result, &b.result);
    Ok((a, b, comparison))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::score_consistency_heuristic;
    use crate::miner::parse_css;
    use crate::naming::name_tokens_heuristic;
    use tokenscope_db::init_memory_pool;

    fn sample(url: &str, css: &str) -> (ExtractionResult, ConsistencyReport) {
        let result = name_tokens_heuristic(&parse_css(css), url);
        let report = score_consistency_heuristic(&result);
        (result, report)
    }

    #[test]
    fn test_save_get_round_trip() {
        let pool = init_memory_pool().unwrap();
        let (result, report) = sample("https://a.test", "a { color: #123456; padding: 4px }");
        let saved = save_extraction(&pool, "alice", &result, &report).unwrap();

        let loaded = get_extraction(&pool, "alice", &saved.id).unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.result.colors[0].hex, "#123456");
    }

    #[test]
    fn test_missing_and_foreign_ids_are_not_found() {
        let pool = init_memory_pool().unwrap();
        let (result, report) = sample("https://a.test", "a { color: #123456 }");
        let saved = save_extraction(&pool, "alice", &result, &report).unwrap();

        assert!(matches!(
            get_extraction(&pool, "bob", &saved.id),
            Err(ScopeError::ExtractionNotFound(_))
        ));
        assert!(matches!(
            delete_extraction(&pool, "alice", "nope"),
            Err(ScopeError::ExtractionNotFound(_))
        ));
    }

    #[test]
    fn test_list_and_delete() {
        let pool = init_memory_pool().unwrap();
        let (r1, p1) = sample("https://a.test", "a { color: #111111 }");
        let (r2, p2) = sample("https://b.test", "a { color: #222222 }");
        let first = save_extraction(&pool, "alice", &r1, &p1).unwrap();
        let second = save_extraction(&pool, "alice", &r2, &p2).unwrap();

        let ids: Vec<String> = list_extractions(&pool, "alice")
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);

        delete_extraction(&pool, "alice", &first.id).unwrap();
        assert_eq!(list_extractions(&pool, "alice").unwrap().len(), 1);
    }

    #[test]
    fn test_compare_saved() {
        let pool = init_memory_pool().unwrap();
        let (r1, p1) = sample("https://a.test", "a { color: #FF0000; margin: 8px }");
        let a = save_extraction(&pool, "alice", &r1, &p1).unwrap();

        let (_, _, cmp) = compare_saved(&pool, "alice", &a.id, &a.id).unwrap();
        assert_eq!(cmp.drift.overall, 100);

        assert!(matches!(
            compare_saved(&pool, "alice", &a.id, "missing"),
            Err(ScopeError::ExtractionNotFound(id)) if id == "missing"
        ));
    }
}
