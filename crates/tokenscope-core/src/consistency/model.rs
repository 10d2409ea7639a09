//! Consistency report model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Score and findings for one token category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyMetric {
    pub category: String,
    /// 0-100, may be fractional.
    pub score: f64,
    /// Aggregate occurrence count across the category's tokens.
    pub total: usize,
    /// Number of distinct tokens.
    pub unique: usize,
    pub issues: Vec<String>,
    pub recommendation: String,
}

/// Design-system consistency summary for one extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    /// Mean of the category scores, rounded.
    pub overall_score: u32,
    pub grade: String,
    pub metrics: Vec<ConsistencyMetric>,
    pub top_issues: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ConsistencyReport {
    /// Look up a category metric by its display name (case-insensitive).
    pub fn metric(&self, category: &str) -> Option<&ConsistencyMetric> {
        self.metrics
            .iter()
            .find(|m| m.category.eq_ignore_ascii_case(category))
    }
}
