//! CSS text to named, scored tokens.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consistency::{ConsistencyReport, ConsistencyScorer};
use crate::error::{ScopeError, ScopeResult};
use crate::extraction::ExtractionResult;
use crate::miner::parse_css;
use crate::naming::TokenNamer;

/// A named extraction together with its consistency report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub extraction: ExtractionResult,
    pub report: ConsistencyReport,
}

/// Parse, name and score `css_text`.
///
/// Fails with [`ScopeError::ValidationError`] for a blank `url` and with
/// [`ScopeError::EmptyCss`] when the text is blank or yields
/// neither colors nor typography. Strategy errors surface as
/// [`ScopeError::Strategy`]; the fallback decorators never produce them.
pub async fn extract_tokens(
    css_text: &str,
    url: &str,
    namer: &dyn TokenNamer,
    scorer: &dyn ConsistencyScorer,
) -> ScopeResult<Extraction> {
    if url.trim().is_empty() {
        return Err(ScopeError::validation("source url must not be empty"));
    }
    if css_text.trim().is_empty() {
        return Err(ScopeError::EmptyCss(url.to_string()));
    }

    let raw = parse_css(css_text);
    if raw.has_no_primary_tokens() {
        return Err(ScopeError::EmptyCss(url.to_string()));
    }

    let extraction = namer
        .name_tokens(&raw, url)
        .await
        .map_err(|e| ScopeError::Strategy(format!("{}: {:#}", namer.label(), e)))?;
    let report = scorer
        .score(&extraction)
        .await
        .map_err(|e| ScopeError::Strategy(format!("{}: {:#}", scorer.label(), e)))?;

    info!(
        url,
        namer = namer.label(),
        scorer = scorer.label(),
        colors = extraction.colors.len(),
        typography = extraction.typography.len(),
        spacing = extraction.spacing.len(),
        radius = extraction.radius.len(),
        score = report.overall_score,
        grade = %report.grade,
        "Extraction complete"
    );

    Ok(Extraction { extraction, report })
}
