//! Claude-backed consistency scoring.

use std::fmt::Write;

use anyhow::Result;
use async_trait::async_trait;

use crate::claude::{parse_json_response, schema_json, ClaudeClient};
use crate::extraction::model::ExtractionResult;

use super::model::ConsistencyReport;
use super::ConsistencyScorer;

const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a design systems auditor. Given a set of named design tokens from a website, analyze their consistency and provide actionable recommendations.

Score each category 0-100 based on:
- Number of unique values vs reasonable targets (colors: ~12, typography: ~8, spacing: ~8, radius: ~5)
- Presence of near-duplicates
- Adherence to standard scales (4px grid, modular type scale)
- Semantic coverage (does the palette have proper semantic colors?)

overallScore must be an integer from 0 to 100.
Return ONLY valid JSON matching the ConsistencyReport schema below. No markdown fences, no explanation."#;

pub struct ClaudeScorer {
    client: ClaudeClient,
}

impl ClaudeScorer {
    pub fn new(client: ClaudeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConsistencyScorer for ClaudeScorer {
    async fn score(&self, result: &ExtractionResult) -> Result<ConsistencyReport> {
        let system = format!(
            "{}\n\nSchema:\n{}",
            ANALYSIS_SYSTEM_PROMPT,
            schema_json::<ConsistencyReport>()
        );
        let text = self.client.complete(&system, &build_analysis_prompt(result)).await?;
        let report: ConsistencyReport = parse_json_response(&text)?;
        validate_report(&report)?;
        Ok(report)
    }

    fn label(&self) -> &'static str {
        "claude"
    }
}

pub fn build_analysis_prompt(result: &ExtractionResult) -> String {
    let mut out = format!("Website: {}\n\nNamed tokens:\n", result.url);

    let _ = writeln!(out, "\nCOLORS ({}):", result.colors.len());
    for c in &result.colors {
        let _ = writeln!(out, "  {}: {} : {} ({}x)", c.name, c.hex, c.usage, c.count);
    }

    let _ = writeln!(out, "\nTYPOGRAPHY ({}):", result.typography.len());
    for t in &result.typography {
        let _ = writeln!(
            out,
            "  {}: {} {}/{} w{}",
            t.name, t.font_family, t.font_size, t.line_height, t.font_weight
        );
    }

    let _ = writeln!(out, "\nSPACING ({}):", result.spacing.len());
    for s in &result.spacing {
        let _ = writeln!(out, "  {}: {} ({}px)", s.name, s.value, s.pixels);
    }

    let _ = writeln!(out, "\nRADIUS ({}):", result.radius.len());
    for r in &result.radius {
        let _ = writeln!(out, "  {}: {} ({}px)", r.name, r.value, r.pixels);
    }

    out.push_str("\nAnalyze consistency and return the ConsistencyReport JSON.");
    out
}

/// Colors, typography, spacing and border radius.
const CATEGORY_COUNT: usize = 4;

/// Reject reports with an out-of-range score or other than one metric per
/// category.
pub fn validate_report(report: &ConsistencyReport) -> Result<()> {
    if report.overall_score > 100 {
        anyhow::bail!("overallScore out of range: {}", report.overall_score);
    }
    if report.metrics.len() != CATEGORY_COUNT {
        anyhow::bail!(
            "report has {} metrics, expected {}",
            report.metrics.len(),
            CATEGORY_COUNT
        );
    }
    for m in &report.metrics {
        if !(0.0..=100.0).contains(&m.score) {
            anyhow::bail!("{} score out of range: {}", m.category, m.score);
        }
    }
    Ok(())
}
