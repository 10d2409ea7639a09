//! Consistency scoring strategies.

pub mod claude;
pub mod heuristic;
pub mod model;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::claude::ClaudeClient;
use crate::config::Config;
use crate::extraction::model::ExtractionResult;

pub use claude::ClaudeScorer;
pub use heuristic::{grade_from_score, score_consistency_heuristic};
pub use model::{ConsistencyMetric, ConsistencyReport};

/// Produces a consistency report for named tokens.
#[async_trait]
pub trait ConsistencyScorer: Send + Sync {
    async fn score(&self, result: &ExtractionResult) -> anyhow::Result<ConsistencyReport>;

    fn label(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

#[async_trait]
impl ConsistencyScorer for HeuristicScorer {
    async fn score(&self, result: &ExtractionResult) -> anyhow::Result<ConsistencyReport> {
        Ok(score_consistency_heuristic(result))
    }

    fn label(&self) -> &'static str {
        "heuristic"
    }
}

/// Tries `primary`, answering with the heuristic report on any error.
pub struct FallbackScorer<P> {
    primary: P,
}

impl<P: ConsistencyScorer> FallbackScorer<P> {
    pub fn new(primary: P) -> Self {
        Self { primary }
    }
}

#[async_trait]
impl<P: ConsistencyScorer> ConsistencyScorer for FallbackScorer<P> {
    async fn score(&self, result: &ExtractionResult) -> anyhow::Result<ConsistencyReport> {
        match self.primary.score(result).await {
            Ok(report) => {
                debug!(strategy = self.primary.label(), score = report.overall_score, "Scored consistency");
                Ok(report)
            }
            Err(e) => {
                warn!(
                    strategy = self.primary.label(),
                    error = %e,
                    "Scoring failed, falling back to heuristic"
                );
                Ok(score_consistency_heuristic(result))
            }
        }
    }

    fn label(&self) -> &'static str {
        self.primary.label()
    }
}

/// Claude with heuristic fallback when a key is configured, else heuristic.
pub fn select_scorer(config: &Config) -> Box<dyn ConsistencyScorer> {
    if !config.anthropic_enabled() {
        return Box::new(HeuristicScorer);
    }
    match ClaudeClient::from_config(&config.anthropic) {
        Ok(client) => Box::new(FallbackScorer::new(ClaudeScorer::new(client))),
        Err(e) => {
            warn!(error = %e, "Claude client unavailable, using heuristic scorer");
            Box::new(HeuristicScorer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingScorer;

    #[async_trait]
    impl ConsistencyScorer for FailingScorer {
        async fn score(&self, _: &ExtractionResult) -> anyhow::Result<ConsistencyReport> {
            anyhow::bail!("timeout")
        }

        fn label(&self) -> &'static str {
            "failing"
        }
    }

    fn result() -> ExtractionResult {
        ExtractionResult {
            url: "https://example.com".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            colors: vec![],
            typography: vec![],
            spacing: vec![],
            radius: vec![],
        }
    }

    #[tokio::test]
    async fn test_fallback_scorer_uses_heuristic_on_error() {
        let report = FallbackScorer::new(FailingScorer).score(&result()).await.unwrap();
        assert_eq!(report, score_consistency_heuristic(&result()));
    }

    #[tokio::test]
    async fn test_heuristic_scorer() {
        let report = HeuristicScorer.score(&result()).await.unwrap();
        assert_eq!(report.grade, "A+");
    }

    #[test]
    fn test_select_scorer() {
        assert_eq!(select_scorer(&Config::default()).label(), "heuristic");
    }
}
