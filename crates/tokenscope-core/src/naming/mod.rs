//! Token naming strategies.
//!
//! [`HeuristicNamer`] is always available. When an Anthropic API key is
//! configured, [`select_namer`] wraps a [`ClaudeNamer`] in a
//! [`FallbackNamer`] so any Claude failure degrades to the heuristic result.

pub mod claude;
pub mod heuristic;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::claude::ClaudeClient;
use crate::config::Config;
use crate::extraction::model::ExtractionResult;
use crate::miner::RawExtraction;

pub use claude::ClaudeNamer;
pub use heuristic::name_tokens_heuristic;

/// Turns raw mined values into named tokens.
#[async_trait]
pub trait TokenNamer: Send + Sync {
    async fn name_tokens(&self, raw: &RawExtraction, url: &str) -> anyhow::Result<ExtractionResult>;

    /// Short label for logs and CLI output.
    fn label(&self) -> &'static str;
}

/// Deterministic namer; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicNamer;

#[async_trait]
impl TokenNamer for HeuristicNamer {
    async fn name_tokens(&self, raw: &RawExtraction, url: &str) -> anyhow::Result<ExtractionResult> {
        Ok(name_tokens_heuristic(raw, url))
    }

    fn label(&self) -> &'static str {
        "heuristic"
    }
}

/// Tries `primary`, answering with the heuristic on any error. No retries.
pub struct FallbackNamer<P> {
    primary: P,
}

impl<P: TokenNamer> FallbackNamer<P> {
    pub fn new(primary: P) -> Self {
        Self { primary }
    }
}

#[async_trait]
impl<P: TokenNamer> TokenNamer for FallbackNamer<P> {
    async fn name_tokens(&self, raw: &RawExtraction, url: &str) -> anyhow::Result<ExtractionResult> {
        match self.primary.name_tokens(raw, url).await {
            Ok(result) => {
                debug!(strategy = self.primary.label(), tokens = result.token_count(), "Named tokens");
                Ok(result)
            }
            Err(e) => {
                warn!(
                    strategy = self.primary.label(),
                    error = %e,
                    "Naming failed, falling back to heuristic"
                );
                Ok(name_tokens_heuristic(raw, url))
            }
        }
    }

    fn label(&self) -> &'static str {
        self.primary.label()
    }
}

/// Claude with heuristic fallback when a key is configured, else heuristic.
pub fn select_namer(config: &Config) -> Box<dyn TokenNamer> {
    if !config.anthropic_enabled() {
        return Box::new(HeuristicNamer);
    }
    match ClaudeClient::from_config(&config.anthropic) {
        Ok(client) => Box::new(FallbackNamer::new(ClaudeNamer::new(client))),
        Err(e) => {
            warn!(error = %e, "Claude client unavailable, using heuristic namer");
            Box::new(HeuristicNamer)
        }
    }
}
