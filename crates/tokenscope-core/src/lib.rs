//! Tokenscope Core Library
//!
//! Mines design tokens (colors, typography, spacing, border radius) from raw
//! CSS, names them, scores the consistency of the resulting design system,
//! and diffs two extractions.
//!
//! The miner, heuristic namer, heuristic scorer and diff engine are pure,
//! synchronous functions. Network access (crawling, Claude) lives at the
//! edges behind [`naming::TokenNamer`] and [`consistency::ConsistencyScorer`].

pub mod claude;
pub mod color;
pub mod compare;
pub mod config;
pub mod consistency;
pub mod crawl;
pub mod error;
pub mod extraction;
pub mod miner;
pub mod naming;
pub mod pipeline;
pub mod store;

pub use compare::{compare_extractions, ComparisonResult};
pub use config::Config;
pub use consistency::{score_consistency_heuristic, ConsistencyReport};
pub use error::{ScopeError, ScopeResult};
pub use extraction::ExtractionResult;
pub use miner::{parse_css, RawExtraction};
pub use naming::name_tokens_heuristic;
pub use pipeline::{extract_tokens, Extraction};
