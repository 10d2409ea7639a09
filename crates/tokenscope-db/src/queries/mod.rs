//! Database query implementations.

pub mod extractions;
