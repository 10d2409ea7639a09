//! Diff and drift model.

use serde::{Deserialize, Serialize};

use crate::extraction::model::{ColorToken, RadiusToken, SpacingToken, TypographyToken};

/// How a token changed between baseline and candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl DiffStatus {
    /// Display priority: removed, changed, added, unchanged.
    pub fn priority(self) -> u8 {
        match self {
            Self::Removed => 0,
            Self::Changed => 1,
            Self::Added => 2,
            Self::Unchanged => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        }
    }

    /// Whether the entry counts against the drift score.
    pub fn is_drift(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl std::fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One aligned token pair. `a` is the baseline side, `b` the candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry<T> {
    pub status: DiffStatus,
    pub name: String,
    pub a: Option<T>,
    pub b: Option<T>,
}

impl<T> DiffEntry<T> {
    pub fn removed(name: &str, a: T) -> Self {
        Self { status: DiffStatus::Removed, name: name.to_string(), a: Some(a), b: None }
    }

    pub fn added(name: &str, b: T) -> Self {
        Self { status: DiffStatus::Added, name: name.to_string(), a: None, b: Some(b) }
    }

    pub fn paired(status: DiffStatus, name: &str, a: T, b: T) -> Self {
        Self { status, name: name.to_string(), a: Some(a), b: Some(b) }
    }
}

/// Per-category diff lists, each sorted by [`DiffStatus::priority`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDiff {
    pub colors: Vec<DiffEntry<ColorToken>>,
    pub typography: Vec<DiffEntry<TypographyToken>>,
    pub spacing: Vec<DiffEntry<SpacingToken>>,
    pub radius: Vec<DiffEntry<RadiusToken>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDrift {
    pub colors: u32,
    pub typography: u32,
    pub spacing: u32,
    pub radius: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftCounts {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub total_a: usize,
    pub total_b: usize,
}

/// Similarity between two token sets, 100 meaning identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftScore {
    pub overall: u32,
    pub by_category: CategoryDrift,
    pub counts: DriftCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub diff: TokenDiff,
    pub drift: DriftScore,
}
