//! Raw (unnamed) token collections produced by the miner.

use serde::{Deserialize, Serialize};

/// A distinct color with its occurrence count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawColor {
    /// Canonical uppercase `#RRGGBB`.
    pub hex: String,
    pub count: usize,
    /// Distinct CSS properties the color appeared under, in first-seen order.
    pub properties: Vec<String>,
}

/// One font-size and the values most often paired with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTypography {
    pub font_family: String,
    pub font_size: String,
    pub font_weight: u16,
    pub line_height: String,
    pub letter_spacing: String,
    pub count: usize,
}

/// A distinct spacing length as written in the CSS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpacing {
    pub value: String,
    pub pixels: f64,
    pub count: usize,
}

/// A distinct border-radius length as written in the CSS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRadius {
    pub value: String,
    pub pixels: f64,
    pub count: usize,
}

/// Everything mined from one CSS input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExtraction {
    pub colors: Vec<RawColor>,
    pub typography: Vec<RawTypography>,
    pub spacing: Vec<RawSpacing>,
    pub radius: Vec<RawRadius>,
}

impl RawExtraction {
    /// True when neither colors nor typography were found. Spacing and
    /// radius alone do not make a usable extraction.
    pub fn has_no_primary_tokens(&self) -> bool {
        self.colors.is_empty() && self.typography.is_empty()
    }

    /// Total number of raw entries across all four collections.
    pub fn len(&self) -> usize {
        self.colors.len() + self.typography.len() + self.spacing.len() + self.radius.len()
    }
}
