//! Named design-token model.
//!
//! These types are the persisted and exchanged form of an extraction: they
//! are what the namers produce, what the scorer and diff engine read, and
//! what the Claude strategies must answer with.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// A named color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorToken {
    pub name: String,
    /// Canonical uppercase `#RRGGBB`.
    pub hex: String,
    pub rgb: Rgb,
    pub usage: String,
    #[serde(default)]
    pub count: usize,
}

/// A named text style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypographyToken {
    pub name: String,
    pub font_family: String,
    pub font_size: String,
    pub font_weight: u16,
    pub line_height: String,
    pub letter_spacing: String,
    pub usage: String,
    #[serde(default)]
    pub count: usize,
}

/// A named spacing step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpacingToken {
    pub name: String,
    pub value: String,
    pub pixels: f64,
    pub usage: String,
    #[serde(default)]
    pub count: usize,
}

/// A named corner radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RadiusToken {
    pub name: String,
    pub value: String,
    pub pixels: f64,
    pub usage: String,
    #[serde(default)]
    pub count: usize,
}

/// The named tokens of one extraction run.
///
/// Never mutated after creation; re-running an extraction yields a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub url: String,
    /// ISO-8601 creation time.
    pub timestamp: String,
    pub colors: Vec<ColorToken>,
    pub typography: Vec<TypographyToken>,
    #[serde(default)]
    pub spacing: Vec<SpacingToken>,
    #[serde(default)]
    pub radius: Vec<RadiusToken>,
}

impl ExtractionResult {
    /// Total number of named tokens.
    pub fn token_count(&self) -> usize {
        self.colors.len() + self.typography.len() + self.spacing.len() + self.radius.len()
    }

    /// Font families in first-seen order, without duplicates.
    pub fn font_families(&self) -> Vec<&str> {
        let mut families: Vec<&str> = Vec::new();
        for t in &self.typography {
            if !families.contains(&t.font_family.as_str()) {
                families.push(&t.font_family);
            }
        }
        families
    }
}

/// Current UTC time with millisecond precision (`2024-01-01T00:00:00.000Z`).
pub fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
