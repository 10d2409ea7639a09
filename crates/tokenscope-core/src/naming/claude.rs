//! Claude-backed token naming.

use std::collections::HashSet;
use std::fmt::Write;

use anyhow::Result;
use async_trait::async_trait;

use crate::claude::{parse_json_response, schema_json, ClaudeClient};
use crate::color::{hex_to_rgb, parse_color_string};
use crate::extraction::model::{iso_timestamp, ExtractionResult};
use crate::miner::RawExtraction;

use super::TokenNamer;

pub const MAX_PROMPT_COLORS: usize = 30;
pub const MAX_PROMPT_TYPOGRAPHY: usize = 12;
pub const MAX_PROMPT_SPACING: usize = 12;
pub const MAX_PROMPT_RADIUS: usize = 8;

const NAMING_SYSTEM_PROMPT: &str = r#"You are a design systems expert. Given raw CSS token data extracted from a website, assign semantic names and usage descriptions to each token.

Rules:
- Colors: use names like primary, secondary, accent, neutral-100..neutral-900, success, warning, error, info, background, surface, border, text-primary, text-secondary
- Typography: use names like heading-1..heading-4, body, body-small, caption, code, overline
- Spacing: use names like xs, sm, md, base, lg, xl, 2xl, 3xl
- Radius: use names like sm, base, md, lg, xl, full
- Names must be unique within each category.

Return ONLY valid JSON matching the ExtractionResult schema below. No markdown fences, no explanation."#;

pub struct ClaudeNamer {
    client: ClaudeClient,
}

impl ClaudeNamer {
    pub fn new(client: ClaudeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenNamer for ClaudeNamer {
    async fn name_tokens(&self, raw: &RawExtraction, url: &str) -> Result<ExtractionResult> {
        let system = format!(
            "{}\n\nSchema:\n{}",
            NAMING_SYSTEM_PROMPT,
            schema_json::<ExtractionResult>()
        );
        let text = self.client.complete(&system, &build_naming_prompt(raw, url)).await?;

        let mut result: ExtractionResult = parse_json_response(&text)?;
        validate_named(&result)?;
        result.url = url.to_string();
        result.timestamp = iso_timestamp();
        Ok(result)
    }

    fn label(&self) -> &'static str {
        "claude"
    }
}

/// User turn listing the most frequent raw values of each category.
pub fn build_naming_prompt(raw: &RawExtraction, url: &str) -> String {
    let colors = &raw.colors[..raw.colors.len().min(MAX_PROMPT_COLORS)];
    let typography = &raw.typography[..raw.typography.len().min(MAX_PROMPT_TYPOGRAPHY)];
    let spacing = &raw.spacing[..raw.spacing.len().min(MAX_PROMPT_SPACING)];
    let radius = &raw.radius[..raw.radius.len().min(MAX_PROMPT_RADIUS)];

    let mut out = format!("Website: {}\n\nRaw extracted tokens:\n", url);

    let _ = writeln!(out, "\nCOLORS ({}):", colors.len());
    for c in colors {
        let _ = writeln!(out, "  {} : used {}x in [{}]", c.hex, c.count, c.properties.join(", "));
    }

    let _ = writeln!(out, "\nTYPOGRAPHY ({}):", typography.len());
    for t in typography {
        let _ = writeln!(
            out,
            "  {} {} w{} lh:{} ls:{} : {}x",
            t.font_family, t.font_size, t.font_weight, t.line_height, t.letter_spacing, t.count
        );
    }

    let _ = writeln!(out, "\nSPACING ({}):", spacing.len());
    for s in spacing {
        let _ = writeln!(out, "  {} ({}px) : {}x", s.value, s.pixels, s.count);
    }

    let _ = writeln!(out, "\nRADIUS ({}):", radius.len());
    for r in radius {
        let _ = writeln!(out, "  {} ({}px) : {}x", r.value, r.pixels, r.count);
    }

    out.push_str(
        "\nAssign semantic names and usage descriptions to each token. Return the complete ExtractionResult JSON.",
    );
    out
}

/// Reject answers with blank or duplicate names in any category, and colors
/// whose hex is not canonical `#RRGGBB` or whose `rgb` disagrees with it.
pub fn validate_named(result: &ExtractionResult) -> Result<()> {
    for c in &result.colors {
        if parse_color_string(&c.hex).as_deref() != Some(c.hex.as_str()) {
            anyhow::bail!("color {} has non-canonical hex {:?}", c.name, c.hex);
        }
        if c.rgb != hex_to_rgb(&c.hex) {
            anyhow::bail!("color {} rgb does not match {}", c.name, c.hex);
        }
    }
    check_names("colors", result.colors.iter().map(|c| c.name.as_str()))?;
    check_names("typography", result.typography.iter().map(|t| t.name.as_str()))?;
    check_names("spacing", result.spacing.iter().map(|s| s.name.as_str()))?;
    check_names("radius", result.radius.iter().map(|r| r.name.as_str()))?;
    Ok(())
}

fn check_names<'a>(category: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            anyhow::bail!("empty {} token name", category);
        }
        if !seen.insert(name) {
            anyhow::bail!("duplicate {} token name: {}", category, name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::miner::parse_css;
    use crate::naming::name_tokens_heuristic;

    #[test]
    fn test_prompt_truncates_categories() {
        let css: String = (0..40)
            .map(|i| format!(".c{i} {{ color: #{:02X}0000; margin: {}px }}\n", i * 6, i + 1))
            .collect();
        let raw = parse_css(&css);
        assert_eq!(raw.colors.len(), 40);

        let prompt = build_naming_prompt(&raw, "https://example.com");
        assert!(prompt.starts_with("Website: https://example.com"));
        assert!(prompt.contains("COLORS (30):"));
        assert!(prompt.contains("SPACING (12):"));
        assert!(prompt.contains("RADIUS (0):"));
    }

    #[test]
    fn test_validate_accepts_heuristic_output() {
        let raw = parse_css(".a { color: #111; background: #fff; font-size: 14px; padding: 4px 8px }");
        let result = name_tokens_heuristic(&raw, "https://example.com");
        assert!(validate_named(&result).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_blanks() {
        let raw = parse_css(".a { color: #111; background: #fff }");
        let mut result = name_tokens_heuristic(&raw, "https://example.com");
        result.colors[1].name = result.colors[0].name.clone();
        assert!(validate_named(&result).is_err());

        result.colors[1].name = "  ".to_string();
        assert!(validate_named(&result).is_err());
    }

    #[test]
    fn test_validate_rejects_short_hex_and_mismatched_rgb() {
        let raw = parse_css(".a { color: #FFFFFF }");
        let mut result = name_tokens_heuristic(&raw, "https://example.com");
        assert!(validate_named(&result).is_ok());

        result.colors[0].hex = "#fff".to_string();
        assert!(validate_named(&result).is_err());

        result.colors[0].hex = "#ffffff".to_string();
        assert!(validate_named(&result).is_err());

        result.colors[0].hex = "#FFFFFF".to_string();
        result.colors[0].rgb = Rgb::new(0, 0, 0);
        assert!(validate_named(&result).is_err());
    }

    #[test]
    fn test_missing_typography_fails_to_parse() {
        let text = r#"{"url": "x", "timestamp": "t", "colors": []}"#;
        assert!(parse_json_response::<ExtractionResult>(text).is_err());
    }
}
