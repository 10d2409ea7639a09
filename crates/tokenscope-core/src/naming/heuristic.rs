//! Deterministic token naming.
//!
//! Colors are named from frequency, saturation, hue and luminance;
//! typography from size tiers and weight; spacing and radius by position on
//! a fixed scale. Processing order decides which entry gets the unsuffixed
//! name, so every sort here is stable and every collision goes through
//! [`ReservedNames`].

use std::collections::{HashMap, HashSet};

use crate::color::hex_to_rgb;
use crate::extraction::model::{
    iso_timestamp, ColorToken, ExtractionResult, RadiusToken, SpacingToken, TypographyToken,
};
use crate::miner::{to_pixels, RawColor, RawExtraction, RawRadius, RawSpacing, RawTypography};

/// Colors at or below this HSL saturation (percent) are neutrals.
pub const NEUTRAL_MAX_SATURATION: u8 = 10;

const CHROMATIC_NAMES: &[&str] = &["primary", "secondary", "accent"];

/// Hue ranges (inclusive, degrees) for semantic color names.
const SEMANTIC_HUES: &[(u16, u16, &str)] = &[
    (0, 15, "error"),
    (345, 360, "error"),
    (100, 160, "success"),
    (30, 50, "warning"),
    (200, 250, "info"),
];

const DISPLAY_MIN_PX: f64 = 36.0;
const HEADING_MIN_PX: f64 = 20.0;
const BOLD_HEADING_MIN_PX: f64 = 18.0;
const BODY_MIN_PX: f64 = 14.0;
const BOLD_WEIGHT: u16 = 600;

pub const SPACING_SCALE: &[&str] = &["xs", "sm", "md", "base", "lg", "xl", "2xl", "3xl", "4xl"];
pub const RADIUS_SCALE: &[&str] = &["sm", "base", "md", "lg", "xl", "full"];

/// Radii at or above this many pixels are "fully round".
pub const FULL_RADIUS_PX: f64 = 9000.0;

/// Name every raw token. Pure apart from the timestamp.
pub fn name_tokens_heuristic(raw: &RawExtraction, url: &str) -> ExtractionResult {
    ExtractionResult {
        url: url.to_string(),
        timestamp: iso_timestamp(),
        colors: name_colors(&raw.colors),
        typography: name_typography(&raw.typography),
        spacing: name_spacing(&raw.spacing),
        radius: name_radius(&raw.radius),
    }
}

/// Names already handed out within one category.
#[derive(Debug, Default)]
struct ReservedNames(HashSet<String>);

impl ReservedNames {
    fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Claim `name`, appending `-2`, `-3`, ... if it is taken.
    fn reserve(&mut self, name: String) -> String {
        let name = if self.contains(&name) {
            let mut suffix = 2;
            while self.contains(&format!("{}-{}", name, suffix)) {
                suffix += 1;
            }
            format!("{}-{}", name, suffix)
        } else {
            name
        };
        self.0.insert(name.clone());
        name
    }
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

fn name_colors(raw_colors: &[RawColor]) -> Vec<ColorToken> {
    let mut reserved = ReservedNames::default();
    let mut named = Vec::with_capacity(raw_colors.len());

    let (mut chromatic, mut neutrals): (Vec<&RawColor>, Vec<&RawColor>) = raw_colors
        .iter()
        .partition(|c| hex_to_rgb(&c.hex).to_hsl().s > NEUTRAL_MAX_SATURATION);

    chromatic.sort_by(|a, b| b.count.cmp(&a.count));

    for (i, c) in chromatic.iter().enumerate() {
        let rgb = hex_to_rgb(&c.hex);
        let hue = rgb.to_hsl().h;

        let mut name = match CHROMATIC_NAMES.get(i) {
            Some(name) => name.to_string(),
            None => SEMANTIC_HUES
                .iter()
                .find(|(min, max, name)| hue >= *min && hue <= *max && !reserved.contains(name))
                .map(|(_, _, name)| name.to_string())
                .unwrap_or_else(|| format!("chromatic-{}", i + 1)),
        };
        if reserved.contains(&name) {
            name = format!("{}-{}", name, i + 1);
        }

        named.push(ColorToken {
            name: reserved.reserve(name),
            hex: c.hex.clone(),
            rgb,
            usage: describe_usage(&c.properties),
            count: c.count,
        });
    }

    // Lightest first.
    neutrals.sort_by(|a, b| {
        let la = hex_to_rgb(&a.hex).luminance();
        let lb = hex_to_rgb(&b.hex).luminance();
        lb.total_cmp(&la)
    });

    for (i, c) in neutrals.iter().enumerate() {
        let rgb = hex_to_rgb(&c.hex);
        let mut name = neutral_name(rgb.luminance());
        if reserved.contains(&name) {
            name = format!("{}-alt", name);
        }
        if reserved.contains(&name) {
            name = format!("neutral-{}", i + 1);
        }

        named.push(ColorToken {
            name: reserved.reserve(name),
            hex: c.hex.clone(),
            rgb,
            usage: describe_usage(&c.properties),
            count: c.count,
        });
    }

    named
}

/// `white`, `black`, or a `neutral-100`..`neutral-900` step by luminance.
fn neutral_name(lum: f64) -> String {
    if lum > 0.95 {
        "white".to_string()
    } else if lum < 0.01 {
        "black".to_string()
    } else {
        let step = (((1.0 - lum) * 9.0).floor() as u32 + 1).min(9);
        format!("neutral-{}00", step)
    }
}

/// Human-readable summary of where a color was used.
fn describe_usage(properties: &[String]) -> String {
    let has = |pred: &dyn Fn(&str) -> bool| properties.iter().any(|p| pred(p.as_str()));
    let mut parts = Vec::new();
    if has(&|p| p == "color") {
        parts.push("Text color");
    }
    if has(&|p| p.starts_with("background")) {
        parts.push("Background");
    }
    if has(&|p| p.starts_with("border")) {
        parts.push("Border");
    }
    if has(&|p| p.contains("shadow")) {
        parts.push("Shadow");
    }
    if has(&|p| p == "fill" || p == "stroke") {
        parts.push("SVG");
    }
    if parts.is_empty() {
        "General".to_string()
    } else {
        parts.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Typography
// ---------------------------------------------------------------------------

fn name_typography(raw_typo: &[RawTypography]) -> Vec<TypographyToken> {
    let mut sorted: Vec<&RawTypography> = raw_typo.iter().collect();
    sorted.sort_by(|a, b| to_pixels(&b.font_size).total_cmp(&to_pixels(&a.font_size)));

    let mut reserved = ReservedNames::default();
    let mut display_idx = 1;
    let mut heading_idx = 1;
    let mut body_count = 0;
    let mut small_count = 0;

    sorted
        .into_iter()
        .map(|t| {
            let px = to_pixels(&t.font_size);
            let bold = t.font_weight >= BOLD_WEIGHT;

            let (name, usage) = if px >= DISPLAY_MIN_PX {
                let name = if display_idx == 1 {
                    "display".to_string()
                } else {
                    format!("display-{}", display_idx)
                };
                display_idx += 1;
                (name, "Display / hero text")
            } else if px >= HEADING_MIN_PX || (px >= BOLD_HEADING_MIN_PX && bold) {
                let name = format!("heading-{}", heading_idx);
                heading_idx += 1;
                (name, "Section heading")
            } else if px >= BODY_MIN_PX {
                let named = match (body_count, bold) {
                    (0, true) => ("label".to_string(), "Label / emphasis text"),
                    (0, false) => ("body".to_string(), "Body text, paragraphs"),
                    (1, true) => ("label-small".to_string(), "Small label text"),
                    (1, false) => ("body-small".to_string(), "Secondary body text"),
                    (n, _) => (format!("body-{}", n + 1), "Body text variant"),
                };
                body_count += 1;
                named
            } else {
                let named = match small_count {
                    0 => ("caption".to_string(), "Captions, helper text, metadata"),
                    1 => ("overline".to_string(), "Overline, micro text"),
                    n => (format!("small-{}", n + 1), "Fine print"),
                };
                small_count += 1;
                named
            };

            TypographyToken {
                name: reserved.reserve(name),
                font_family: t.font_family.clone(),
                font_size: t.font_size.clone(),
                font_weight: t.font_weight,
                line_height: t.line_height.clone(),
                letter_spacing: t.letter_spacing.clone(),
                usage: usage.to_string(),
                count: t.count,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Spacing & radius
// ---------------------------------------------------------------------------

/// A raw length entry that can be collapsed by rounded pixel value.
trait PixelEntry {
    fn pixels(&self) -> f64;
    fn count(&self) -> usize;
}

impl PixelEntry for RawSpacing {
    fn pixels(&self) -> f64 {
        self.pixels
    }
    fn count(&self) -> usize {
        self.count
    }
}

impl PixelEntry for RawRadius {
    fn pixels(&self) -> f64 {
        self.pixels
    }
    fn count(&self) -> usize {
        self.count
    }
}

/// Keep one entry per rounded pixel value (the higher count wins, the
/// earlier entry wins a tie), smallest first.
fn dedupe_by_pixels<T: PixelEntry>(items: &[T]) -> Vec<&T> {
    let mut slots: HashMap<i64, usize> = HashMap::new();
    let mut kept: Vec<&T> = Vec::new();

    for item in items {
        let key = item.pixels().round() as i64;
        match slots.get(&key) {
            Some(&slot) => {
                if item.count() > kept[slot].count() {
                    kept[slot] = item;
                }
            }
            None => {
                slots.insert(key, kept.len());
                kept.push(item);
            }
        }
    }

    kept.sort_by(|a, b| a.pixels().total_cmp(&b.pixels()));
    kept
}

fn name_spacing(raw_spacing: &[RawSpacing]) -> Vec<SpacingToken> {
    let mut reserved = ReservedNames::default();

    dedupe_by_pixels(raw_spacing)
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let name = SPACING_SCALE
                .get(i)
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("space-{}", i + 1));
            let usage = if i < 2 {
                "Tight spacing"
            } else if i < 5 {
                "Standard spacing"
            } else {
                "Large spacing"
            };
            SpacingToken {
                name: reserved.reserve(name),
                value: s.value.clone(),
                pixels: s.pixels,
                usage: usage.to_string(),
                count: s.count,
            }
        })
        .collect()
}

fn name_radius(raw_radius: &[RawRadius]) -> Vec<RadiusToken> {
    let unique = dedupe_by_pixels(raw_radius);
    let has_full = unique.iter().any(|r| r.pixels >= FULL_RADIUS_PX);

    // When a fully-round radius exists it owns `full`; the positional scale
    // stops at `xl`.
    let positional: &[&str] = if has_full {
        &RADIUS_SCALE[..RADIUS_SCALE.len() - 1]
    } else {
        RADIUS_SCALE
    };

    let mut reserved = ReservedNames::default();
    if has_full {
        reserved.reserve("full".to_string());
    }
    let mut full_claimed = false;

    unique
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let (name, usage) = if r.pixels >= FULL_RADIUS_PX {
                let name = if full_claimed {
                    reserved.reserve("full".to_string())
                } else {
                    full_claimed = true;
                    "full".to_string()
                };
                (name, "Pill shapes, circles")
            } else {
                let name = positional
                    .get(i)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| format!("radius-{}", i + 1));
                let usage = if i < 2 { "Subtle rounding" } else { "Cards, containers" };
                (reserved.reserve(name), usage)
            };
            RadiusToken {
                name,
                value: r.value.clone(),
                pixels: r.pixels,
                usage: usage.to_string(),
                count: r.count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_color(hex: &str, count: usize, props: &[&str]) -> RawColor {
        RawColor {
            hex: hex.to_string(),
            count,
            properties: props.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn raw_typo(size: &str, weight: u16) -> RawTypography {
        RawTypography {
            font_family: "Inter".to_string(),
            font_size: size.to_string(),
            font_weight: weight,
            line_height: "1.5".to_string(),
            letter_spacing: "0".to_string(),
            count: 1,
        }
    }

    fn raw_spacing(value: &str, count: usize) -> RawSpacing {
        RawSpacing {
            value: value.to_string(),
            pixels: to_pixels(value),
            count,
        }
    }

    fn raw_radius(value: &str, count: usize) -> RawRadius {
        RawRadius {
            value: value.to_string(),
            pixels: to_pixels(value),
            count,
        }
    }

    fn names<T>(tokens: &[T], name: impl Fn(&T) -> &str) -> Vec<String> {
        tokens.iter().map(|t| name(t).to_string()).collect()
    }

    #[test]
    fn test_chromatic_names_by_frequency_then_semantic_hue() {
        let colors = name_colors(&[
            raw_color("#3B82F6", 10, &["color"]),
            raw_color("#8B5CF6", 20, &["background-color"]),
            raw_color("#F59E0B", 5, &["border-color"]),
            raw_color("#EF4444", 4, &["color"]),
            raw_color("#22C55E", 3, &["fill"]),
            raw_color("#DC2626", 2, &["color"]),
        ]);
        assert_eq!(
            names(&colors, |c| &c.name),
            vec!["primary", "secondary", "accent", "error", "success", "chromatic-6"]
        );
        assert_eq!(colors[0].hex, "#8B5CF6");
        assert_eq!(colors[0].usage, "Background");
        assert_eq!(colors[4].usage, "SVG");
    }

    #[test]
    fn test_neutrals_lightest_first_with_alt_suffix() {
        let colors = name_colors(&[
            raw_color("#000000", 3, &["color"]),
            raw_color("#FFFFFF", 2, &["background"]),
            raw_color("#FAFAFA", 1, &["background"]),
            raw_color("#6B7280", 1, &["color", "border"]),
            raw_color("#FEFEFE", 1, &["background"]),
        ]);
        assert_eq!(
            names(&colors, |c| &c.name),
            vec!["white", "white-alt", "neutral-3", "neutral-800", "black"]
        );
        assert_eq!(colors[3].usage, "Text color, Border");
    }

    #[test]
    fn test_neutral_scale_buckets() {
        assert_eq!(neutral_name(0.96), "white");
        assert_eq!(neutral_name(0.005), "black");
        assert_eq!(neutral_name(0.9), "neutral-100");
        assert_eq!(neutral_name(0.5), "neutral-500");
        assert_eq!(neutral_name(0.011), "neutral-900");
    }

    #[test]
    fn test_color_names_unique() {
        let raw: Vec<RawColor> = (0..40)
            .map(|i| raw_color(&format!("#{:02X}{:02X}{:02X}", i * 6, i * 6, i * 6), 1, &["color"]))
            .collect();
        let colors = name_colors(&raw);
        let unique: HashSet<&str> = colors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(unique.len(), colors.len());
    }

    #[test]
    fn test_typography_tiers() {
        let typo = name_typography(&[
            raw_typo("12px", 400),
            raw_typo("48px", 700),
            raw_typo("16px", 400),
            raw_typo("18px", 700),
            raw_typo("3rem", 800),
            raw_typo("24px", 600),
            raw_typo("14px", 600),
            raw_typo("15px", 400),
            raw_typo("11px", 400),
            raw_typo("10px", 400),
        ]);
        let got: Vec<(String, String)> = typo
            .iter()
            .map(|t| (t.font_size.clone(), t.name.clone()))
            .collect();
        let expected = vec![
            ("48px", "display"),
            ("3rem", "display-2"),
            ("24px", "heading-1"),
            ("18px", "heading-2"),
            ("16px", "body"),
            ("15px", "body-small"),
            ("14px", "body-3"),
            ("12px", "caption"),
            ("11px", "overline"),
            ("10px", "small-3"),
        ];
        let expected: Vec<(String, String)> = expected
            .into_iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_bold_body_becomes_label() {
        let typo = name_typography(&[raw_typo("16px", 700), raw_typo("14px", 700)]);
        assert_eq!(names(&typo, |t| &t.name), vec!["label", "label-small"]);
    }

    #[test]
    fn test_spacing_dedup_by_rounded_pixels() {
        let spacing = name_spacing(&[
            raw_spacing("4px", 2),
            raw_spacing("16px", 1),
            raw_spacing("1rem", 5),
            raw_spacing("8px", 3),
        ]);
        let got: Vec<(&str, &str)> = spacing
            .iter()
            .map(|s| (s.name.as_str(), s.value.as_str()))
            .collect();
        assert_eq!(got, vec![("xs", "4px"), ("sm", "8px"), ("md", "1rem")]);
        assert_eq!(spacing[2].count, 5);
        assert_eq!(spacing[0].usage, "Tight spacing");
        assert_eq!(spacing[2].usage, "Standard spacing");
    }

    #[test]
    fn test_spacing_overflow_named_by_position() {
        let raw: Vec<RawSpacing> = (1..=11).map(|i| raw_spacing(&format!("{}px", i * 4), 1)).collect();
        let spacing = name_spacing(&raw);
        assert_eq!(spacing.len(), 11);
        assert_eq!(spacing[8].name, "4xl");
        assert_eq!(spacing[9].name, "space-10");
        assert_eq!(spacing[10].name, "space-11");
        assert_eq!(spacing[10].usage, "Large spacing");
    }

    #[test]
    fn test_radius_full_regardless_of_position() {
        let radius = name_radius(&[raw_radius("4px", 3), raw_radius("9999px", 2), raw_radius("8px", 1)]);
        assert_eq!(names(&radius, |r| &r.name), vec!["sm", "base", "full"]);
        assert_eq!(radius[2].usage, "Pill shapes, circles");
        assert_eq!(radius[0].usage, "Subtle rounding");
    }

    #[test]
    fn test_radius_scale_without_full() {
        let raw: Vec<RawRadius> = (1..=7).map(|i| raw_radius(&format!("{}px", i * 2), 1)).collect();
        let radius = name_radius(&raw);
        assert_eq!(
            names(&radius, |r| &r.name),
            vec!["sm", "base", "md", "lg", "xl", "full", "radius-7"]
        );
    }

    #[test]
    fn test_radius_many_with_full() {
        let mut raw: Vec<RawRadius> = (1..=6).map(|i| raw_radius(&format!("{}px", i * 2), 1)).collect();
        raw.push(raw_radius("9999px", 1));
        raw.push(raw_radius("10000px", 1));
        let radius = name_radius(&raw);
        assert_eq!(
            names(&radius, |r| &r.name),
            vec!["sm", "base", "md", "lg", "xl", "radius-6", "full", "full-2"]
        );
    }

    #[test]
    fn test_empty_input() {
        let result = name_tokens_heuristic(&RawExtraction::default(), "https://example.com");
        assert_eq!(result.url, "https://example.com");
        assert_eq!(result.token_count(), 0);
    }
}
