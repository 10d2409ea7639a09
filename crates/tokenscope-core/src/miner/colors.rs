//! Color mining.

use std::sync::LazyLock;

use regex::Regex;

use super::model::RawColor;
use super::{property_values, Tally};
use crate::color::parse_color_string;

/// Properties whose values may carry colors.
pub const COLOR_PROPERTIES: &[&str] = &[
    "color",
    "background-color",
    "background",
    "border-color",
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
    "border",
    "outline-color",
    "box-shadow",
    "text-shadow",
    "fill",
    "stroke",
    "text-decoration-color",
    "accent-color",
    "caret-color",
];

/// Named colors recognized when they make up a whole declaration value.
/// Keywords mapped to `None` are never colors.
const NAMED_COLORS: &[(&str, Option<&str>)] = &[
    ("black", Some("#000000")),
    ("white", Some("#FFFFFF")),
    ("red", Some("#FF0000")),
    ("green", Some("#008000")),
    ("blue", Some("#0000FF")),
    ("yellow", Some("#FFFF00")),
    ("orange", Some("#FFA500")),
    ("purple", Some("#800080")),
    ("pink", Some("#FFC0CB")),
    ("gray", Some("#808080")),
    ("grey", Some("#808080")),
    ("transparent", None),
    ("inherit", None),
    ("currentcolor", None),
    ("initial", None),
    ("unset", None),
];

static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(?:[0-9a-fA-F]{3,4}){1,2}\b").unwrap());

static RGB_FN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)rgba?\s*\(\s*[\d.]+%?\s*[,\s]\s*[\d.]+%?\s*[,\s]\s*[\d.]+%?\s*(?:[,/]\s*[\d.]+%?\s*)?\)",
    )
    .unwrap()
});

static HSL_FN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)hsla?\s*\(\s*[\d.]+(?:deg)?\s*[,\s]\s*[\d.]+%\s*[,\s]\s*[\d.]+%\s*(?:[,/]\s*[\d.]+%?\s*)?\)",
    )
    .unwrap()
});

/// Tally every color found under a color-bearing property, most used first.
pub fn extract_colors(css: &str) -> Vec<RawColor> {
    let mut tally: Tally<String> = Tally::new();
    let mut properties: Vec<Vec<String>> = Vec::new();

    for &prop in COLOR_PROPERTIES {
        for value in property_values(css, prop) {
            for hex in extract_color_values(value.trim()) {
                let slot = tally.add(hex);
                if slot == properties.len() {
                    properties.push(Vec::new());
                }
                let seen = &mut properties[slot];
                if !seen.iter().any(|p| p == prop) {
                    seen.push(prop.to_string());
                }
            }
        }
    }

    let mut colors: Vec<RawColor> = tally
        .into_entries()
        .into_iter()
        .zip(properties)
        .map(|((hex, count), properties)| RawColor { hex, count, properties })
        .collect();

    colors.sort_by(|a, b| b.count.cmp(&a.count));
    colors
}

/// Pull every color out of a single declaration value.
///
/// Hex literals come first, then `rgb()`, then `hsl()`, then a whole-value
/// named color.
pub fn extract_color_values(value: &str) -> Vec<String> {
    let mut found = Vec::new();

    for re in [&*HEX_RE, &*RGB_FN_RE, &*HSL_FN_RE] {
        found.extend(
            re.find_iter(value)
                .filter_map(|m| parse_color_string(m.as_str())),
        );
    }

    let lower = value.trim().to_lowercase();
    if let Some((_, Some(hex))) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        found.push((*hex).to_string());
    }

    found
}
