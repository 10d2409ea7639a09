//! Spacing and border-radius mining.

use super::model::{RawRadius, RawSpacing};
use super::units::{parse_float, to_pixels};
use super::{property_values, Tally};

/// Properties tallied as spacing.
pub const SPACING_PROPERTIES: &[&str] = &[
    "margin",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "padding",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "gap",
    "row-gap",
    "column-gap",
];

/// Explicit corner properties tallied alongside `border-radius`.
pub const RADIUS_CORNER_PROPERTIES: &[&str] = &[
    "border-top-left-radius",
    "border-top-right-radius",
    "border-bottom-right-radius",
    "border-bottom-left-radius",
];

/// Largest length still considered spacing rather than layout.
pub const MAX_SPACING_PX: f64 = 256.0;

/// Tally spacing lengths (0 < px <= 256) by raw string, smallest first.
pub fn extract_spacing(css: &str) -> Vec<RawSpacing> {
    let mut tally: Tally<String> = Tally::new();

    for &prop in SPACING_PROPERTIES {
        for value in property_values(css, prop) {
            for part in value.split_whitespace() {
                let px = to_pixels(part);
                if px > 0.0 && px <= MAX_SPACING_PX && !part.starts_with("var(") {
                    tally.add(part.to_string());
                }
            }
        }
    }

    let mut spacing: Vec<RawSpacing> = tally
        .into_entries()
        .into_iter()
        .map(|(value, count)| RawSpacing {
            pixels: to_pixels(&value),
            value,
            count,
        })
        .collect();
    spacing.sort_by(|a, b| a.pixels.total_cmp(&b.pixels));
    spacing
}

/// Tally border-radius lengths by raw string, smallest first.
///
/// Only the horizontal radii (before any `/`) of the shorthand are read.
pub fn extract_radius(css: &str) -> Vec<RawRadius> {
    let mut tally: Tally<String> = Tally::new();

    for value in property_values(css, "border-radius") {
        let horizontal = value.split('/').next().unwrap_or_default().trim();
        for part in horizontal.split_whitespace() {
            if is_radius_length(part) {
                tally.add(part.to_string());
            }
        }
    }

    for &corner in RADIUS_CORNER_PROPERTIES {
        for value in property_values(css, corner) {
            let value = value.trim();
            if is_radius_length(value) {
                tally.add(value.to_string());
            }
        }
    }

    let mut radius: Vec<RawRadius> = tally
        .into_entries()
        .into_iter()
        .map(|(value, count)| RawRadius {
            pixels: to_pixels(&value),
            value,
            count,
        })
        .collect();
    radius.sort_by(|a, b| a.pixels.total_cmp(&b.pixels));
    radius
}

fn is_radius_length(part: &str) -> bool {
    parse_float(part).is_some_and(|n| n >= 0.0)
}
