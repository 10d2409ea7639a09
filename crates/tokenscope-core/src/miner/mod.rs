//! CSS token miner.
//!
//! Scans raw stylesheet text with narrowly-scoped regular expressions and
//! tallies the visual values it finds. This is deliberately not a CSS
//! parser: malformed input is tolerated, shorthands are split on whitespace,
//! and the cascade is ignored. Naming thresholds downstream are tuned
//! against exactly this approximate behavior.

pub mod colors;
pub mod lengths;
pub mod model;
pub mod typography;
pub mod units;

use std::collections::HashMap;
use std::hash::Hash;

use regex::Regex;
use tracing::debug;

pub use model::{RawColor, RawExtraction, RawRadius, RawSpacing, RawTypography};
pub use units::to_pixels;

/// Mine colors, typography, spacing and radius from CSS text.
///
/// Never fails: input without matches produces empty collections.
pub fn parse_css(css_text: &str) -> RawExtraction {
    let raw = RawExtraction {
        colors: colors::extract_colors(css_text),
        typography: typography::extract_typography(css_text),
        spacing: lengths::extract_spacing(css_text),
        radius: lengths::extract_radius(css_text),
    };
    debug!(
        bytes = css_text.len(),
        colors = raw.colors.len(),
        typography = raw.typography.len(),
        spacing = raw.spacing.len(),
        radius = raw.radius.len(),
        "Parsed CSS"
    );
    raw
}

/// Build the `property: value` matcher for one CSS property.
///
/// The property must not be preceded by a name character, so `color` does
/// not match inside `background-color` and `gap` not inside `row-gap`.
fn property_regex(property: &str) -> Result<Regex, regex::Error> {
    let pattern = format!(r"(?i)(?:^|[^-\w]){}\s*:\s*([^;}}{{]+)", regex::escape(property));
    Regex::new(&pattern)
}

/// Every raw value declared for `property`, in source order.
pub(crate) fn property_values<'a>(css: &'a str, property: &str) -> Vec<&'a str> {
    let Ok(re) = property_regex(property) else {
        return Vec::new();
    };
    re.captures_iter(css)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Occurrence counter that remembers first-seen order.
///
/// Ties in `top` and in stable sorts downstream resolve to whichever key was
/// seen first, which keeps mining deterministic.
#[derive(Debug, Clone)]
pub(crate) struct Tally<K> {
    entries: Vec<(K, usize)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Count one occurrence of `key` and return its slot.
    pub(crate) fn add(&mut self, key: K) -> usize {
        match self.index.get(&key) {
            Some(&slot) => {
                self.entries[slot].1 += 1;
                slot
            }
            None => {
                let slot = self.entries.len();
                self.index.insert(key.clone(), slot);
                self.entries.push((key, 1));
                slot
            }
        }
    }

    /// The most frequent key; the earliest wins a tie.
    pub(crate) fn top(&self) -> Option<&K> {
        let mut best: Option<&(K, usize)> = None;
        for entry in &self.entries {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(k, _)| k)
    }

    pub(crate) fn into_entries(self) -> Vec<(K, usize)> {
        self.entries
    }
}
