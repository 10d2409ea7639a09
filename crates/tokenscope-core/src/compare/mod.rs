//! Comparison of two extractions.
//!
//! Tokens are aligned per category by lower-cased name. Colors get a second
//! chance by exact hex so that two independent naming passes which called
//! the same color something different still line up.

pub mod model;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::extraction::model::{
    ColorToken, ExtractionResult, RadiusToken, SpacingToken, TypographyToken,
};

pub use model::{
    CategoryDrift, ComparisonResult, DiffEntry, DiffStatus, DriftCounts, DriftScore, TokenDiff,
};

/// Anything that can be aligned by name.
pub trait NamedToken {
    fn token_name(&self) -> &str;
}

macro_rules! impl_named_token {
    ($($ty:ty),*) => {
        $(impl NamedToken for $ty {
            fn token_name(&self) -> &str {
                &self.name
            }
        })*
    };
}

impl_named_token!(ColorToken, TypographyToken, SpacingToken, RadiusToken);

/// Diff `b` (candidate) against `a` (baseline) and score the drift.
///
/// Both inputs are assumed well-formed; nothing is validated here.
pub fn compare_extractions(a: &ExtractionResult, b: &ExtractionResult) -> ComparisonResult {
    let diff = TokenDiff {
        colors: match_colors(&a.colors, &b.colors),
        typography: match_by_name(&a.typography, &b.typography, is_typography_changed),
        spacing: match_by_name(&a.spacing, &b.spacing, |x, y| x.pixels != y.pixels),
        radius: match_by_name(&a.radius, &b.radius, |x, y| x.pixels != y.pixels),
    };
    let drift = compute_drift(&diff);
    debug!(
        a = %a.url,
        b = %b.url,
        overall = drift.overall,
        "Compared extractions"
    );
    ComparisonResult { diff, drift }
}

/// Lower-cased name index preserving first-insertion order; a later
/// duplicate replaces the earlier value in place.
fn index_by_name<T: NamedToken>(items: &[T]) -> Vec<(String, &T)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut ordered: Vec<(String, &T)> = Vec::new();
    for item in items {
        let key = item.token_name().to_lowercase();
        match positions.get(&key) {
            Some(&pos) => ordered[pos].1 = item,
            None => {
                positions.insert(key.clone(), ordered.len());
                ordered.push((key, item));
            }
        }
    }
    ordered
}

fn sort_entries<T>(entries: &mut [DiffEntry<T>]) {
    entries.sort_by_key(|e| e.status.priority());
}

/// Strict name join. Names only in `a` are removed, only in `b` added.
pub fn match_by_name<T, F>(a_list: &[T], b_list: &[T], is_changed: F) -> Vec<DiffEntry<T>>
where
    T: NamedToken + Clone,
    F: Fn(&T, &T) -> bool,
{
    let a_index = index_by_name(a_list);
    let b_index = index_by_name(b_list);
    let b_lookup: HashMap<&str, &T> = b_index.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    let a_keys: HashSet<&str> = a_index.iter().map(|(k, _)| k.as_str()).collect();

    let mut entries = Vec::with_capacity(a_index.len() + b_index.len());

    for (key, a_item) in &a_index {
        let name = a_item.token_name();
        let entry = match b_lookup.get(key.as_str()) {
            None => DiffEntry::removed(name, (*a_item).clone()),
            Some(b_item) => {
                let status = if is_changed(a_item, b_item) {
                    DiffStatus::Changed
                } else {
                    DiffStatus::Unchanged
                };
                DiffEntry::paired(status, name, (*a_item).clone(), (*b_item).clone())
            }
        };
        entries.push(entry);
    }

    for (key, b_item) in &b_index {
        if !a_keys.contains(key.as_str()) {
            entries.push(DiffEntry::added(b_item.token_name(), (*b_item).clone()));
        }
    }

    sort_entries(&mut entries);
    entries
}

/// Name join with an exact-hex fallback.
///
/// Name matches are resolved for every baseline color first, so a hex
/// fallback can only claim a candidate color no name match wants. Each
/// candidate color is claimed at most once.
pub fn match_colors(a_list: &[ColorToken], b_list: &[ColorToken]) -> Vec<DiffEntry<ColorToken>> {
    let mut b_by_name: HashMap<String, usize> = HashMap::new();
    for (i, c) in b_list.iter().enumerate() {
        b_by_name.insert(c.name.to_lowercase(), i);
    }

    let mut claimed = vec![false; b_list.len()];
    let mut name_matches: Vec<Option<usize>> = Vec::with_capacity(a_list.len());
    for a in a_list {
        let hit = b_by_name
            .get(&a.name.to_lowercase())
            .copied()
            .filter(|&i| !claimed[i]);
        if let Some(i) = hit {
            claimed[i] = true;
        }
        name_matches.push(hit);
    }

    let mut entries = Vec::with_capacity(a_list.len() + b_list.len());

    for (a, name_match) in a_list.iter().zip(name_matches) {
        if let Some(i) = name_match {
            let b = &b_list[i];
            let status = if a.hex.eq_ignore_ascii_case(&b.hex) {
                DiffStatus::Unchanged
            } else {
                DiffStatus::Changed
            };
            entries.push(DiffEntry::paired(status, &a.name, a.clone(), b.clone()));
            continue;
        }

        let hex_match = b_list
            .iter()
            .enumerate()
            .position(|(i, b)| !claimed[i] && b.hex.eq_ignore_ascii_case(&a.hex));
        match hex_match {
            Some(i) => {
                claimed[i] = true;
                entries.push(DiffEntry::paired(
                    DiffStatus::Unchanged,
                    &a.name,
                    a.clone(),
                    b_list[i].clone(),
                ));
            }
            None => entries.push(DiffEntry::removed(&a.name, a.clone())),
        }
    }

    for (i, b) in b_list.iter().enumerate() {
        if !claimed[i] {
            entries.push(DiffEntry::added(&b.name, b.clone()));
        }
    }

    sort_entries(&mut entries);
    entries
}

fn is_typography_changed(a: &TypographyToken, b: &TypographyToken) -> bool {
    a.font_size != b.font_size
        || a.font_weight != b.font_weight
        || a.font_family != b.font_family
        || a.line_height != b.line_height
        || a.letter_spacing != b.letter_spacing
}

/// 0-100 similarity for one category; 100 when both sides are empty.
pub fn category_drift_score<T>(entries: &[DiffEntry<T>]) -> u32 {
    let total_a = entries.iter().filter(|e| e.a.is_some()).count();
    let total_b = entries.iter().filter(|e| e.b.is_some()).count();
    let max = total_a.max(total_b);
    if max == 0 {
        return 100;
    }
    let diffs = entries.iter().filter(|e| e.status.is_drift()).count();
    (100.0 - (diffs as f64 / max as f64) * 100.0).round().max(0.0) as u32
}

fn tally<T>(counts: &mut DriftCounts, entries: &[DiffEntry<T>]) {
    for e in entries {
        match e.status {
            DiffStatus::Added => counts.added += 1,
            DiffStatus::Removed => counts.removed += 1,
            DiffStatus::Changed => counts.changed += 1,
            DiffStatus::Unchanged => counts.unchanged += 1,
        }
        if e.a.is_some() {
            counts.total_a += 1;
        }
        if e.b.is_some() {
            counts.total_b += 1;
        }
    }
}

fn compute_drift(diff: &TokenDiff) -> DriftScore {
    let by_category = CategoryDrift {
        colors: category_drift_score(&diff.colors),
        typography: category_drift_score(&diff.typography),
        spacing: category_drift_score(&diff.spacing),
        radius: category_drift_score(&diff.radius),
    };

    let mut counts = DriftCounts::default();
    tally(&mut counts, &diff.colors);
    tally(&mut counts, &diff.typography);
    tally(&mut counts, &diff.spacing);
    tally(&mut counts, &diff.radius);

    let sum = by_category.colors + by_category.typography + by_category.spacing + by_category.radius;
    let overall = (sum as f64 / 4.0).round() as u32;

    DriftScore { overall, by_category, counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hex_to_rgb;

    fn color(name: &str, hex: &str) -> ColorToken {
        ColorToken {
            name: name.to_string(),
            hex: hex.to_string(),
            rgb: hex_to_rgb(hex),
            usage: "General".to_string(),
            count: 1,
        }
    }

    fn spacing(name: &str, px: f64) -> SpacingToken {
        SpacingToken {
            name: name.to_string(),
            value: format!("{}px", px),
            pixels: px,
            usage: String::new(),
            count: 1,
        }
    }

    fn typo(name: &str, size: &str, weight: u16) -> TypographyToken {
        TypographyToken {
            name: name.to_string(),
            font_family: "Inter".to_string(),
            font_size: size.to_string(),
            font_weight: weight,
            line_height: "1.5".to_string(),
            letter_spacing: "0".to_string(),
            usage: String::new(),
            count: 1,
        }
    }

    fn result(colors: Vec<ColorToken>, spacing: Vec<SpacingToken>) -> ExtractionResult {
        ExtractionResult {
            url: "https://example.com".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            colors,
            typography: vec![typo("body", "16px", 400)],
            spacing,
            radius: vec![],
        }
    }

    fn statuses<T>(entries: &[DiffEntry<T>]) -> Vec<(DiffStatus, &str)> {
        entries.iter().map(|e| (e.status, e.name.as_str())).collect()
    }

    #[test]
    fn test_self_comparison_is_unchanged() {
        let a = result(
            vec![color("primary", "#3B82F6"), color("white", "#FFFFFF")],
            vec![spacing("xs", 4.0), spacing("sm", 8.0)],
        );
        let cmp = compare_extractions(&a, &a);
        assert!(cmp.diff.colors.iter().all(|e| e.status == DiffStatus::Unchanged));
        assert!(cmp.diff.spacing.iter().all(|e| e.status == DiffStatus::Unchanged));
        assert_eq!(cmp.drift.overall, 100);
        assert_eq!(cmp.drift.counts.unchanged, 5);
        assert_eq!(cmp.drift.counts.total_a, 5);
        assert_eq!(cmp.drift.counts.total_b, 5);
    }

    #[test]
    fn test_hex_fallback_for_renamed_color() {
        let a = result(vec![color("primary", "#FF0000")], vec![]);
        let b = result(vec![color("accent", "#ff0000")], vec![]);
        let cmp = compare_extractions(&a, &b);
        assert_eq!(statuses(&cmp.diff.colors), vec![(DiffStatus::Unchanged, "primary")]);
        assert_eq!(cmp.diff.colors[0].b.as_ref().unwrap().name, "accent");
        assert_eq!(cmp.drift.by_category.colors, 100);
    }

    #[test]
    fn test_hex_fallback_skips_name_claimed_color() {
        // b's "primary" is wanted by a's "primary" by name, so a's "brand"
        // cannot steal it by hex even though it comes first.
        let a = result(vec![color("brand", "#FF0000"), color("primary", "#00FF00")], vec![]);
        let b = result(vec![color("primary", "#FF0000")], vec![]);
        let cmp = compare_extractions(&a, &b);
        assert_eq!(
            statuses(&cmp.diff.colors),
            vec![(DiffStatus::Removed, "brand"), (DiffStatus::Changed, "primary")]
        );
    }

    #[test]
    fn test_sort_order_removed_changed_added_unchanged() {
        let a = result(
            vec![color("primary", "#111111"), color("gone", "#222222"), color("same", "#333333")],
            vec![],
        );
        let b = result(
            vec![color("same", "#333333"), color("new", "#444444"), color("primary", "#999999")],
            vec![],
        );
        let cmp = compare_extractions(&a, &b);
        assert_eq!(
            statuses(&cmp.diff.colors),
            vec![
                (DiffStatus::Removed, "gone"),
                (DiffStatus::Changed, "primary"),
                (DiffStatus::Added, "new"),
                (DiffStatus::Unchanged, "same"),
            ]
        );
        // 3 drifted of max(3, 3)
        assert_eq!(cmp.drift.by_category.colors, 0);
    }

    #[test]
    fn test_spacing_name_join_is_case_insensitive() {
        let a = result(vec![], vec![spacing("XS", 4.0), spacing("md", 16.0)]);
        let b = result(vec![], vec![spacing("xs", 4.0), spacing("md", 12.0), spacing("lg", 24.0)]);
        let cmp = compare_extractions(&a, &b);
        assert_eq!(
            statuses(&cmp.diff.spacing),
            vec![
                (DiffStatus::Changed, "md"),
                (DiffStatus::Added, "lg"),
                (DiffStatus::Unchanged, "XS"),
            ]
        );
        // 2 drifted of max(2, 3): round(33.3)
        assert_eq!(cmp.drift.by_category.spacing, 33);
    }

    #[test]
    fn test_typography_change_detection() {
        let mut a = result(vec![], vec![]);
        let mut b = result(vec![], vec![]);
        a.typography = vec![typo("heading-1", "24px", 700), typo("body", "16px", 400)];
        b.typography = vec![typo("heading-1", "24px", 600), typo("body", "16px", 400)];
        let cmp = compare_extractions(&a, &b);
        assert_eq!(
            statuses(&cmp.diff.typography),
            vec![(DiffStatus::Changed, "heading-1"), (DiffStatus::Unchanged, "body")]
        );
        assert_eq!(cmp.drift.by_category.typography, 50);
    }

    #[test]
    fn test_empty_categories_score_full() {
        let a = result(vec![], vec![]);
        let cmp = compare_extractions(&a, &a);
        assert_eq!(cmp.drift.by_category.colors, 100);
        assert_eq!(cmp.drift.by_category.radius, 100);
        assert_eq!(cmp.drift.overall, 100);
    }

    #[test]
    fn test_disjoint_category_clamps_to_zero() {
        let a = result(vec![color("a", "#111111"), color("b", "#222222")], vec![]);
        let b = result(vec![color("c", "#333333"), color("d", "#444444")], vec![]);
        let cmp = compare_extractions(&a, &b);
        assert_eq!(cmp.drift.by_category.colors, 0);
        assert_eq!(cmp.drift.counts.removed, 2);
        assert_eq!(cmp.drift.counts.added, 2);
        // colors 0, typography 100, spacing 100, radius 100
        assert_eq!(cmp.drift.overall, 75);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&DiffStatus::Unchanged).unwrap();
        assert_eq!(json, "\"unchanged\"");
        let counts = serde_json::to_value(DriftCounts::default()).unwrap();
        assert!(counts.get("totalA").is_some());
    }
}
