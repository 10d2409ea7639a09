//! Deterministic consistency scoring.
//!
//! Each category starts at 95 and loses points for excess unique values,
//! one-off usages, near-duplicates and off-grid spacing, then is clamped
//! between a per-category floor and 100.

use crate::color::hex_to_rgb;
use crate::extraction::model::{ColorToken, ExtractionResult};

use super::model::{ConsistencyMetric, ConsistencyReport};

const BASE_SCORE: f64 = 95.0;
const MAX_TOP_ISSUES: usize = 5;

const COLOR_TARGET: usize = 12;
const COLOR_FLOOR: f64 = 20.0;
const TYPOGRAPHY_TARGET: usize = 8;
const TYPOGRAPHY_FLOOR: f64 = 30.0;
const SPACING_TARGET: usize = 9;
const SPACING_FLOOR: f64 = 30.0;
const SPACING_GRID_PX: f64 = 4.0;
const RADIUS_TARGET: usize = 5;
const RADIUS_FLOOR: f64 = 40.0;

/// RGB distance under which two distinct colors count as near-duplicates.
pub const NEAR_DUPLICATE_DISTANCE: f64 = 20.0;

/// Score an extraction across colors, typography, spacing and radius.
pub fn score_consistency_heuristic(result: &ExtractionResult) -> ConsistencyReport {
    let metrics = vec![
        score_colors(result),
        score_typography(result),
        score_spacing(result),
        score_radius(result),
    ];

    let mean = metrics.iter().map(|m| m.score).sum::<f64>() / metrics.len() as f64;
    let overall_score = mean.round() as u32;

    ConsistencyReport {
        overall_score,
        grade: grade_from_score(overall_score).to_string(),
        top_issues: metrics
            .iter()
            .flat_map(|m| m.issues.iter().cloned())
            .take(MAX_TOP_ISSUES)
            .collect(),
        recommendations: metrics
            .iter()
            .map(|m| m.recommendation.clone())
            .filter(|r| !r.is_empty())
            .collect(),
        metrics,
    }
}

/// Letter grade for a 0-100 score.
pub fn grade_from_score(score: u32) -> &'static str {
    match score {
        92.. => "A+",
        85..=91 => "A",
        78..=84 => "B+",
        70..=77 => "B",
        62..=69 => "B-",
        55..=61 => "C+",
        48..=54 => "C",
        40..=47 => "D",
        _ => "F",
    }
}

fn clamp_score(score: f64, floor: f64) -> f64 {
    score.min(100.0).max(floor)
}

fn excess(unique: usize, target: usize) -> f64 {
    unique.saturating_sub(target) as f64
}

fn score_colors(result: &ExtractionResult) -> ConsistencyMetric {
    let total = result.colors.iter().map(|c| c.count).sum();
    let unique = result.colors.len();
    let mut issues = Vec::new();

    if unique > 20 {
        issues.push(format!("{} unique colors detected, consider consolidating", unique));
    }
    let single_use = result.colors.iter().filter(|c| c.count == 1).count();
    if single_use > 3 {
        issues.push(format!("{} colors used only once, likely one-offs", single_use));
    }
    let near_dupes = count_near_duplicate_colors(&result.colors);
    if near_dupes > 0 {
        issues.push(format!("{} near-duplicate color pairs detected", near_dupes));
    }

    let score = clamp_score(
        BASE_SCORE
            - excess(unique, COLOR_TARGET) * 1.5
            - single_use as f64
            - near_dupes as f64 * 2.0,
        COLOR_FLOOR,
    );

    let recommendation = if unique > 16 {
        "Consolidate to 10-12 intentional colors with semantic naming."
    } else if unique > COLOR_TARGET {
        "Color palette is slightly large, check for near-duplicates."
    } else {
        "Color palette is well-contained."
    };

    ConsistencyMetric {
        category: "Colors".to_string(),
        score,
        total,
        unique,
        issues,
        recommendation: recommendation.to_string(),
    }
}

fn score_typography(result: &ExtractionResult) -> ConsistencyMetric {
    let unique = result.typography.len();
    let mut issues = Vec::new();

    if unique > 10 {
        issues.push(format!("{} font sizes, consider a stricter type scale", unique));
    }

    let score = clamp_score(
        BASE_SCORE - excess(unique, TYPOGRAPHY_TARGET) * 4.0,
        TYPOGRAPHY_FLOOR,
    );

    let recommendation = if unique > 10 {
        "Adopt a strict modular type scale (e.g., 12, 14, 16, 20, 24, 30, 36px)."
    } else {
        "Typography scale is well-contained."
    };

    ConsistencyMetric {
        category: "Typography".to_string(),
        score,
        total: result.typography.iter().map(|t| t.count).sum(),
        unique,
        issues,
        recommendation: recommendation.to_string(),
    }
}

fn score_spacing(result: &ExtractionResult) -> ConsistencyMetric {
    let unique = result.spacing.len();
    let mut issues = Vec::new();

    let off_grid = result
        .spacing
        .iter()
        .filter(|s| s.pixels % SPACING_GRID_PX != 0.0)
        .count();
    let off_grid_ratio = if unique > 0 {
        off_grid as f64 / unique as f64
    } else {
        0.0
    };
    if off_grid > 0 {
        issues.push(format!(
            "{} of {} spacing values fall outside a 4px grid",
            off_grid, unique
        ));
    }

    let score = clamp_score(
        BASE_SCORE - off_grid_ratio * 25.0 - excess(unique, SPACING_TARGET) * 3.0,
        SPACING_FLOOR,
    );

    let recommendation = if off_grid_ratio > 0.4 {
        "Align all spacing to a 4px (0.25rem) base grid."
    } else {
        "Spacing follows a reasonably consistent grid."
    };

    ConsistencyMetric {
        category: "Spacing".to_string(),
        score,
        total: result.spacing.iter().map(|s| s.count).sum(),
        unique,
        issues,
        recommendation: recommendation.to_string(),
    }
}

fn score_radius(result: &ExtractionResult) -> ConsistencyMetric {
    let unique = result.radius.len();
    let mut issues = Vec::new();

    if unique > 6 {
        issues.push(format!("{} border-radius values, simplify to 4-5 tokens", unique));
    }

    let score = clamp_score(
        BASE_SCORE - excess(unique, RADIUS_TARGET) * 5.0,
        RADIUS_FLOOR,
    );

    let recommendation = if unique > 6 {
        "Define 4-5 radius tokens (sm, md, lg, xl, full) and use them consistently."
    } else {
        "Border radius tokens are well-contained."
    };

    ConsistencyMetric {
        category: "Border Radius".to_string(),
        score,
        total: result.radius.iter().map(|r| r.count).sum(),
        unique,
        issues,
        recommendation: recommendation.to_string(),
    }
}

/// Count color pairs that are close but not identical in RGB space.
pub fn count_near_duplicate_colors(colors: &[ColorToken]) -> usize {
    let rgbs: Vec<_> = colors.iter().map(|c| hex_to_rgb(&c.hex)).collect();
    let mut count = 0;
    for (i, a) in rgbs.iter().enumerate() {
        for b in &rgbs[i + 1..] {
            let dist = a.distance(*b);
            if dist > 0.0 && dist < NEAR_DUPLICATE_DISTANCE {
                count += 1;
            }
        }
    }
    count
}
