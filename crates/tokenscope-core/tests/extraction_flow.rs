//! End-to-end parse, name, score and compare flow.

use tokenscope_core::compare::DiffStatus;
use tokenscope_core::consistency::HeuristicScorer;
use tokenscope_core::miner::to_pixels;
use tokenscope_core::naming::HeuristicNamer;
use tokenscope_core::{
    compare_extractions, extract_tokens, name_tokens_heuristic, parse_css,
    score_consistency_heuristic, ExtractionResult,
};

const SITE_V1: &str = r#"
:root { --brand: #2563eb; }
body { color: #111827; background-color: #ffffff; font-family: "Inter", sans-serif; font-size: 16px; font-weight: 400; line-height: 1.5 }
a { color: #2563eb; text-decoration-color: #2563eb }
h1 { font-size: 48px; font-weight: 800; line-height: 1.1 }
h2 { font-size: 30px; font-weight: 700 }
h3 { font-size: 20px; font-weight: 600 }
small { font-size: 12px; color: #6b7280 }
.btn { background: #2563eb; color: #fff; padding: 8px 16px; border-radius: 6px }
.btn:hover { background: #1d4ed8 }
.card { border: 1px solid #e5e7eb; border-radius: 12px; padding: 24px; margin-bottom: 1rem }
.alert { color: #dc2626; border-color: #dc2626; gap: 4px }
.pill { border-radius: 9999px; padding: 4px 12px }
"#;

fn name_pass(css: &str) -> ExtractionResult {
    name_tokens_heuristic(&parse_css(css), "https://site.test")
}

#[test]
fn test_red_color_counted_once_across_properties() {
    let raw = parse_css("body { color: #FF0000; background-color: #ff0000; }");
    assert_eq!(raw.colors.len(), 1);
    let red = &raw.colors[0];
    assert_eq!(red.hex, "#FF0000");
    assert_eq!(red.count, 2);
    assert!(red.properties.iter().any(|p| p == "color"));
    assert!(red.properties.iter().any(|p| p == "background-color"));
}

#[test]
fn test_pixel_conversion_contract() {
    assert_eq!(to_pixels("1rem"), 16.0);
    assert_eq!(to_pixels("16px"), 16.0);
    assert_eq!(to_pixels("12pt"), 16.0);
    assert_eq!(to_pixels("50%"), 0.0);
}

#[test]
fn test_naming_is_idempotent_apart_from_timestamp() {
    let raw = parse_css(SITE_V1);
    let mut first = name_tokens_heuristic(&raw, "https://site.test");
    let second = name_tokens_heuristic(&raw, "https://site.test");
    first.timestamp = second.timestamp.clone();
    assert_eq!(first, second);
}

#[test]
fn test_site_tokens_named() {
    let result = name_pass(SITE_V1);

    let names: Vec<&str> = result.colors.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(&names[..3], &["primary", "secondary", "accent"]);
    assert!(names.contains(&"white"));
    let primary = &result.colors[0];
    assert_eq!(primary.hex, "#2563EB");

    let typo: Vec<(&str, &str)> = result
        .typography
        .iter()
        .map(|t| (t.font_size.as_str(), t.name.as_str()))
        .collect();
    assert_eq!(
        typo,
        vec![
            ("48px", "display"),
            ("30px", "heading-1"),
            ("20px", "heading-2"),
            ("16px", "body"),
            ("12px", "caption"),
        ]
    );
    assert_eq!(result.typography[3].font_family, "Inter");

    // 1rem and 16px collapse into one token.
    let spacing: Vec<f64> = result.spacing.iter().map(|s| s.pixels).collect();
    assert_eq!(spacing, vec![4.0, 8.0, 12.0, 16.0, 24.0]);
    assert_eq!(result.spacing[0].name, "xs");

    let radius: Vec<&str> = result.radius.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(radius, vec!["sm", "base", "full"]);
}

#[test]
fn test_report_shape() {
    let result = name_pass(SITE_V1);
    let report = score_consistency_heuristic(&result);
    assert_eq!(report.metrics.len(), 4);
    assert!(report.overall_score <= 100);
    assert!(report.top_issues.len() <= 5);
    assert_eq!(report.recommendations.len(), 4);
    assert_eq!(report.metrics[0].unique, result.colors.len());
}

#[test]
fn test_self_compare_is_all_unchanged() {
    let result = name_pass(SITE_V1);
    let cmp = compare_extractions(&result, &result);
    assert_eq!(cmp.drift.overall, 100);
    assert_eq!(cmp.drift.counts.added + cmp.drift.counts.removed + cmp.drift.counts.changed, 0);
    assert_eq!(cmp.drift.counts.unchanged, result.token_count());
}

#[test]
fn test_redesign_drift() {
    let before = name_pass(SITE_V1);
    let redesign = SITE_V1
        .replace("#2563eb", "#7c3aed")
        .replace("border-radius: 12px", "border-radius: 16px");
    let after = name_pass(&redesign);
    let cmp = compare_extractions(&before, &after);

    let primary = cmp.diff.colors.iter().find(|e| e.name == "primary").unwrap();
    assert_eq!(primary.status, DiffStatus::Changed);
    assert_eq!(primary.b.as_ref().unwrap().hex, "#7C3AED");

    let base = cmp.diff.radius.iter().find(|e| e.name == "base").unwrap();
    assert_eq!(base.status, DiffStatus::Changed);

    assert_eq!(cmp.diff.typography.iter().filter(|e| e.status.is_drift()).count(), 0);
    assert!(cmp.drift.overall < 100);
    assert_eq!(cmp.drift.by_category.typography, 100);
}

#[tokio::test]
async fn test_pipeline_end_to_end() {
    let out = extract_tokens(SITE_V1, "https://site.test", &HeuristicNamer, &HeuristicScorer)
        .await
        .unwrap();
    let json = serde_json::to_value(&out.extraction).unwrap();
    assert!(json["typography"][0].get("fontFamily").is_some());
    let report = serde_json::to_value(&out.report).unwrap();
    assert!(report.get("overallScore").is_some());
    assert!(report.get("topIssues").is_some());
}
