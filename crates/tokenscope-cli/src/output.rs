//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use tokenscope_core::color::{hex_to_rgb, should_use_white_text};
use tokenscope_core::compare::{ComparisonResult, DiffEntry, DiffStatus};
use tokenscope_core::consistency::ConsistencyReport;
use tokenscope_core::extraction::ExtractionResult;
use tokenscope_core::store::SavedExtraction;
use unicode_width::UnicodeWidthStr;

/// Print a short token count + grade summary for a fresh extraction.
pub fn print_extraction_summary(result: &ExtractionResult, report: &ConsistencyReport) {
    println!("{} {}", "Tokens for".bold(), result.url.cyan().bold());
    println!(
        "  {} {} colors  {} {} type styles  {} {} spacing  {} {} radius",
        "•".dimmed(),
        result.colors.len().to_string().bold(),
        "•".dimmed(),
        result.typography.len().to_string().bold(),
        "•".dimmed(),
        result.spacing.len().to_string().bold(),
        "•".dimmed(),
        result.radius.len().to_string().bold(),
    );
    let families = result.font_families();
    if !families.is_empty() {
        println!("  {} Fonts: {}", "•".dimmed(), families.join(", "));
    }
    println!();

    if !result.colors.is_empty() {
        print!("  ");
        for c in result.colors.iter().take(term_width().saturating_sub(4) / 3) {
            print!("{} ", swatch(&c.hex, "  "));
        }
        println!();
        println!();
    }

    print_report(report);
}

/// Print a consistency report.
pub fn print_report(report: &ConsistencyReport) {
    println!(
        "{} {} {}",
        "Consistency".bold(),
        grade_colored(&report.grade, report.overall_score),
        format!("({}/100)", report.overall_score).dimmed()
    );
    println!("{}", "─".repeat(term_width().min(60)).dimmed());

    for m in &report.metrics {
        let score = m.score.round() as u32;
        println!(
            "  {} {} {}",
            pad_right(&m.category, 16),
            score_bar(score, 20),
            score_colored(score)
        );
        println!(
            "    {}",
            format!("{} unique · {} uses", m.unique, m.total).dimmed()
        );
    }

    if !report.top_issues.is_empty() {
        println!();
        println!("{}", "Top issues".bold());
        for issue in &report.top_issues {
            println!("  {} {}", "!".yellow(), issue);
        }
    }

    if !report.recommendations.is_empty() {
        println!();
        println!("{}", "Recommendations".bold());
        for rec in &report.recommendations {
            println!("  {} {}", "→".dimmed(), rec);
        }
    }
}

/// Print saved extractions as a table.
pub fn print_extractions_table(saved: &[SavedExtraction]) {
    if saved.is_empty() {
        println!("{}", "No saved extractions. Run 'tokenscope extract <url>' first.".dimmed());
        return;
    }

    let url_width = term_width().saturating_sub(10 + 22 + 8 + 8).clamp(20, 60);

    println!(
        "{} {} {} {} {}",
        pad_right("ID", 10),
        pad_right("URL", url_width),
        pad_right("Created", 22),
        pad_right("Grade", 6),
        "Tokens"
    );
    println!("{}", "─".repeat(10 + url_width + 22 + 6 + 10));

    for s in saved {
        let grade = pad_right(&s.report.grade, 6);
        println!(
            "{} {} {} {} {}",
            pad_right(short_id(&s.id), 10),
            pad_right(&truncate_visual(&s.url, url_width), url_width),
            pad_right(&short_timestamp(&s.created_at), 22).dimmed(),
            grade_colored(&grade, s.report.overall_score),
            s.result.token_count()
        );
    }

    println!();
    println!("{} extraction(s) total", saved.len());
}

/// Print every token table of one extraction.
pub fn print_tokens(saved: &SavedExtraction) {
    let result = &saved.result;
    println!("{} {}", result.url.cyan().bold(), format!("({})", saved.id).dimmed());
    println!("{}: {}", "Extracted".bold(), result.timestamp);
    println!(
        "{}: {} {}",
        "Grade".bold(),
        grade_colored(&saved.report.grade, saved.report.overall_score),
        format!("({}/100)", saved.report.overall_score).dimmed()
    );

    let width = term_width();
    let usage_width = width.saturating_sub(2 + 16 + 10 + 6 + 4).clamp(10, 50);

    section("Colors", result.colors.len());
    for c in &result.colors {
        println!(
            "  {} {} {} {} {}",
            swatch(&c.hex, "  "),
            pad_right(&c.name, 16),
            pad_right(&c.hex, 8),
            pad_right(&format!("{}x", c.count), 5).dimmed(),
            truncate_visual(&c.usage, usage_width).dimmed()
        );
    }

    section("Typography", result.typography.len());
    for t in &result.typography {
        println!(
            "  {} {} {} {} {}",
            pad_right(&t.name, 14),
            pad_right(&t.font_size, 8),
            pad_right(&t.font_weight.to_string(), 4),
            pad_right(&format!("{}/{}", t.line_height, t.letter_spacing), 12).dimmed(),
            truncate_visual(&t.font_family, 24)
        );
    }

    section("Spacing", result.spacing.len());
    for s in &result.spacing {
        println!(
            "  {} {} {} {}",
            pad_right(&s.name, 10),
            pad_right(&s.value, 8),
            pad_right(&format!("{}px", s.pixels), 8).dimmed(),
            "▪".repeat(((s.pixels / 4.0).round() as usize).clamp(1, 32)).cyan()
        );
    }

    section("Radius", result.radius.len());
    for r in &result.radius {
        println!(
            "  {} {} {} {}",
            pad_right(&r.name, 10),
            pad_right(&r.value, 8),
            pad_right(&format!("{}px", r.pixels), 10).dimmed(),
            r.usage.dimmed()
        );
    }
}

/// Print a comparison between two saved extractions.
pub fn print_comparison(
    a: &SavedExtraction,
    b: &SavedExtraction,
    cmp: &ComparisonResult,
    show_unchanged: bool,
) {
    println!("{} {}", "A".bold(), format!("{} ({})", a.url, short_id(&a.id)).dimmed());
    println!("{} {}", "B".bold(), format!("{} ({})", b.url, short_id(&b.id)).dimmed());
    println!();

    let drift = &cmp.drift;
    println!(
        "{} {}",
        "Similarity".bold(),
        score_colored(drift.overall)
    );
    println!("{}", "─".repeat(term_width().min(60)).dimmed());
    for (label, score) in [
        ("Colors", drift.by_category.colors),
        ("Typography", drift.by_category.typography),
        ("Spacing", drift.by_category.spacing),
        ("Radius", drift.by_category.radius),
    ] {
        println!("  {} {} {}", pad_right(label, 12), score_bar(score, 20), score_colored(score));
    }
    println!(
        "  {} added  {} removed  {} changed  {} unchanged",
        drift.counts.added.to_string().green(),
        drift.counts.removed.to_string().red(),
        drift.counts.changed.to_string().yellow(),
        drift.counts.unchanged.to_string().dimmed(),
    );

    diff_section("Colors", &cmp.diff.colors, show_unchanged, |c| {
        format!("{} {}", swatch(&c.hex, "  "), c.hex)
    });
    diff_section("Typography", &cmp.diff.typography, show_unchanged, |t| {
        format!("{} {} {}", t.font_size, t.font_weight, t.font_family)
    });
    diff_section("Spacing", &cmp.diff.spacing, show_unchanged, |s| s.value.clone());
    diff_section("Radius", &cmp.diff.radius, show_unchanged, |r| r.value.clone());
}

fn diff_section<T>(
    title: &str,
    entries: &[DiffEntry<T>],
    show_unchanged: bool,
    describe: impl Fn(&T) -> String,
) {
    let visible: Vec<&DiffEntry<T>> = entries
        .iter()
        .filter(|e| show_unchanged || e.status.is_drift())
        .collect();
    if visible.is_empty() {
        return;
    }

    section(title, visible.len());
    for e in visible {
        let detail = match (&e.a, &e.b) {
            (Some(a), Some(b)) if e.status == DiffStatus::Changed => {
                format!("{} {} {}", describe(a), "→".dimmed(), describe(b))
            }
            (_, Some(b)) if e.status == DiffStatus::Added => describe(b),
            (Some(a), _) => describe(a),
            (None, Some(b)) => describe(b),
            (None, None) => String::new(),
        };
        println!(
            "  {} {} {}",
            status_marker(e.status),
            pad_right(&e.name, 16),
            detail
        );
    }
}

fn section(title: &str, count: usize) {
    println!();
    println!("{} {}", title.bold(), format!("({})", count).dimmed());
}

fn status_marker(status: DiffStatus) -> ColoredString {
    match status {
        DiffStatus::Removed => "-".red().bold(),
        DiffStatus::Changed => "~".yellow().bold(),
        DiffStatus::Added => "+".green().bold(),
        DiffStatus::Unchanged => "=".dimmed(),
    }
}

/// Color a grade by score band.
pub fn grade_colored(grade: &str, score: u32) -> ColoredString {
    match score {
        85.. => grade.green().bold(),
        70..=84 => grade.cyan().bold(),
        55..=69 => grade.yellow().bold(),
        _ => grade.red().bold(),
    }
}

fn score_colored(score: u32) -> ColoredString {
    let text = format!("{:>3}", score);
    match score {
        85.. => text.green(),
        70..=84 => text.cyan(),
        55..=69 => text.yellow(),
        _ => text.red(),
    }
}

fn score_bar(score: u32, width: usize) -> String {
    let filled = (score.min(100) as usize * width) / 100;
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(width - filled).dimmed()
    )
}

/// `text` on a background of `hex`, with a readable foreground.
fn swatch(hex: &str, text: &str) -> ColoredString {
    let rgb = hex_to_rgb(hex);
    let cell = text.on_truecolor(rgb.r, rgb.g, rgb.b);
    if should_use_white_text(hex) {
        cell.white()
    } else {
        cell.black()
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// `2024-01-01T10:00:00.123+00:00` → `2024-01-01 10:00:00`.
fn short_timestamp(ts: &str) -> String {
    ts.get(..19).map(|s| s.replacen('T', " ", 1)).unwrap_or_else(|| ts.to_string())
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_visual() {
        assert_eq!(truncate_visual("https://example.com", 40), "https://example.com");
        assert_eq!(truncate_visual("https://example.com/a/long/path", 12), "https://ex..");
        assert_eq!(truncate_visual("abcdef", 3), "...");
    }

    #[test]
    fn test_pad_right_uses_visual_width() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_right("色", 4), "色  ");
        assert_eq!(pad_right("abcdef", 4), "abcdef");
    }

    #[test]
    fn test_short_helpers() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_timestamp("2024-01-01T10:00:00.123+00:00"), "2024-01-01 10:00:00");
        assert_eq!(short_timestamp("n/a"), "n/a");
    }
}
