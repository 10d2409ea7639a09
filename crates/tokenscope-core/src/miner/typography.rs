//! Typography mining.
//!
//! Works per declaration block so that font properties declared together
//! stay together, then pivots on `font-size`.

use std::sync::LazyLock;

use regex::Regex;

use super::model::RawTypography;
use super::units::to_pixels;
use super::Tally;

const DEFAULT_FAMILY: &str = "sans-serif";
const DEFAULT_WEIGHT: u16 = 400;
const DEFAULT_LINE_HEIGHT: &str = "1.5";
const DEFAULT_LETTER_SPACING: &str = "0";

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^}]+)\}").unwrap());

static FAMILY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)font-family\s*:\s*([^;]+)").unwrap());
static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)font-size\s*:\s*([^;]+)").unwrap());
static WEIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)font-weight\s*:\s*([^;]+)").unwrap());
static LINE_HEIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)line-height\s*:\s*([^;]+)").unwrap());
static LETTER_SPACING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)letter-spacing\s*:\s*([^;]+)").unwrap());
static FONT_SHORTHAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|;)\s*font\s*:\s*([^;]+)").unwrap());

static SHORTHAND_WEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{3})\b").unwrap());
static SHORTHAND_BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bbold\b").unwrap());
static SHORTHAND_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\d.]+(?:px|rem|em))\s*(?:/([\d.]+(?:px|rem|em|%)?))?\s").unwrap()
});
static SHORTHAND_FAMILY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[\d.]+(?:px|rem|em)(?:\s*/\s*[\d.]+(?:px|rem|em|%)?)?)\s+(.+)$").unwrap()
});

/// Font properties that co-occur in one declaration block.
#[derive(Debug, Clone, Default, PartialEq)]
struct FontCombo {
    family: Option<String>,
    size: Option<String>,
    weight: Option<u16>,
    line_height: Option<String>,
    letter_spacing: Option<String>,
}

/// Per-field frequency counters over a set of combos.
struct FieldTallies {
    families: Tally<String>,
    weights: Tally<u16>,
    line_heights: Tally<String>,
    letter_spacings: Tally<String>,
}

impl FieldTallies {
    fn from_combos<'a>(combos: impl IntoIterator<Item = &'a FontCombo>) -> Self {
        let mut tallies = Self {
            families: Tally::new(),
            weights: Tally::new(),
            line_heights: Tally::new(),
            letter_spacings: Tally::new(),
        };
        for combo in combos {
            if let Some(family) = &combo.family {
                tallies.families.add(family.clone());
            }
            if let Some(weight) = combo.weight {
                tallies.weights.add(weight);
            }
            if let Some(lh) = &combo.line_height {
                tallies.line_heights.add(lh.clone());
            }
            if let Some(ls) = &combo.letter_spacing {
                tallies.letter_spacings.add(ls.clone());
            }
        }
        tallies
    }
}

/// Group declaration blocks by font-size, resolving the other font fields to
/// their most frequent value within the size group, falling back to the most
/// frequent value across all blocks. Largest size first.
pub fn extract_typography(css: &str) -> Vec<RawTypography> {
    let combos: Vec<FontCombo> = BLOCK_RE
        .captures_iter(css)
        .filter_map(|caps| caps.get(1).map(|m| parse_block(m.as_str())))
        .filter(|combo| combo.size.is_some())
        .collect();

    let global = FieldTallies::from_combos(&combos);
    let default_family = global.families.top().cloned().unwrap_or_else(|| DEFAULT_FAMILY.to_string());
    let default_weight = global.weights.top().copied().unwrap_or(DEFAULT_WEIGHT);
    let default_line_height = global
        .line_heights
        .top()
        .cloned()
        .unwrap_or_else(|| DEFAULT_LINE_HEIGHT.to_string());
    let default_letter_spacing = global
        .letter_spacings
        .top()
        .cloned()
        .unwrap_or_else(|| DEFAULT_LETTER_SPACING.to_string());

    // Size groups in first-seen order.
    let mut sizes: Tally<String> = Tally::new();
    let mut groups: Vec<Vec<&FontCombo>> = Vec::new();
    for combo in &combos {
        let Some(size) = &combo.size else { continue };
        let slot = sizes.add(size.clone());
        if slot == groups.len() {
            groups.push(Vec::new());
        }
        groups[slot].push(combo);
    }

    let mut results: Vec<RawTypography> = sizes
        .into_entries()
        .into_iter()
        .zip(groups)
        .map(|((size, count), group)| {
            let local = FieldTallies::from_combos(group.iter().copied());
            RawTypography {
                font_family: local.families.top().cloned().unwrap_or_else(|| default_family.clone()),
                font_size: size,
                font_weight: local.weights.top().copied().unwrap_or(default_weight),
                line_height: local
                    .line_heights
                    .top()
                    .cloned()
                    .unwrap_or_else(|| default_line_height.clone()),
                letter_spacing: local
                    .letter_spacings
                    .top()
                    .cloned()
                    .unwrap_or_else(|| default_letter_spacing.clone()),
                count,
            }
        })
        .collect();

    results.sort_by(|a, b| to_pixels(&b.font_size).total_cmp(&to_pixels(&a.font_size)));
    results
}

fn first_value<'a>(re: &Regex, block: &'a str) -> Option<&'a str> {
    re.captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// First family in a font stack, unquoted.
fn primary_family(stack: &str) -> String {
    stack
        .split(',')
        .next()
        .unwrap_or_default()
        .replace(['"', '\''], "")
        .trim()
        .to_string()
}

fn parse_block(block: &str) -> FontCombo {
    let mut combo = FontCombo {
        family: first_value(&FAMILY_RE, block).map(primary_family),
        size: first_value(&SIZE_RE, block)
            .filter(|v| !v.starts_with("var("))
            .map(str::to_string),
        weight: first_value(&WEIGHT_RE, block).and_then(parse_font_weight),
        line_height: first_value(&LINE_HEIGHT_RE, block)
            .filter(|v| *v != "normal")
            .map(str::to_string),
        letter_spacing: first_value(&LETTER_SPACING_RE, block)
            .filter(|v| *v != "normal")
            .map(str::to_string),
    };

    if let Some(shorthand) = first_value(&FONT_SHORTHAND_RE, block) {
        apply_font_shorthand(&mut combo, shorthand);
    }

    combo
}

/// Fill gaps in `combo` from a `font:` shorthand such as
/// `700 16px/24px "Inter", sans-serif`. Longhands always win.
fn apply_font_shorthand(combo: &mut FontCombo, value: &str) {
    if combo.weight.is_none() {
        combo.weight = SHORTHAND_WEIGHT_RE
            .captures(value)
            .and_then(|caps| caps[1].parse::<u16>().ok())
            .filter(|w| (100..=900).contains(w));
    }
    if combo.weight.is_none() && SHORTHAND_BOLD_RE.is_match(value) {
        combo.weight = Some(700);
    }

    if let Some(caps) = SHORTHAND_SIZE_RE.captures(value) {
        if combo.size.is_none() {
            combo.size = Some(caps[1].to_string());
        }
        if combo.line_height.is_none() {
            combo.line_height = caps.get(2).map(|m| m.as_str().to_string());
        }
    }

    if combo.family.is_none() {
        combo.family = SHORTHAND_FAMILY_RE
            .captures(value)
            .map(|caps| primary_family(&caps[1]));
    }
}

/// Numeric weights 100-900 (leading integer, as `parseInt` would read it)
/// or the keywords `normal`, `bold`, `lighter`, `bolder`.
fn parse_font_weight(value: &str) -> Option<u16> {
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    if let Ok(n) = digits.parse::<u16>() {
        if (100..=900).contains(&n) {
            return Some(n);
        }
    }
    match value.to_lowercase().as_str() {
        "normal" => Some(400),
        "bold" | "bolder" => Some(700),
        "lighter" => Some(300),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_weight_within_size_group() {
        let css = ".a { font-size: 16px; font-weight: 400 }
                   .b { font-size: 16px; font-weight: 400 }
                   .c { font-size: 16px; font-weight: 700 }";
        let typo = extract_typography(css);
        assert_eq!(typo.len(), 1);
        assert_eq!(typo[0].font_size, "16px");
        assert_eq!(typo[0].font_weight, 400);
        assert_eq!(typo[0].count, 3);
    }

    #[test]
    fn test_global_fallback_for_missing_fields() {
        let css = "body { font-family: 'Inter', sans-serif; font-size: 16px; line-height: 1.6 }
                   h1 { font-size: 2rem; font-weight: bold }";
        let typo = extract_typography(css);
        assert_eq!(typo.len(), 2);

        // Sorted largest first.
        let h1 = &typo[0];
        assert_eq!(h1.font_size, "2rem");
        assert_eq!(h1.font_weight, 700);
        assert_eq!(h1.font_family, "Inter");
        assert_eq!(h1.line_height, "1.6");
        assert_eq!(h1.letter_spacing, "0");

        let body = &typo[1];
        assert_eq!(body.font_weight, 700);
    }

    #[test]
    fn test_defaults_when_nothing_declared() {
        let typo = extract_typography("p { font-size: 14px }");
        assert_eq!(typo[0].font_family, "sans-serif");
        assert_eq!(typo[0].font_weight, 400);
        assert_eq!(typo[0].line_height, "1.5");
        assert_eq!(typo[0].letter_spacing, "0");
    }

    #[test]
    fn test_blocks_without_size_or_with_var_are_discarded() {
        let css = "a { font-weight: 700 } b { font-size: var(--text-lg) }";
        assert!(extract_typography(css).is_empty());
    }

    #[test]
    fn test_font_shorthand() {
        let css = ".btn { font: 600 14px/20px \"Uber Move\", Helvetica, sans-serif; }";
        let typo = extract_typography(css);
        assert_eq!(typo.len(), 1);
        assert_eq!(typo[0].font_size, "14px");
        assert_eq!(typo[0].line_height, "20px");
        assert_eq!(typo[0].font_weight, 600);
        assert_eq!(typo[0].font_family, "Uber Move");
    }

    #[test]
    fn test_shorthand_bold_keyword_and_longhand_precedence() {
        let css = "h2 { font-size: 24px; font: bold 18px Georgia }";
        let typo = extract_typography(css);
        assert_eq!(typo[0].font_size, "24px");
        assert_eq!(typo[0].font_weight, 700);
        assert_eq!(typo[0].font_family, "Georgia");
    }

    #[test]
    fn test_normal_line_height_ignored() {
        let typo = extract_typography("p { font-size: 12px; line-height: normal; letter-spacing: normal }");
        assert_eq!(typo[0].line_height, "1.5");
        assert_eq!(typo[0].letter_spacing, "0");
    }

    #[test]
    fn test_parse_font_weight() {
        assert_eq!(parse_font_weight("500"), Some(500));
        assert_eq!(parse_font_weight("950"), None);
        assert_eq!(parse_font_weight("Bold"), Some(700));
        assert_eq!(parse_font_weight("lighter"), Some(300));
        assert_eq!(parse_font_weight("inherit"), None);
    }
}
