//! CSS length conversion.

use std::sync::LazyLock;

use regex::Regex;

/// Root font size assumed for `rem`/`em` conversion.
pub const ROOT_FONT_PX: f64 = 16.0;

static LEADING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap()
});

/// Parse the leading numeric prefix of `value` (`"1.5rem"` -> `1.5`).
///
/// Returns `None` when the string does not start with a number.
pub fn parse_float(value: &str) -> Option<f64> {
    LEADING_NUMBER_RE
        .find(value)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
}

/// Convert a CSS length to an approximate pixel value.
///
/// `px` and unitless values are taken as-is, `rem`/`em` are multiplied by 16,
/// `pt` by 4/3. Percentages resolve to 0 since there is no layout context,
/// and anything unparseable is 0.
pub fn to_pixels(value: &str) -> f64 {
    let Some(n) = parse_float(value) else {
        return 0.0;
    };
    if value.ends_with("px") {
        n
    } else if value.ends_with("rem") || value.ends_with("em") {
        n * ROOT_FONT_PX
    } else if value.ends_with("pt") {
        n * (4.0 / 3.0)
    } else if value.ends_with('%') {
        0.0
    } else {
        n
    }
}
