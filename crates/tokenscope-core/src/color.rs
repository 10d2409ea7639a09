//! sRGB color model.
//!
//! Parsing of CSS color syntax into canonical `#RRGGBB` hex, plus the
//! conversions and metrics the namer and scorer rely on (HSL, relative
//! luminance, WCAG contrast, RGB distance).

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::miner::units::parse_float;

/// Luminance below which white text reads better than black.
pub const WHITE_TEXT_LUMINANCE: f64 = 0.179;

static HEX6_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#?([0-9a-f]{2})([0-9a-f]{2})([0-9a-f]{2})$").unwrap()
});

static SHORT_HEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9a-f]{3,4}|[0-9a-f]{6}|[0-9a-f]{8})$").unwrap()
});

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"rgba?\s*\(\s*([\d.]+)%?\s*[,\s]\s*([\d.]+)%?\s*[,\s]\s*([\d.]+)%?\s*(?:[,/]\s*[\d.]+%?\s*)?\)",
    )
    .unwrap()
});

static HSL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"hsla?\s*\(\s*([\d.]+)(?:deg)?\s*[,\s]\s*([\d.]+)%\s*[,\s]\s*([\d.]+)%\s*(?:[,/]\s*[\d.]+%?\s*)?\)",
    )
    .unwrap()
});

/// An sRGB triple, 0-255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL with hue in degrees (0-360) and saturation/lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self.r, self.g, self.b)
    }

    pub fn luminance(self) -> f64 {
        luminance(self.r, self.g, self.b)
    }

    pub fn to_hex(self) -> String {
        rgb_to_hex(self.r as f64, self.g as f64, self.b as f64)
    }

    /// Euclidean distance in RGB space.
    pub fn distance(self, other: Rgb) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

/// Decode `#RRGGBB` (leading `#` optional). Anything else decodes to black.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    match HEX6_RE.captures(hex.trim()) {
        Some(caps) => {
            let channel = |i: usize| u8::from_str_radix(&caps[i], 16).unwrap_or(0);
            Rgb::new(channel(1), channel(2), channel(3))
        }
        None => Rgb::default(),
    }
}

/// Convert 0-255 channels to rounded HSL.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0, s: 0, l: (l * 100.0).round() as u8 };
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == g {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };

    Hsl {
        h: (h * 360.0).round() as u16,
        s: (s * 100.0).round() as u8,
        l: (l * 100.0).round() as u8,
    }
}

/// Relative luminance of an sRGB color (0.0 black .. 1.0 white).
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    let linear = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// WCAG contrast ratio between two hex colors (1.0 ..= 21.0).
pub fn contrast_ratio(hex1: &str, hex2: &str) -> f64 {
    let l1 = hex_to_rgb(hex1).luminance();
    let l2 = hex_to_rgb(hex2).luminance();
    let lighter = l1.max(l2);
    let darker = l1.min(l2);
    (lighter + 0.05) / (darker + 0.05)
}

/// Whether text drawn on `hex` should be white rather than black.
pub fn should_use_white_text(hex: &str) -> bool {
    hex_to_rgb(hex).luminance() < WHITE_TEXT_LUMINANCE
}

/// Encode channels as uppercase `#RRGGBB`, rounding and clamping each to 0-255.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    let clamp = |n: f64| -> u8 {
        if n.is_nan() {
            0
        } else {
            n.round().clamp(0.0, 255.0) as u8
        }
    };
    format!("#{:02X}{:02X}{:02X}", clamp(r), clamp(g), clamp(b))
}

/// Convert HSL (h in degrees, s and l in percent) to sRGB.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let s = s / 100.0;
    let l = l / 100.0;
    let a = s * l.min(1.0 - l);
    let f = |n: f64| {
        let k = (n + h / 30.0) % 12.0;
        let v = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(f(0.0), f(8.0), f(4.0))
}

/// Parse any supported CSS color to canonical uppercase `#RRGGBB`.
///
/// Accepts `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`, `rgb()`, `rgba()`,
/// `hsl()` and `hsla()`. Alpha is dropped. Returns `None` for anything else
/// (`var(...)`, `inherit`, `transparent`, named colors).
pub fn parse_color_string(raw: &str) -> Option<String> {
    let s = raw.trim().to_lowercase();

    if let Some(caps) = SHORT_HEX_RE.captures(&s) {
        let digits = caps[1].as_bytes();
        let hex = match digits.len() {
            3 | 4 => {
                let (r, g, b) = (digits[0] as char, digits[1] as char, digits[2] as char);
                format!("#{r}{r}{g}{g}{b}{b}")
            }
            _ => format!("#{}", &caps[1][..6]),
        };
        return Some(hex.to_uppercase());
    }

    if let Some(caps) = RGB_RE.captures(&s) {
        return Some(rgb_to_hex(
            parse_float(&caps[1]).unwrap_or(0.0),
            parse_float(&caps[2]).unwrap_or(0.0),
            parse_float(&caps[3]).unwrap_or(0.0),
        ));
    }

    if let Some(caps) = HSL_RE.captures(&s) {
        let rgb = hsl_to_rgb(
            parse_float(&caps[1]).unwrap_or(0.0),
            parse_float(&caps[2]).unwrap_or(0.0),
            parse_float(&caps[3]).unwrap_or(0.0),
        );
        return Some(rgb.to_hex());
    }

    None
}
