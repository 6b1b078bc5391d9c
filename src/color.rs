//! Color literal normalization for SVG fill/stroke values
//!
//! Canonical form is 6-digit lowercase hex (`#rrggbb`). Supported inputs:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA` (alpha is truncated)
//! - Functional: `rgb()`, `rgba()` and the other CSS color functions
//! - Named: `red`, `green`, `blue`, `white`, `black`, plus the rest of the
//!   CSS named-color table via lightningcss
//!
//! Literals that cannot be parsed pass through lowercased instead of failing;
//! browsers accept many CSS color forms this tool does not attempt to fully
//! parse, so an unknown token is tolerated rather than rejected. Two literals
//! name the same color iff their canonical forms are equal.

use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;

/// CSS keywords that are not concrete colors. These pass through verbatim
/// (lowercased) so that e.g. `transparent` never compares equal to black.
const PASSTHROUGH_KEYWORDS: [&str; 6] =
    ["none", "transparent", "inherit", "currentcolor", "initial", "unset"];

/// Normalize a color literal to its canonical form.
///
/// Valid colors become 6-digit lowercase hex; non-color keywords and
/// unrecognized literals come back lowercased as-is. Never fails, and is
/// idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(literal: &str) -> String {
    let trimmed = literal.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let lower = trimmed.to_ascii_lowercase();
    if PASSTHROUGH_KEYWORDS.contains(&lower.as_str()) {
        return lower;
    }

    // Fast path for hex colors - no need to go through the CSS parser
    if let Some(hex) = trimmed.strip_prefix('#') {
        if let Some((r, g, b)) = parse_hex(hex) {
            return format!("#{:02x}{:02x}{:02x}", r, g, b);
        }
        return lower;
    }

    // lightningcss handles rgb()/rgba() and named colors
    match parse_css_color(trimmed) {
        Some((r, g, b)) => format!("#{:02x}{:02x}{:02x}", r, g, b),
        None => lower,
    }
}

/// Whether two literals name the same color under canonical equality.
pub fn same_color(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Parse the digits of a hex color (without the leading `#`).
///
/// 3- and 4-digit forms expand by doubling each nibble; alpha digits are
/// dropped since the canonical form carries no alpha.
fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 | 4 => {
            let mut chars = hex.chars();
            let r = hex_digit(chars.next()?)? * 17;
            let g = hex_digit(chars.next()?)? * 17;
            let b = hex_digit(chars.next()?)? * 17;
            Some((r, g, b))
        }
        6 | 8 => {
            let r = hex_pair(&hex[0..2])?;
            let g = hex_pair(&hex[2..4])?;
            let b = hex_pair(&hex[4..6])?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// Parse a CSS color using lightningcss (rgb, named colors, and friends).
/// Alpha is truncated: `rgba(255, 0, 0, 0.5)` canonicalizes to `#ff0000`.
fn parse_css_color(s: &str) -> Option<(u8, u8, u8)> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).ok()?;
    let rgb_color = css_color.to_rgb().ok()?;

    match rgb_color {
        CssColor::RGBA(rgba) => Some((rgba.red, rgba.green, rgba.blue)),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => {
                let r = (rgb.r * 255.0).round() as u8;
                let g = (rgb.g * 255.0).round() as u8;
                let b = (rgb.b * 255.0).round() as u8;
                Some((r, g, b))
            }
            _ => None,
        },
        _ => None,
    }
}

fn hex_digit(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'a'..='f' => Some(c as u8 - b'a' + 10),
        'A'..='F' => Some(c as u8 - b'A' + 10),
        _ => None,
    }
}

fn hex_pair(s: &str) -> Option<u8> {
    let mut chars = s.chars();
    let high = hex_digit(chars.next()?)?;
    let low = hex_digit(chars.next()?)?;
    Some(high * 16 + low)
}
