//! Length and border-width values.
//!
//! [CSS Values § 6](https://www.w3.org/TR/css-values-4/#lengths)
//!
//! Only `px` and `em` are understood. `em` is always 16px; it does not follow
//! the element's font size.

/// Font size used when nothing sets one.
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// Pixels per `em`.
pub const EM_PX: f32 = 16.0;

/// [§ 4.3 Line styles](https://www.w3.org/TR/css-backgrounds-3/#border-style)
const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

/// Parse `Npx`, `Nem` or a bare `0` into pixels.
///
/// ```
/// use wren_css::style::parse_length;
///
/// assert_eq!(parse_length("12px"), Some(12.0));
/// assert_eq!(parse_length(".5em"), Some(8.0));
/// assert_eq!(parse_length("auto"), None);
/// ```
#[must_use]
pub fn parse_length(value: &str) -> Option<f32> {
    let value = value.trim();
    if let Some(number) = value.strip_suffix("px") {
        return parse_number(number);
    }
    if let Some(number) = value.strip_suffix("em") {
        return parse_number(number).map(|n| n * EM_PX);
    }
    if value == "0" {
        return Some(0.0);
    }
    None
}

fn parse_number(text: &str) -> Option<f32> {
    if text.is_empty() || text.ends_with(|c: char| !c.is_ascii_digit() && c != '.') {
        return None;
    }
    text.parse::<f32>().ok().filter(|n| n.is_finite())
}

/// [§ 4.4 Line widths](https://www.w3.org/TR/css-backgrounds-3/#border-width)
///
/// `thin`, `medium` and `thick` are 1, 2 and 3 pixels. Numbers are accepted
/// with or without a `px` unit. Negative widths are invalid.
#[must_use]
pub fn parse_border_width(value: &str) -> Option<f32> {
    let value = value.trim();
    let width = match value {
        "thin" => 1.0,
        "medium" => 2.0,
        "thick" => 3.0,
        _ => parse_number(value.strip_suffix("px").unwrap_or(value))?,
    };
    (width >= 0.0).then_some(width)
}

/// Whether `value` is a border style keyword.
#[must_use]
pub fn is_border_style(value: &str) -> bool {
    BORDER_STYLES.contains(&value.trim())
}
