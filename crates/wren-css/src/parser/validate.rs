//! Value validation for known properties.
//!
//! Unknown properties are accepted as written. Known color, border-width and
//! border-style properties must hold a value this engine can later read;
//! anything else is dropped at parse time.

use super::shorthand::split_value_tokens;
use crate::style::{is_border_style, parse_border_width, parse_color};

/// Whether `value` is acceptable for `name`.
///
/// ```
/// use wren_css::parser::is_valid_declaration;
///
/// assert!(is_valid_declaration("color", "rgb(0, 128, 0)"));
/// assert!(is_valid_declaration("color", "inherit"));
/// assert!(!is_valid_declaration("color", "rgb(0, 128)"));
/// assert!(is_valid_declaration("border-color", "red blue"));
/// assert!(is_valid_declaration("content-visibility", "anything"));
/// ```
#[must_use]
pub fn is_valid_declaration(name: &str, value: &str) -> bool {
    match name {
        "border-color" => all_tokens(value, |t| parse_color(t).is_some()),
        "border-width" => all_tokens(value, |t| parse_border_width(t).is_some()),
        "border-style" => all_tokens(value, is_border_style),
        "color" | "background" | "background-color" => parse_color(value).is_some(),
        _ if name.ends_with("-color") => parse_color(value).is_some(),
        _ if is_border_side(name, "-width") => parse_border_width(value).is_some(),
        _ if is_border_side(name, "-style") => is_border_style(value),
        _ => true,
    }
}

/// `border-<side><suffix>`
fn is_border_side(name: &str, suffix: &str) -> bool {
    name.strip_prefix("border-")
        .and_then(|rest| rest.strip_suffix(suffix))
        .is_some_and(|side| matches!(side, "top" | "right" | "bottom" | "left"))
}

fn all_tokens(value: &str, valid: impl Fn(&str) -> bool) -> bool {
    let tokens = split_value_tokens(value);
    !tokens.is_empty() && tokens.into_iter().all(valid)
}
