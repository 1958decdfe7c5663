//! Shorthand expansion.
//!
//! [CSS Backgrounds § 4](https://www.w3.org/TR/css-backgrounds-3/#borders)
//! [CSS Box Model § 5](https://www.w3.org/TR/css-box-4/#margins)
//!
//! A shorthand is stored as written and also expanded into its longhands in
//! the same block, so a later declaration of either kind wins.

use wren_common::warning::warn_once;

use super::stylesheet::DeclarationBlock;
use super::validate::is_valid_declaration;
use crate::style::{is_border_style, parse_border_width};

/// Box sides in the order the four-value form lists them.
const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Split a value on whitespace, keeping parenthesized groups whole.
///
/// ```
/// use wren_css::parser::split_value_tokens;
///
/// assert_eq!(
///     split_value_tokens("1px solid rgb(0, 0, 255)"),
///     ["1px", "solid", "rgb(0, 0, 255)"]
/// );
/// ```
#[must_use]
pub fn split_value_tokens(value: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    tokens.push(&value[s..i]);
                }
                continue;
            }
            _ => {}
        }
        if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(&value[s..]);
    }
    tokens
}

/// Store `name: value` in `block` and expand it if it is a shorthand.
///
/// Expanded longhands are kept only when they pass
/// [`is_valid_declaration`]. A four-sided shorthand with zero or more than
/// four values is reported and not stored at all.
pub fn apply_declaration(block: &mut DeclarationBlock, name: &str, value: &str) {
    match name {
        "border" | "border-top" | "border-right" | "border-bottom" | "border-left" => {
            block.set(name, value);
            decompose_border(block, name, value);
        }
        "border-color" | "border-style" | "border-width" | "margin" | "padding" => {
            let tokens = split_value_tokens(value);
            if tokens.is_empty() || tokens.len() > 4 {
                warn_once(
                    "css",
                    &format!(
                        "'{name}: {value}' has {} values, expected 1 to 4; ignored",
                        tokens.len()
                    ),
                );
                return;
            }
            block.set(name, value);
            expand_four_sides(block, name, &tokens);
        }
        _ => block.set(name, value),
    }
}

/// `border` and `border-<side>`: each token is a width, a style or a color.
fn decompose_border(block: &mut DeclarationBlock, name: &str, value: &str) {
    if name == "border" {
        for side in SIDES {
            decompose_border(block, &format!("border-{side}"), value);
        }
        return;
    }

    for token in split_value_tokens(value) {
        let property = if parse_border_width(token).is_some() {
            format!("{name}-width")
        } else if is_border_style(token) {
            format!("{name}-style")
        } else {
            format!("{name}-color")
        };
        set_if_valid(block, &property, token);
    }
}

/// The one-to-four value rule, keeping any suffix (`border-style` becomes
/// `border-top-style`).
fn expand_four_sides(block: &mut DeclarationBlock, name: &str, tokens: &[&str]) {
    let (prefix, suffix) = match name.split_once('-') {
        Some((prefix, rest)) => (prefix, format!("-{rest}")),
        None => (name, String::new()),
    };

    let [top, right, bottom, left] = match *tokens {
        [all] => [all; 4],
        [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
        [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
        [top, right, bottom, left] => [top, right, bottom, left],
        _ => return,
    };

    for (side, value) in SIDES.into_iter().zip([top, right, bottom, left]) {
        set_if_valid(block, &format!("{prefix}-{side}{suffix}"), value);
    }
}

fn set_if_valid(block: &mut DeclarationBlock, name: &str, value: &str) {
    if is_valid_declaration(name, value) {
        block.set(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expanded(name: &str, value: &str) -> DeclarationBlock {
        let mut block = DeclarationBlock::new();
        apply_declaration(&mut block, name, value);
        block
    }

    #[test]
    fn test_split_keeps_functions_whole() {
        assert_eq!(split_value_tokens("  a   b "), ["a", "b"]);
        assert_eq!(split_value_tokens("hsl(1, 2%, 3%) red"), ["hsl(1, 2%, 3%)", "red"]);
        assert!(split_value_tokens("   ").is_empty());
    }

    #[test]
    fn test_margin_four_values() {
        let block = expanded("margin", "1px 2px 3px 4px");
        assert_eq!(block.get("margin-top"), Some("1px"));
        assert_eq!(block.get("margin-right"), Some("2px"));
        assert_eq!(block.get("margin-bottom"), Some("3px"));
        assert_eq!(block.get("margin-left"), Some("4px"));
    }

    #[test]
    fn test_padding_two_and_three_values() {
        let block = expanded("padding", "1px 2px");
        assert_eq!(block.get("padding-top"), Some("1px"));
        assert_eq!(block.get("padding-bottom"), Some("1px"));
        assert_eq!(block.get("padding-left"), Some("2px"));
        assert_eq!(block.get("padding-right"), Some("2px"));

        let block = expanded("padding", "1px 2px 3px");
        assert_eq!(block.get("padding-top"), Some("1px"));
        assert_eq!(block.get("padding-left"), Some("2px"));
        assert_eq!(block.get("padding-right"), Some("2px"));
        assert_eq!(block.get("padding-bottom"), Some("3px"));
    }

    #[test]
    fn test_suffix_is_preserved() {
        let block = expanded("border-style", "solid dashed");
        assert_eq!(block.get("border-top-style"), Some("solid"));
        assert_eq!(block.get("border-left-style"), Some("dashed"));
        assert_eq!(block.get("border-style"), Some("solid dashed"));
    }

    #[test]
    fn test_bad_arity_is_dropped() {
        assert!(expanded("margin", "1px 2px 3px 4px 5px").is_empty());
        assert!(expanded("padding", "").is_empty());
    }

    #[test]
    fn test_border_classifies_tokens() {
        let block = expanded("border", "2px solid #00ff00");
        for side in SIDES {
            assert_eq!(block.get(&format!("border-{side}-width")), Some("2px"));
            assert_eq!(block.get(&format!("border-{side}-style")), Some("solid"));
            assert_eq!(block.get(&format!("border-{side}-color")), Some("#00ff00"));
        }
    }

    #[test]
    fn test_border_side_skips_invalid_color() {
        let block = expanded("border-top", "thin dotted nonsense");
        assert_eq!(block.get("border-top-width"), Some("thin"));
        assert_eq!(block.get("border-top-style"), Some("dotted"));
        assert_eq!(block.get("border-top-color"), None);
        assert_eq!(block.get("border-right-width"), None);
    }
}
