//! Font style and weight keywords.
//!
//! [CSS Fonts Level 4 § 2](https://www.w3.org/TR/css-fonts-4/#basic-font-props)

use serde::Serialize;

/// [§ 2.4 font-style](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum FontStyle {
    /// Upright glyphs.
    #[default]
    Normal,
    /// `italic` or `oblique`.
    Italic,
}

/// [§ 2.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop), reduced to two faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum FontWeight {
    /// Regular face.
    #[default]
    Normal,
    /// `bold`, `bolder`, or a numeric weight of 600 and above.
    Bold,
}

impl FontStyle {
    /// Parse a `font-style` value. Unknown values are upright.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "italic" | "oblique" => Self::Italic,
            _ => Self::Normal,
        }
    }
}

impl FontWeight {
    /// Parse a `font-weight` value. Unknown values are regular.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "bold" | "bolder" => Self::Bold,
            other => match other.parse::<u16>() {
                Ok(weight) if weight >= 600 => Self::Bold,
                _ => Self::Normal,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_weight() {
        assert_eq!(FontWeight::parse("bold"), FontWeight::Bold);
        assert_eq!(FontWeight::parse("700"), FontWeight::Bold);
        assert_eq!(FontWeight::parse("400"), FontWeight::Normal);
        assert_eq!(FontWeight::parse("heavy"), FontWeight::Normal);
    }

    #[test]
    fn test_font_style() {
        assert_eq!(FontStyle::parse("oblique"), FontStyle::Italic);
        assert_eq!(FontStyle::parse("normal"), FontStyle::Normal);
    }
}
