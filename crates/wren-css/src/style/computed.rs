//! Per-element computed style.
//!
//! [CSS Cascading § 4.4 Computed values](https://www.w3.org/TR/css-cascade-4/#computed)
//!
//! A computed style is a flat property → string map. Every element owns its
//! own map; inherited entries are copied from the parent, never shared.

use std::collections::BTreeMap;

use serde::Serialize;

use super::color::{ColorValue, ParsedColor, parse_color};
use super::font::{FontStyle, FontWeight};
use super::length::{DEFAULT_FONT_SIZE_PX, parse_length};
use crate::parser::DeclarationBlock;

/// Properties copied from the parent when the element's own value is empty
/// or an inheritance keyword.
pub const INHERITED_PROPERTIES: &[&str] = &[
    "color",
    "opacity",
    "background",
    "background-color",
    "font-style",
    "display",
    "font-size",
    "font-weight",
];

/// Resolved property values for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComputedStyle {
    properties: BTreeMap<String, String>,
}

impl ComputedStyle {
    /// An empty style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            properties: BTreeMap::new(),
        }
    }

    /// Raw value of `name`, if set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Raw value of `name`, or the empty string.
    #[must_use]
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Set `name`, replacing any previous value.
    pub fn set(&mut self, name: &str, value: &str) {
        let _ = self.properties.insert(name.to_string(), value.to_string());
    }

    /// Overwrite this style with every declaration of `block`, key by key.
    pub fn apply(&mut self, block: &DeclarationBlock) {
        for decl in block.iter() {
            self.set(&decl.name, &decl.value);
        }
    }

    /// Number of properties set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Length value of `name` in pixels, if it parses.
    #[must_use]
    pub fn length(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(parse_length)
    }

    /// Length value of `name`, 0 when unset or not a length (`auto` included).
    #[must_use]
    pub fn length_or_zero(&self, name: &str) -> f32 {
        self.length(name).unwrap_or(0.0)
    }

    /// `font-size` in pixels, 16 when unset or unparseable.
    #[must_use]
    pub fn font_size(&self) -> f32 {
        self.length("font-size")
            .filter(|size| *size > 0.0)
            .unwrap_or(DEFAULT_FONT_SIZE_PX)
    }

    /// `opacity` clamped to `0..=1`, 1 when unset.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.get("opacity")
            .and_then(|v| v.trim().parse::<f32>().ok())
            .map_or(1.0, |o| o.clamp(0.0, 1.0))
    }

    /// Text color with opacity applied. Black when unset, invalid or still a keyword.
    #[must_use]
    pub fn text_color(&self) -> ColorValue {
        let base = match parse_color(self.value("color")) {
            Some(ParsedColor::Color(c)) => c,
            _ => ColorValue::BLACK,
        };
        base.with_opacity(self.opacity())
    }

    /// Background color from `background`, else `background-color`, with
    /// opacity applied.
    ///
    /// An inheritance keyword resolves to the text color. `None` when neither
    /// property holds a color.
    #[must_use]
    pub fn background_color(&self) -> Option<ColorValue> {
        let raw = self
            .get("background")
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.get("background-color"))?;
        let color = match parse_color(raw)? {
            ParsedColor::Color(c) => c.with_opacity(self.opacity()),
            ParsedColor::Inherit => self.text_color(),
        };
        Some(color)
    }

    /// `font-weight`, also honouring `font-style: bold`.
    #[must_use]
    pub fn font_weight(&self) -> FontWeight {
        if self.value("font-style").trim() == "bold" {
            return FontWeight::Bold;
        }
        FontWeight::parse(self.value("font-weight"))
    }

    /// `font-style`.
    #[must_use]
    pub fn font_style(&self) -> FontStyle {
        FontStyle::parse(self.value("font-style"))
    }

    /// Whether `display: none` removes the element from layout.
    #[must_use]
    pub fn is_display_none(&self) -> bool {
        self.value("display").trim() == "none"
    }
}
