//! CSS Box Model
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//!
//! "Each box has a content area and optional surrounding padding, border,
//! and margin areas."
//!
//! Margins are applied by the walker before a box is drawn; this module draws
//! the border box (background, then the four border sides) and reports where
//! the content area starts.

use wren_common::warning::warn_once;

use super::Zone;
use crate::paint::{DisplayList, PixelRect};
use crate::style::{ColorValue, ComputedStyle, ParsedColor, parse_border_width, parse_color};

/// Border width used when a side has a drawn style but no width.
///
/// [§ 4.4 Line widths](https://www.w3.org/TR/css-backgrounds-3/#border-width)
/// Initial value: medium.
const MEDIUM_BORDER_PX: f32 = 2.0;

/// One of the four sides of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Top edge.
    Top,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
    /// Left edge.
    Left,
}

impl Side {
    /// Property-name fragment for this side.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// Sizes of the four edges of an area.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f32,
    /// Right edge size.
    pub right: f32,
    /// Bottom edge size.
    pub bottom: f32,
    /// Left edge size.
    pub left: f32,
}

impl EdgeSizes {
    /// `padding-*` longhands of `style`; anything unset or unparseable is 0.
    #[must_use]
    pub fn padding(style: &ComputedStyle) -> Self {
        Self::from_fn(|side| style.length_or_zero(&format!("padding-{}", side.name())))
    }

    /// `margin-*` longhands of `style`; `auto` and anything unparseable is 0.
    #[must_use]
    pub fn margin(style: &ComputedStyle) -> Self {
        Self::from_fn(|side| style.length_or_zero(&format!("margin-{}", side.name())))
    }

    fn from_fn(mut f: impl FnMut(Side) -> f32) -> Self {
        Self {
            top: f(Side::Top),
            right: f(Side::Right),
            bottom: f(Side::Bottom),
            left: f(Side::Left),
        }
    }
}

/// A resolved border side. `color` is `None` when the side is not painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSide {
    /// Width in pixels. Zero for sides that are not painted.
    pub width: f32,
    /// Paint color, opacity applied.
    pub color: Option<ColorValue>,
}

impl BorderSide {
    const NONE: Self = Self {
        width: 0.0,
        color: None,
    };
}

/// [§ 4 Borders](https://www.w3.org/TR/css-backgrounds-3/#borders)
///
/// Resolve one side from `border-<side>-{width,style,color}`, each falling
/// back to the shared `border-{width,style,color}`.
///
/// - only `solid` is painted; `none`, `hidden` and no style at all mean no
///   border, every other style takes up space but is not drawn
/// - an unparseable width is logged and treated as zero
/// - the color defaults to the text color, as does an inheritance keyword
#[must_use]
pub fn border_side(style: &ComputedStyle, side: Side) -> BorderSide {
    let longhand = |part: &str| {
        style
            .get(&format!("border-{}-{part}", side.name()))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| style.get(&format!("border-{part}")).map(str::trim))
            .filter(|v| !v.is_empty())
    };

    let line_style = longhand("style").unwrap_or("none");
    if matches!(line_style, "none" | "hidden") {
        return BorderSide::NONE;
    }

    let width = match longhand("width") {
        None => MEDIUM_BORDER_PX,
        Some(raw) => parse_border_width(raw).unwrap_or_else(|| {
            warn_once(
                "layout",
                &format!("invalid border-{}-width {raw:?}; using 0", side.name()),
            );
            0.0
        }),
    };

    let color = match longhand("color").and_then(parse_color) {
        Some(ParsedColor::Color(c)) => c.with_opacity(style.opacity()),
        Some(ParsedColor::Inherit) | None => style.text_color(),
    };

    BorderSide {
        width,
        color: (line_style == "solid").then_some(color),
    }
}

/// Geometry of a drawn border box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxExtent {
    /// Border-box width.
    pub width: f32,
    /// Border-box height.
    pub height: f32,
    /// Distance from the left border edge to the content edge.
    pub inset_left: f32,
    /// Distance from the top border edge to the content edge.
    pub inset_top: f32,
    /// Distance from the content edge to the bottom border edge.
    pub inset_bottom: f32,
}

/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// Draw the border box of `style` with its top-left corner at the zone's
/// origin and return its extent.
///
/// The content size is the explicit `width`/`height` when set. Otherwise it
/// falls back to the zone's size, clipped to `max_content_width` and
/// `max_content_height`. Padding and borders are added around it.
///
/// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
/// Background first, then borders.
pub fn draw_box(
    list: &mut DisplayList,
    style: &ComputedStyle,
    zone: Zone,
    max_content_height: Option<f32>,
    max_content_width: Option<f32>,
) -> BoxExtent {
    let padding = EdgeSizes::padding(style);
    let top = border_side(style, Side::Top);
    let right = border_side(style, Side::Right);
    let bottom = border_side(style, Side::Bottom);
    let left = border_side(style, Side::Left);

    let content_width = style.length("width").unwrap_or_else(|| {
        max_content_width.map_or(zone.width(), |max| zone.width().min(max))
    });
    let content_height = style.length("height").unwrap_or_else(|| {
        max_content_height.map_or(zone.height(), |max| zone.height().min(max))
    });

    let width = left.width + padding.left + content_width + padding.right + right.width;
    let height = top.width + padding.top + content_height + padding.bottom + bottom.width;

    // STEP 1: Background over the whole border box.
    // [§ 3.7 Painting area](https://www.w3.org/TR/css-backgrounds-3/#background-clip)
    // Initial value of 'background-clip': border-box.
    if let Some(background) = style.background_color() {
        list.fill_rect(PixelRect::from_layout(zone.x, zone.y, width, height), background);
    }

    // STEP 2: The four border sides, each inside its own edge.
    let sides = [
        (top, PixelRect::from_layout(zone.x, zone.y, width, top.width)),
        (
            bottom,
            PixelRect::from_layout(zone.x, zone.y + height - bottom.width, width, bottom.width),
        ),
        (left, PixelRect::from_layout(zone.x, zone.y, left.width, height)),
        (
            right,
            PixelRect::from_layout(zone.x + width - right.width, zone.y, right.width, height),
        ),
    ];
    for (side, bounds) in sides {
        if let Some(color) = side.color {
            list.fill_rect(bounds, color);
        }
    }

    BoxExtent {
        width,
        height,
        inset_left: left.width + padding.left,
        inset_top: top.width + padding.top,
        inset_bottom: padding.bottom + bottom.width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::DisplayCommand;

    fn style(pairs: &[(&str, &str)]) -> ComputedStyle {
        let mut style = ComputedStyle::new();
        for (k, v) in pairs {
            style.set(k, v);
        }
        style
    }

    fn zone() -> Zone {
        Zone::new(10.0, 20.0, 200.0, 100.0)
    }

    #[test]
    fn test_no_style_draws_nothing() {
        let mut list = DisplayList::new();
        let extent = draw_box(&mut list, &style(&[]), zone(), Some(19.2), None);
        assert!(list.is_empty());
        assert!((extent.width - 200.0).abs() < f32::EPSILON);
        assert!((extent.height - 19.2).abs() < 1e-4);
    }

    #[test]
    fn test_explicit_size_ignores_limits() {
        let mut list = DisplayList::new();
        let s = style(&[("width", "50px"), ("height", "30px"), ("background-color", "red")]);
        let extent = draw_box(&mut list, &s, zone(), Some(5.0), Some(5.0));
        assert!((extent.width - 50.0).abs() < f32::EPSILON);
        assert_eq!(
            list.commands(),
            &[DisplayCommand::FillRect {
                bounds: PixelRect { x: 10, y: 20, width: 50, height: 30 },
                color: ColorValue::rgb(255, 0, 0),
            }]
        );
    }

    #[test]
    fn test_padding_and_border_add_insets() {
        let mut list = DisplayList::new();
        let s = style(&[
            ("width", "20px"),
            ("height", "10px"),
            ("padding-left", "3px"),
            ("padding-top", "4px"),
            ("border-style", "solid"),
            ("border-width", "1px"),
            ("border-color", "blue"),
        ]);
        let extent = draw_box(&mut list, &s, zone(), None, None);
        assert!((extent.inset_left - 4.0).abs() < f32::EPSILON);
        assert!((extent.inset_top - 5.0).abs() < f32::EPSILON);
        assert!((extent.width - 25.0).abs() < f32::EPSILON);
        assert!((extent.height - 16.0).abs() < f32::EPSILON);
        // Four sides, no background.
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_side_longhand_beats_shared_value() {
        let s = style(&[
            ("border-style", "solid"),
            ("border-color", "red"),
            ("border-left-color", "lime"),
            ("border-top-style", "none"),
            ("border-width", "thick"),
        ]);
        assert_eq!(border_side(&s, Side::Top), BorderSide::NONE);
        let left = border_side(&s, Side::Left);
        assert_eq!(left.color, Some(ColorValue::rgb(0, 255, 0)));
        assert!((left.width - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_bad_width_is_zero() {
        let s = style(&[("border-style", "solid"), ("border-width", "wide")]);
        assert!(border_side(&s, Side::Right).width.abs() < f32::EPSILON);
    }

    #[test]
    fn test_unpainted_style_keeps_width() {
        let s = style(&[("border-style", "dashed"), ("border-width", "2px")]);
        let side = border_side(&s, Side::Bottom);
        assert!((side.width - 2.0).abs() < f32::EPSILON);
        assert_eq!(side.color, None);
    }

    #[test]
    fn test_border_color_defaults_to_text_color() {
        let s = style(&[("border-style", "solid"), ("color", "navy")]);
        assert_eq!(border_side(&s, Side::Top).color, Some(ColorValue::rgb(0, 0, 128)));
    }
}
