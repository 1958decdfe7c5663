//! Display List - a sequence of drawing commands
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! The display list is the output of layout. Commands are stored in emission
//! order and composited back to front, so a later command draws on top.

use std::sync::Arc;

use wren_common::image::LoadedImage;

use crate::style::{ColorValue, FontStyle, FontWeight};

/// Integer pixel rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Round a layout rectangle to whole pixels. Negative sizes become zero.
    #[must_use]
    pub fn from_layout(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x: x.round() as i32,
            y: y.round() as i32,
            width: width.max(0.0).round() as u32,
            height: height.max(0.0).round() as u32,
        }
    }

    /// Whether the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// One past the right edge, saturating at `i32::MAX`.
    #[must_use]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(i32::try_from(self.width).unwrap_or(i32::MAX))
    }

    /// One past the bottom edge, saturating at `i32::MAX`.
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(i32::try_from(self.height).unwrap_or(i32::MAX))
    }
}

/// A run of text shaped as one unit, with everything needed to rasterize it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// The text, whitespace already normalized.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text color, opacity applied.
    pub color: ColorValue,
    /// [§ 3.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
    pub font_style: FontStyle,
    /// [§ 3.2 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
    pub font_weight: FontWeight,
}

/// A single drawing command.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    /// Fill a rectangle with a solid color.
    ///
    /// Used for the canvas, backgrounds and solid border sides.
    FillRect {
        /// Area to fill.
        bounds: PixelRect,
        /// Fill color.
        color: ColorValue,
    },

    /// Fill a circle. Used for list bullets.
    FillCircle {
        /// Center x.
        center_x: i32,
        /// Center y.
        center_y: i32,
        /// Radius in pixels.
        radius: u32,
        /// Fill color.
        color: ColorValue,
    },

    /// Draw a shaped text run with its top-left corner at `bounds`.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// Step 7: "the element's text"
    DrawText {
        /// Measured extent of the run.
        bounds: PixelRect,
        /// What to draw.
        run: TextRun,
    },

    /// Blit a decoded image at its natural size.
    DrawImage {
        /// Destination; width and height are the image's own.
        bounds: PixelRect,
        /// Pixel data.
        image: Arc<LoadedImage>,
    },
}

impl DisplayCommand {
    /// Pixel area the command may touch.
    #[must_use]
    pub fn bounds(&self) -> PixelRect {
        match self {
            Self::FillRect { bounds, .. }
            | Self::DrawText { bounds, .. }
            | Self::DrawImage { bounds, .. } => *bounds,
            Self::FillCircle {
                center_x,
                center_y,
                radius,
                ..
            } => {
                let r = i32::try_from(*radius).unwrap_or(i32::MAX);
                PixelRect {
                    x: center_x.saturating_sub(r),
                    y: center_y.saturating_sub(r),
                    width: radius.saturating_mul(2),
                    height: radius.saturating_mul(2),
                }
            }
        }
    }
}

/// A list of drawing commands in painting order.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Fill `bounds` unless it is empty or fully transparent.
    pub fn fill_rect(&mut self, bounds: PixelRect, color: ColorValue) {
        if !bounds.is_empty() && color.a > 0 {
            self.push(DisplayCommand::FillRect { bounds, color });
        }
    }

    /// Get the commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Get the number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the display list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text runs in order, for inspection.
    pub fn text_runs(&self) -> impl Iterator<Item = (&PixelRect, &TextRun)> {
        self.commands.iter().filter_map(|command| match command {
            DisplayCommand::DrawText { bounds, run } => Some((bounds, run)),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a DisplayCommand;
    type IntoIter = std::slice::Iter<'a, DisplayCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_rect_rounds_and_clamps() {
        let rect = PixelRect::from_layout(1.4, 2.6, 10.5, -3.0);
        assert_eq!(rect, PixelRect { x: 1, y: 3, width: 11, height: 0 });
        assert!(rect.is_empty());
        assert_eq!(rect.right(), 12);
    }

    #[test]
    fn test_fill_rect_skips_invisible() {
        let mut list = DisplayList::new();
        list.fill_rect(PixelRect::from_layout(0.0, 0.0, 0.0, 5.0), ColorValue::BLACK);
        list.fill_rect(PixelRect::from_layout(0.0, 0.0, 5.0, 5.0), ColorValue::TRANSPARENT);
        assert!(list.is_empty());

        list.fill_rect(PixelRect::from_layout(0.0, 0.0, 5.0, 5.0), ColorValue::WHITE);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_circle_bounds() {
        let circle = DisplayCommand::FillCircle {
            center_x: 10,
            center_y: 20,
            radius: 4,
            color: ColorValue::BLACK,
        };
        assert_eq!(circle.bounds(), PixelRect { x: 6, y: 16, width: 8, height: 8 });
    }

    #[test]
    fn test_far_edges_saturate() {
        let rect = PixelRect {
            x: 2_147_483_000,
            y: i32::MAX,
            width: 1000,
            height: u32::MAX,
        };
        assert_eq!(rect.right(), i32::MAX);
        assert_eq!(rect.bottom(), i32::MAX);

        let circle = DisplayCommand::FillCircle {
            center_x: i32::MIN,
            center_y: 0,
            radius: u32::MAX,
            color: ColorValue::BLACK,
        };
        let bounds = circle.bounds();
        assert_eq!(bounds.x, i32::MIN);
        assert_eq!(bounds.width, u32::MAX);
    }
}
