//! Software renderer for headless rendering.
//!
//! Executes a `DisplayList` to a pixel buffer using fontdue for text rasterization.
//!
//! # Architecture
//!
//! The renderer is the final stage in the pipeline:
//!
//! ```text
//! Style → Layout → DisplayList → Render
//!                       ↓           ↓
//!                  commands   →   Pixels
//! ```
//!
//! The renderer knows nothing about CSS, layout, or the DOM. It simply executes
//! drawing commands from the display list, in order, so later commands cover
//! earlier ones.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use wren_common::image::LoadedImage;
use wren_css::{ColorValue, DisplayCommand, DisplayList, PixelRect, TextRun};

use crate::font_metrics::FontSet;

/// Software renderer that executes a display list to a pixel buffer.
pub struct Renderer<'a> {
    /// RGBA pixel buffer, initially opaque white.
    buffer: RgbaImage,
    /// Faces used for `DrawText`. Text is skipped when none is available.
    fonts: &'a FontSet,
}

impl<'a> Renderer<'a> {
    /// Create a white canvas of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32, fonts: &'a FontSet) -> Self {
        Self {
            buffer: RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
            fonts,
        }
    }

    /// Execute a display list, drawing all commands to the pixel buffer.
    ///
    /// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    pub fn render(&mut self, display_list: &DisplayList) {
        for command in display_list {
            self.execute_command(command);
        }
    }

    fn execute_command(&mut self, command: &DisplayCommand) {
        match command {
            DisplayCommand::FillRect { bounds, color } => self.fill_rect(*bounds, *color),
            DisplayCommand::FillCircle {
                center_x,
                center_y,
                radius,
                color,
            } => self.fill_circle(*center_x, *center_y, *radius, *color),
            DisplayCommand::DrawText { bounds, run } => self.draw_text(*bounds, run),
            DisplayCommand::DrawImage { bounds, image } => self.draw_image(*bounds, image),
        }
    }

    /// Blend `color` at `alpha` (0-255, already including the color's own
    /// alpha) onto one pixel. Off-canvas pixels are ignored.
    fn blend_pixel(&mut self, x: i32, y: i32, color: [u8; 3], alpha: u8) {
        if alpha == 0 || x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.buffer.width() || y >= self.buffer.height() {
            return;
        }
        let fg = Rgba([color[0], color[1], color[2], 255]);
        if alpha == 255 {
            self.buffer.put_pixel(x, y, fg);
        } else {
            let bg = *self.buffer.get_pixel(x, y);
            self.buffer.put_pixel(x, y, alpha_blend(fg, bg, alpha));
        }
    }

    fn fill_rect(&mut self, bounds: PixelRect, color: ColorValue) {
        let rgb = [color.r, color.g, color.b];
        let x0 = bounds.x.max(0);
        let y0 = bounds.y.max(0);
        let x1 = bounds.right().min(self.buffer.width() as i32);
        let y1 = bounds.bottom().min(self.buffer.height() as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, rgb, color.a);
            }
        }
    }

    /// Pixels whose centers fall inside the circle; no anti-aliasing. Only
    /// rows and columns on the canvas are visited.
    fn fill_circle(&mut self, center_x: i32, center_y: i32, radius: u32, color: ColorValue) {
        let rgb = [color.r, color.g, color.b];
        let r = i64::from(radius);
        let (cx, cy) = (i64::from(center_x), i64::from(center_y));
        let dx_range = (-r).max(-cx)..r.min(i64::from(self.buffer.width()) - cx);
        let dy_range = (-r).max(-cy)..r.min(i64::from(self.buffer.height()) - cy);
        let limit = f64::from(radius).powi(2);
        for dy in dy_range {
            for dx in dx_range.clone() {
                let fx = dx as f64 + 0.5;
                let fy = dy as f64 + 0.5;
                if fx.mul_add(fx, fy * fy) <= limit {
                    // Both ranges are clipped to the canvas, so the sums fit in i32.
                    self.blend_pixel((cx + dx) as i32, (cy + dy) as i32, rgb, color.a);
                }
            }
        }
    }

    /// Draw an image scaled to the destination rectangle with
    /// nearest-neighbour sampling, alpha-blended onto the buffer.
    fn draw_image(&mut self, bounds: PixelRect, img: &LoadedImage) {
        let (src_w, src_h) = (img.width(), img.height());
        if src_w == 0 || src_h == 0 || bounds.is_empty() {
            return;
        }

        for dy in 0..bounds.height {
            for dx in 0..bounds.width {
                let sx = ((u64::from(dx) * u64::from(src_w)) / u64::from(bounds.width))
                    .min(u64::from(src_w) - 1) as u32;
                let sy = ((u64::from(dy) * u64::from(src_h)) / u64::from(bounds.height))
                    .min(u64::from(src_h) - 1) as u32;
                let Some(px) = img.pixel(sx, sy) else {
                    continue;
                };
                self.blend_pixel(
                    bounds.x.saturating_add(dx as i32),
                    bounds.y.saturating_add(dy as i32),
                    [px[0], px[1], px[2]],
                    px[3],
                );
            }
        }
    }

    /// Draw a text run with its top-left corner at `bounds`.
    fn draw_text(&mut self, bounds: PixelRect, run: &TextRun) {
        let Some(font) = self.fonts.select(run.font_weight, run.font_style) else {
            return;
        };

        let color = run.color;
        let rgb = [color.r, color.g, color.b];
        let font_size = run.font_size;
        let mut cursor_x = bounds.x as f32;

        for ch in run.text.chars() {
            if ch.is_control() {
                continue;
            }

            let (metrics, bitmap) = font.rasterize(ch, font_size);

            // fontdue offsets are relative to the baseline, one em below the top.
            let glyph_x = (cursor_x as i32).saturating_add(metrics.xmin);
            let glyph_y = bounds
                .y
                .saturating_add(font_size as i32)
                .saturating_sub(metrics.ymin)
                .saturating_sub(metrics.height as i32);

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    let alpha = (u16::from(coverage) * u16::from(color.a) / 255) as u8;
                    self.blend_pixel(
                        glyph_x.saturating_add(gx as i32),
                        glyph_y.saturating_add(gy as i32),
                        rgb,
                        alpha,
                    );
                }
            }

            cursor_x += metrics.advance_width;
        }
    }

    /// The RGBA value at `(x, y)`, or `None` outside the canvas.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.buffer.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// The rendered pixels.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Take the rendered pixels.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.buffer
    }

    /// Save the rendered image; the format follows the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be encoded or written.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.buffer
            .save(path)
            .with_context(|| format!("failed to save image to '{}'", path.display()))
    }
}

/// Alpha blend a foreground color onto a background color.
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;

    Rgba([
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a).round() as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a).round() as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a).round() as u8,
        255,
    ])
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn rect(x: i32, y: i32, width: u32, height: u32) -> PixelRect {
        PixelRect { x, y, width, height }
    }

    #[test]
    fn test_starts_white() {
        let fonts = FontSet::empty();
        let renderer = Renderer::new(4, 4, &fonts);
        assert_eq!(renderer.pixel(3, 3), Some([255, 255, 255, 255]));
        assert_eq!(renderer.pixel(4, 0), None);
    }

    #[test]
    fn test_fill_rect_clips_to_canvas() {
        let fonts = FontSet::empty();
        let mut renderer = Renderer::new(10, 10, &fonts);
        let mut list = DisplayList::new();
        list.fill_rect(rect(-5, 8, 20, 20), ColorValue::rgb(255, 0, 0));
        renderer.render(&list);
        assert_eq!(renderer.pixel(0, 9), Some([255, 0, 0, 255]));
        assert_eq!(renderer.pixel(9, 8), Some([255, 0, 0, 255]));
        assert_eq!(renderer.pixel(0, 7), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_later_commands_draw_on_top() {
        let fonts = FontSet::empty();
        let mut renderer = Renderer::new(4, 4, &fonts);
        let mut list = DisplayList::new();
        list.fill_rect(rect(0, 0, 4, 4), ColorValue::rgb(255, 0, 0));
        list.fill_rect(rect(1, 1, 2, 2), ColorValue::rgb(0, 0, 255));
        renderer.render(&list);
        assert_eq!(renderer.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(renderer.pixel(1, 1), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_translucent_fill_blends() {
        let fonts = FontSet::empty();
        let mut renderer = Renderer::new(2, 2, &fonts);
        let mut list = DisplayList::new();
        list.fill_rect(rect(0, 0, 2, 2), ColorValue { r: 0, g: 0, b: 0, a: 128 });
        renderer.render(&list);
        assert_eq!(renderer.pixel(0, 0), Some([127, 127, 127, 255]));
    }

    #[test]
    fn test_circle_covers_center_not_corners() {
        let fonts = FontSet::empty();
        let mut renderer = Renderer::new(20, 20, &fonts);
        let mut list = DisplayList::new();
        list.push(DisplayCommand::FillCircle {
            center_x: 10,
            center_y: 10,
            radius: 4,
            color: ColorValue::BLACK,
        });
        renderer.render(&list);
        assert_eq!(renderer.pixel(10, 10), Some([0, 0, 0, 255]));
        assert_eq!(renderer.pixel(6, 6), Some([255, 255, 255, 255]));
        assert_eq!(renderer.pixel(15, 10), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_huge_circle_is_clipped_to_canvas() {
        let fonts = FontSet::empty();
        let mut renderer = Renderer::new(8, 8, &fonts);
        let mut list = DisplayList::new();
        list.push(DisplayCommand::FillCircle {
            center_x: 4,
            center_y: 100_000,
            radius: 100_000,
            color: ColorValue::BLACK,
        });
        renderer.render(&list);
        assert_eq!(renderer.pixel(4, 7), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_rect_near_coordinate_limit_does_not_overflow() {
        let fonts = FontSet::empty();
        let mut renderer = Renderer::new(4, 4, &fonts);
        let mut list = DisplayList::new();
        list.fill_rect(rect(2_147_483_000, 0, 1000, 4), ColorValue::rgb(255, 0, 0));
        list.fill_rect(rect(0, 0, u32::MAX, 2), ColorValue::rgb(0, 0, 255));
        renderer.render(&list);
        assert_eq!(renderer.pixel(3, 0), Some([0, 0, 255, 255]));
        assert_eq!(renderer.pixel(3, 3), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_image_blit() {
        let fonts = FontSet::empty();
        let mut renderer = Renderer::new(4, 4, &fonts);
        let pixels = [[0, 255, 0, 255], [0, 0, 0, 0]].concat().repeat(2);
        let image = Arc::new(LoadedImage::new(2, 2, pixels).unwrap());
        let mut list = DisplayList::new();
        list.push(DisplayCommand::DrawImage {
            bounds: rect(1, 1, 2, 2),
            image,
        });
        renderer.render(&list);
        assert_eq!(renderer.pixel(1, 1), Some([0, 255, 0, 255]));
        // Transparent source pixel leaves the canvas alone.
        assert_eq!(renderer.pixel(2, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_text_without_fonts_is_skipped() {
        let fonts = FontSet::empty();
        let mut renderer = Renderer::new(20, 20, &fonts);
        let mut list = DisplayList::new();
        list.push(DisplayCommand::DrawText {
            bounds: rect(0, 0, 10, 10),
            run: TextRun {
                text: "x".to_string(),
                font_size: 16.0,
                color: ColorValue::BLACK,
                font_style: wren_css::FontStyle::Normal,
                font_weight: wren_css::FontWeight::Normal,
            },
        });
        renderer.render(&list);
        assert!(renderer.image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }
}
