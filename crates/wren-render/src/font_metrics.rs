//! System fonts and fontdue-backed text measurement.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use std::path::Path;

use fontdue::{Font, FontSettings};
use wren_common::warning::warn_once;
use wren_css::layout::{ApproximateFontMetrics, FontMetrics};
use wren_css::{FontStyle, FontWeight};

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// System font paths for bold variants.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// System font paths for italic variants.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// System font paths for bold-italic variants.
const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// The four faces used to draw text. Any of them may be missing.
#[derive(Default)]
pub struct FontSet {
    regular: Option<Font>,
    bold: Option<Font>,
    italic: Option<Font>,
    bold_italic: Option<Font>,
}

impl FontSet {
    /// A set with no fonts. Text is measured approximately and not drawn.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Search the usual system locations for each face.
    #[must_use]
    pub fn load_system() -> Self {
        let fonts = Self {
            regular: load_font_from_paths(FONT_SEARCH_PATHS),
            bold: load_font_from_paths(FONT_BOLD_SEARCH_PATHS),
            italic: load_font_from_paths(FONT_ITALIC_SEARCH_PATHS),
            bold_italic: load_font_from_paths(FONT_BOLD_ITALIC_SEARCH_PATHS),
        };
        if fonts.regular.is_none() {
            warn_once(
                "render",
                "no system font found; text is measured approximately and not drawn",
            );
        }
        fonts
    }

    /// A set using one font file for every face.
    #[must_use]
    pub fn from_file(path: &Path) -> Option<Self> {
        let font = read_font(path)?;
        Some(Self {
            regular: Some(font),
            ..Self::default()
        })
    }

    /// Whether any face is available for drawing.
    #[must_use]
    pub const fn has_regular(&self) -> bool {
        self.regular.is_some()
    }

    /// Best available face for `weight` and `style`: exact match, then
    /// partial match, then regular.
    #[must_use]
    pub fn select(&self, weight: FontWeight, style: FontStyle) -> Option<&Font> {
        let bold = weight == FontWeight::Bold;
        let italic = style == FontStyle::Italic;
        let regular = self.regular.as_ref();
        match (bold, italic) {
            (true, true) => self
                .bold_italic
                .as_ref()
                .or(self.bold.as_ref())
                .or(self.italic.as_ref())
                .or(regular),
            (true, false) => self.bold.as_ref().or(regular),
            (false, true) => self.italic.as_ref().or(regular),
            (false, false) => regular,
        }
    }
}

fn read_font(path: &Path) -> Option<Font> {
    let data = std::fs::read(path).ok()?;
    Font::from_bytes(data, FontSettings::default()).ok()
}

fn load_font_from_paths(paths: &[&str]) -> Option<Font> {
    paths.iter().find_map(|path| read_font(Path::new(path)))
}

/// Font metrics implementation backed by fontdue's per-glyph metrics.
///
/// Measures with the regular face, falling back to
/// [`ApproximateFontMetrics`] when the set has none. Uses `Font::metrics()`
/// (not `Font::rasterize()`) so no bitmaps are generated.
pub struct FontdueFontMetrics<'a> {
    fonts: &'a FontSet,
}

impl<'a> FontdueFontMetrics<'a> {
    /// Measure with the faces of `fonts`.
    #[must_use]
    pub const fn new(fonts: &'a FontSet) -> Self {
        Self { fonts }
    }
}

impl FontMetrics for FontdueFontMetrics<'_> {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        // Same per-character advance as Renderer::draw_text.
        match &self.fonts.regular {
            Some(font) => text
                .chars()
                .filter(|ch| !ch.is_control())
                .map(|ch| font.metrics(ch, font_size).advance_width)
                .sum(),
            None => ApproximateFontMetrics.text_width(text, font_size),
        }
    }

    fn line_height(&self, font_size: f32) -> f32 {
        ApproximateFontMetrics.line_height(font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_measures_approximately() {
        let fonts = FontSet::empty();
        let metrics = FontdueFontMetrics::new(&fonts);
        assert!((metrics.text_width("abcd", 10.0) - 24.0).abs() < 1e-4);
        assert!((metrics.line_height(10.0) - 12.0).abs() < 1e-4);
        assert!(fonts.select(FontWeight::Bold, FontStyle::Italic).is_none());
    }

    #[test]
    fn test_missing_font_file() {
        assert!(FontSet::from_file(Path::new("/nonexistent/font.ttf")).is_none());
    }
}
