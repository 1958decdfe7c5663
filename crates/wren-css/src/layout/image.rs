//! Replaced image content.
//!
//! [CSS 2.1 § 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
//!
//! "If 'height' and 'width' both have computed values of 'auto' and the
//! element also has an intrinsic width, then that intrinsic width is the used
//! value of 'width'."
//!
//! Images are always drawn at their intrinsic size. Only sources that name a
//! local file are loaded; fetching and `data:` URLs are out of scope.

use std::sync::Arc;

use thiserror::Error;
use wren_common::image::LoadedImage;
use wren_common::warning::warn_once;
use wren_dom::ElementData;

use super::{Content, LayoutContext, Zone};
use crate::paint::{DisplayCommand, PixelRect};

/// Why an image could not be produced.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Remote, protocol-relative and `data:` sources are not loaded.
    #[error("unsupported image source {0:?}: only local paths are loaded")]
    UnsupportedSource(String),

    /// The file could not be read.
    #[error("cannot read image {path}")]
    Io {
        /// Path as written in `src`.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not an image the decoder understands.
    #[error("cannot decode image {path}: {source}")]
    Decode {
        /// Path as written in `src`.
        path: String,
        /// Decoder error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Turns an `img` `src` into decoded pixels.
pub trait ImageLoader {
    /// Load and decode `src`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] when the source is unsupported, unreadable or
    /// undecodable. Layout logs the error and skips the element.
    fn load(&self, src: &str) -> Result<Arc<LoadedImage>, ImageError>;
}

/// Loader that never produces an image. Every `img` is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageLoader for NoImages {
    fn load(&self, src: &str) -> Result<Arc<LoadedImage>, ImageError> {
        Err(ImageError::UnsupportedSource(src.to_string()))
    }
}

/// Whether `src` points anywhere but the local filesystem.
///
/// ```
/// use wren_css::layout::is_remote_source;
///
/// assert!(is_remote_source("https://example.com/cat.png"));
/// assert!(is_remote_source("data:image/png;base64,AAAA"));
/// assert!(!is_remote_source("images/cat.png"));
/// ```
#[must_use]
pub fn is_remote_source(src: &str) -> bool {
    let src = src.trim().to_ascii_lowercase();
    ["http://", "https://", "data:", "//"]
        .iter()
        .any(|prefix| src.starts_with(prefix))
}

impl LayoutContext<'_> {
    /// Blit the image named by `src` at the zone's origin and advance by its
    /// height. Failures leave the cursor where it was.
    pub(super) fn layout_image(&mut self, element: &ElementData, zone: Zone) -> Content {
        let Some(src) = element
            .get_attribute("src")
            .map(str::trim)
            .filter(|src| !src.is_empty())
        else {
            warn_once("image", "img without a src attribute skipped");
            return Content::default();
        };

        match self.images.load(src) {
            Ok(image) => {
                let bounds = PixelRect {
                    x: zone.x.round() as i32,
                    y: zone.y.round() as i32,
                    width: image.width(),
                    height: image.height(),
                };
                let content = Content {
                    width: image.width() as f32,
                    height: image.height() as f32,
                    ..Content::default()
                };
                self.list.push(DisplayCommand::DrawImage { bounds, image });
                content
            }
            Err(err) => {
                warn_once("image", &err.to_string());
                Content::default()
            }
        }
    }
}
