//! Local image loading: resolve, read, decode.
//!
//! [§ 4.8.3 The img element](https://html.spec.whatwg.org/multipage/embedded-content.html#the-img-element)
//!
//! Only files on disk are loaded. Remote URLs and `data:` URLs are rejected
//! with [`ImageError::UnsupportedSource`]. Decoding goes through the `image`
//! crate, which sniffs PNG/JPEG/GIF/... from the bytes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wren_common::image::LoadedImage;
use wren_common::warning::warn_once;
use wren_css::layout::{ImageError, ImageLoader, is_remote_source};

/// Strip query string (`?…`) and fragment identifier (`#…`) so the rest can
/// be used as a file path.
///
/// [URL Standard § 4.1](https://url.spec.whatwg.org/#concept-url-path)
#[must_use]
pub fn strip_url_decorations(src: &str) -> &str {
    let without_fragment = src.split_once('#').map_or(src, |(b, _)| b);
    without_fragment
        .split_once('?')
        .map_or(without_fragment, |(b, _)| b)
}

/// Decode `bytes` into RGBA pixels.
///
/// # Errors
///
/// Returns [`ImageError::Decode`] when the bytes are not a supported image.
pub fn decode_image(path: &str, bytes: &[u8]) -> Result<LoadedImage, ImageError> {
    let decode_error = |source: Box<dyn std::error::Error + Send + Sync>| ImageError::Decode {
        path: path.to_string(),
        source,
    };
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| decode_error(Box::new(e)))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    LoadedImage::new(width, height, rgba.into_raw())
        .ok_or_else(|| decode_error("decoded pixel buffer has the wrong size".into()))
}

/// Loads images from the filesystem, relative to a base directory.
///
/// Each source is read and decoded at most once per loader.
#[derive(Debug, Default)]
pub struct FsImageLoader {
    base_dir: Option<PathBuf>,
    cache: RefCell<HashMap<PathBuf, Arc<LoadedImage>>>,
}

impl FsImageLoader {
    /// Resolve relative sources against the current directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative sources against `base_dir` (normally the directory
    /// of the document).
    #[must_use]
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            ..Self::default()
        }
    }

    fn resolve(&self, src: &str) -> PathBuf {
        let path = Path::new(src);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, src: &str) -> Result<Arc<LoadedImage>, ImageError> {
        let src = src.trim();
        if is_remote_source(src) {
            return Err(ImageError::UnsupportedSource(src.to_string()));
        }

        let stripped = strip_url_decorations(src);
        if stripped.len() != src.len() {
            warn_once(
                "image",
                &format!("ignoring query string or fragment in {src:?}"),
            );
        }

        let path = self.resolve(stripped);
        if let Some(image) = self.cache.borrow().get(&path) {
            return Ok(Arc::clone(image));
        }

        let bytes = fs::read(&path).map_err(|source| ImageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let image = Arc::new(decode_image(&path.display().to_string(), &bytes)?);
        let _ = self
            .cache
            .borrow_mut()
            .insert(path, Arc::clone(&image));
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wren-image-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_strip_url_decorations() {
        assert_eq!(strip_url_decorations("a.png?w=10#x"), "a.png");
        assert_eq!(strip_url_decorations("a.png#x"), "a.png");
        assert_eq!(strip_url_decorations("a.png"), "a.png");
    }

    #[test]
    fn test_remote_rejected() {
        let loader = FsImageLoader::new();
        let err = loader.load("https://example.com/a.png").unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedSource(_)));
    }

    #[test]
    fn test_missing_file() {
        let loader = FsImageLoader::with_base_dir(temp_dir("missing"));
        let err = loader.load("nope.png").unwrap_err();
        assert!(matches!(err, ImageError::Io { .. }));
    }

    #[test]
    fn test_undecodable_file() {
        let dir = temp_dir("garbage");
        fs::write(dir.join("bad.png"), b"not an image").unwrap();
        let loader = FsImageLoader::with_base_dir(&dir);
        let err = loader.load("bad.png").unwrap_err();
        assert!(matches!(err, ImageError::Decode { .. }));
    }

    #[test]
    fn test_png_decodes_and_caches() {
        let dir = temp_dir("png");
        let png = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        png.save(dir.join("dot.png")).unwrap();

        let loader = FsImageLoader::with_base_dir(&dir);
        let first = loader.load("dot.png").unwrap();
        assert_eq!((first.width(), first.height()), (3, 2));
        assert_eq!(first.pixel(2, 1), Some([10, 20, 30, 255]));

        let second = loader.load("dot.png?v=2").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
