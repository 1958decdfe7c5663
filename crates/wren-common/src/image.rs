//! Decoded image data shared between the image loader, layout and paint.

/// An image decoded to straight (non-premultiplied) RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    width: u32,
    height: u32,
    /// `width * height * 4` bytes, row-major.
    rgba_data: Vec<u8>,
}

impl LoadedImage {
    /// Wrap decoded RGBA pixel data.
    ///
    /// Returns `None` when `rgba_data` is not exactly `width * height * 4` bytes.
    #[must_use]
    pub fn new(width: u32, height: u32, rgba_data: Vec<u8>) -> Option<Self> {
        let expected = u64::from(width) * u64::from(height) * 4;
        if rgba_data.len() as u64 != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba_data,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixel data.
    #[must_use]
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    /// The RGBA value at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((u64::from(y) * u64::from(self.width) + u64::from(x)) * 4) as usize;
        let px = self.rgba_data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
