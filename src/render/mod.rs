//! # Rendering Module
//!
//! Turns pictures into 1-bit bitmaps for the printer.
//!
//! ## Modules
//!
//! - [`dither`]: Threshold, Bayer 8x8 and Floyd-Steinberg dithering
//! - [`image`]: Decode, fit to paper width, dither
//! - [`qr`]: Software QR symbols
//!
//! ## Usage Example
//!
//! ```
//! use escpos_relay::render::{self, dither::DitheringAlgorithm};
//! use escpos_relay::protocol::graphics::{self, ImageMode};
//!
//! let img = ::image::DynamicImage::new_luma8(600, 300);
//! let bitmap = render::image::prepare(img, 510, DitheringAlgorithm::Bayer).unwrap();
//! assert_eq!(bitmap.width, 510);
//!
//! let cmd = graphics::image(ImageMode::BitImageRaster, bitmap.width, bitmap.height, &bitmap.data);
//! assert_eq!(&cmd[..3], &[0x1D, 0x76, 0x30]);
//! ```

use crate::error::{RelayError, RelayResult};

pub mod dither;
pub mod image;
pub mod qr;

/// A packed 1-bit image: rows of `width.div_ceil(8)` bytes, MSB = leftmost,
/// 1 = black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u16,
    pub height: u16,
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Wrap packed rows, checking that `data` holds exactly `height` rows.
    pub fn new(width: u16, height: u16, data: Vec<u8>) -> RelayResult<Self> {
        if width == 0 || height == 0 {
            return Err(RelayError::Image(format!("bitmap is empty ({}x{})", width, height)));
        }
        let bitmap = Self { width, height, data };
        let expected = bitmap.width_bytes() * height as usize;
        if bitmap.data.len() != expected {
            return Err(RelayError::Image(format!(
                "bitmap {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                bitmap.data.len()
            )));
        }
        Ok(bitmap)
    }

    pub fn width_bytes(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }
}
