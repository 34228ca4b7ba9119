//! Image preparation for printing.
//!
//! Decodes an upload, shrinks it to the paper width and dithers it into the
//! packed bitmap layout the graphics commands expect.

use image::{imageops::FilterType, DynamicImage};

use super::dither::{self, DitheringAlgorithm};
use super::Bitmap;
use crate::error::{RelayError, RelayResult};

/// Widest paper the graphics commands can address.
pub const MAX_PAPER_WIDTH: u32 = 2048;

/// Decode an encoded image (PNG, JPEG, BMP, GIF).
pub fn decode(bytes: &[u8]) -> RelayResult<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| RelayError::Image(format!("cannot decode image: {}", e)))
}

/// Downscale `img` so it fits `paper_width` dots, keeping the aspect ratio.
/// Narrower images are returned untouched.
pub fn fit_to_width(img: DynamicImage, paper_width: u32) -> DynamicImage {
    if img.width() <= paper_width {
        return img;
    }
    let aspect_ratio = img.height() as f32 / img.width() as f32;
    let target_height = ((paper_width as f32 * aspect_ratio).round() as u32).max(1);
    img.resize_exact(paper_width, target_height, FilterType::Lanczos3)
}

/// Resize, convert to grayscale and dither.
///
/// Transparent pixels are treated as white paper.
pub fn prepare(img: DynamicImage, paper_width: u32, algo: DitheringAlgorithm) -> RelayResult<Bitmap> {
    if paper_width == 0 || paper_width > MAX_PAPER_WIDTH {
        return Err(RelayError::InvalidCommand(format!(
            "paper_width must be between 1 and {}, got {}",
            MAX_PAPER_WIDTH, paper_width
        )));
    }
    if img.width() == 0 || img.height() == 0 {
        return Err(RelayError::Image("image has no pixels".to_string()));
    }

    let img = fit_to_width(img, paper_width);
    let height = img.height();
    if height > u16::MAX as u32 {
        return Err(RelayError::Image(format!("image is too tall to print ({} rows)", height)));
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let intensity: Vec<f32> = rgba
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            let luma = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0;
            let alpha = a as f32 / 255.0;
            // Composite over white
            let luma = luma * alpha + (1.0 - alpha);
            1.0 - luma
        })
        .collect();

    let data = dither::dither(&intensity, width as usize, height as usize, algo);
    Bitmap::new(width as u16, height as u16, data)
}
