//! # Dithering
//!
//! Converts continuous-tone intensity buffers into 1-bit packed rows for the
//! graphics commands in [`crate::protocol::graphics`].
//!
//! Intensity convention: `0.0` = white (no dot), `1.0` = black (dot).
//!
//! | Algorithm | Speed | Look |
//! |-----------|-------|------|
//! | Threshold | Fastest | Hard edges, banding on photos |
//! | Bayer 8x8 | Fast | Regular halftone screen |
//! | Floyd-Steinberg | Slower | Fine grain, best for photos |
//!
//! ```
//! use escpos_relay::render::dither::pack_row;
//!
//! let row = vec![true, true, false, false, true, false, true, false];
//! assert_eq!(pack_row(&row), vec![0b11001010]);
//! ```

/// Dithering algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitheringAlgorithm {
    /// Fixed 50% threshold
    Threshold,
    /// Ordered dithering with the 8x8 Bayer matrix
    Bayer,
    /// Error diffusion
    #[default]
    FloydSteinberg,
}

impl DitheringAlgorithm {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "threshold" => Some(Self::Threshold),
            "bayer" | "ordered" => Some(Self::Bayer),
            "floyd-steinberg" | "floyd_steinberg" | "fs" => Some(Self::FloydSteinberg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Threshold => "threshold",
            Self::Bayer => "bayer",
            Self::FloydSteinberg => "floyd-steinberg",
        }
    }
}

/// Bayer 8x8 threshold matrix, values 0-63.
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Ordered-dither threshold for a pixel, strictly inside (0, 1) so pure
/// black always prints and pure white never does.
#[inline]
pub fn bayer_threshold(x: usize, y: usize) -> f32 {
    (BAYER8[y & 7][x & 7] as f32 + 0.5) / 64.0
}

/// Pack a row of dots into bytes, MSB = leftmost, padded with white.
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; pixels.len().div_ceil(8)];
    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    bytes
}

/// Dither a row-major intensity buffer into packed raster rows.
///
/// Returns `width.div_ceil(8) * height` bytes.
///
/// ```
/// use escpos_relay::render::dither::{dither, DitheringAlgorithm};
///
/// let black = vec![1.0f32; 16 * 2];
/// let data = dither(&black, 16, 2, DitheringAlgorithm::Bayer);
/// assert_eq!(data, vec![0xFF; 4]);
/// ```
pub fn dither(intensity: &[f32], width: usize, height: usize, algo: DitheringAlgorithm) -> Vec<u8> {
    debug_assert_eq!(intensity.len(), width * height);

    let mut data = Vec::with_capacity(width.div_ceil(8) * height);
    match algo {
        DitheringAlgorithm::Threshold => {
            for row in intensity.chunks(width.max(1)).take(height) {
                let dots: Vec<bool> = row.iter().map(|&v| v >= 0.5).collect();
                data.extend(pack_row(&dots));
            }
        }
        DitheringAlgorithm::Bayer => {
            for (y, row) in intensity.chunks(width.max(1)).take(height).enumerate() {
                let dots: Vec<bool> = row
                    .iter()
                    .enumerate()
                    .map(|(x, &v)| v > bayer_threshold(x, y))
                    .collect();
                data.extend(pack_row(&dots));
            }
        }
        DitheringAlgorithm::FloydSteinberg => {
            let mut buf = intensity.to_vec();
            for y in 0..height {
                let mut dots = Vec::with_capacity(width);
                for x in 0..width {
                    let idx = y * width + x;
                    let old = buf[idx].clamp(0.0, 1.0);
                    let on = old >= 0.5;
                    let err = old - if on { 1.0 } else { 0.0 };
                    dots.push(on);

                    if x + 1 < width {
                        buf[idx + 1] += err * 7.0 / 16.0;
                    }
                    if y + 1 < height {
                        let below = idx + width;
                        if x > 0 {
                            buf[below - 1] += err * 3.0 / 16.0;
                        }
                        buf[below] += err * 5.0 / 16.0;
                        if x + 1 < width {
                            buf[below + 1] += err * 1.0 / 16.0;
                        }
                    }
                }
                data.extend(pack_row(&dots));
            }
        }
    }
    data
}
