//! # ESC/POS Graphics Commands
//!
//! Three ways of getting a 1-bit image onto paper:
//!
//! | Mode | Command | Notes |
//! |------|---------|-------|
//! | Raster | GS v 0 | Row-major bitmap, the most widely supported |
//! | Column | ESC * 33 | 24-dot vertical stripes, for older firmware |
//! | Graphics | GS ( L / GS 8 L | Store in the graphics buffer, then print |
//!
//! ## Bit Packing
//!
//! Every function here takes the same input: a row-major bitmap where each
//! byte holds 8 horizontal dots, MSB = leftmost, 1 = black. Rows are
//! `width_dots.div_ceil(8)` bytes long. This is what
//! [`crate::render::dither`] produces.
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0xAA = 10101010 = █░█░█░█░
//! ```

use super::commands::{ESC, GS, LF, u16_le};

/// Largest band sent in a single `GS v 0` command. Taller images are split,
/// which keeps each command inside the receive buffer of small printers.
pub const RASTER_FRAGMENT_HEIGHT: u16 = 960;

/// Rendering mode for images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageMode {
    /// `GS v 0`
    #[default]
    BitImageRaster,
    /// `ESC * 33`
    BitImageColumn,
    /// `GS ( L`
    Graphics,
}

impl ImageMode {
    /// Parse a mode name. Accepts the camelCase names used by common ESC/POS
    /// clients (`bitImageRaster`) as well as snake/kebab case and short forms.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "bitimageraster" | "raster" => Some(Self::BitImageRaster),
            "bitimagecolumn" | "column" => Some(Self::BitImageColumn),
            "graphics" => Some(Self::Graphics),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BitImageRaster => "bitImageRaster",
            Self::BitImageColumn => "bitImageColumn",
            Self::Graphics => "graphics",
        }
    }
}

/// Encode a packed bitmap with the given mode.
pub fn image(mode: ImageMode, width_dots: u16, height: u16, data: &[u8]) -> Vec<u8> {
    match mode {
        ImageMode::BitImageRaster => raster(width_dots, height, data),
        ImageMode::BitImageColumn => column(width_dots, height, data),
        ImageMode::Graphics => graphics(width_dots, height, data),
    }
}

// ============================================================================
// RASTER BIT IMAGE (GS v 0)
// ============================================================================

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
///
/// - `m`: 0 = normal density
/// - `xL, xH`: width in **bytes**
/// - `yL, yH`: height in dots
///
/// Images taller than [`RASTER_FRAGMENT_HEIGHT`] are emitted as several
/// consecutive commands.
///
/// ```
/// use escpos_relay::protocol::graphics;
///
/// let data = vec![0xFF; 64 * 10];
/// let cmd = graphics::raster(512, 10, &data);
/// assert_eq!(&cmd[..8], &[0x1D, 0x76, 0x30, 0, 64, 0, 10, 0]);
/// assert_eq!(cmd.len(), 8 + 640);
/// ```
pub fn raster(width_dots: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let width_bytes = width_dots.div_ceil(8) as usize;
    debug_assert_eq!(
        data.len(),
        width_bytes * height as usize,
        "raster data length must be width_bytes * height"
    );

    let mut cmd = Vec::with_capacity(data.len() + 8 * (height / RASTER_FRAGMENT_HEIGHT + 1) as usize);
    let mut row = 0u16;
    while row < height {
        let band = (height - row).min(RASTER_FRAGMENT_HEIGHT);
        let start = row as usize * width_bytes;
        let end = start + band as usize * width_bytes;
        cmd.extend(raster_fragment(width_bytes as u16, band, &data[start..end]));
        row += band;
    }
    cmd
}

fn raster_fragment(width_bytes: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);
    let mut cmd = Vec::with_capacity(8 + data.len());
    cmd.extend_from_slice(&[GS, b'v', b'0', 0, xl, xh, yl, yh]);
    cmd.extend_from_slice(data);
    cmd
}

// ============================================================================
// COLUMN BIT IMAGE (ESC * 33)
// ============================================================================

/// Dots per vertical stripe in 24-dot double-density mode
const COLUMN_STRIPE: usize = 24;

/// # Select Bit-Image Mode (ESC * m nL nH d1...dk)
///
/// Uses `m = 33` (24-dot double density). The bitmap is cut into 24-row
/// stripes; each column of a stripe is 3 bytes, top dot in the MSB of the
/// first byte. Line spacing is set to 24 dots for the duration so the
/// stripes butt together, then restored with `ESC 2`.
pub fn column(width_dots: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let width = width_dots as usize;
    let width_bytes = width.div_ceil(8);
    let height = height as usize;
    let [nl, nh] = u16_le(width_dots);

    let dot = |x: usize, y: usize| -> bool {
        y < height && (data[y * width_bytes + x / 8] >> (7 - (x % 8))) & 1 == 1
    };

    let stripes = height.div_ceil(COLUMN_STRIPE);
    let mut cmd = Vec::with_capacity(3 + stripes * (6 + width * 3) + 2);
    cmd.extend_from_slice(&[ESC, b'3', COLUMN_STRIPE as u8]);

    for stripe in 0..stripes {
        let top = stripe * COLUMN_STRIPE;
        cmd.extend_from_slice(&[ESC, b'*', 33, nl, nh]);
        for x in 0..width {
            for slice in 0..3 {
                let mut byte = 0u8;
                for bit in 0..8 {
                    if dot(x, top + slice * 8 + bit) {
                        byte |= 1 << (7 - bit);
                    }
                }
                cmd.push(byte);
            }
        }
        cmd.push(LF);
    }

    cmd.extend_from_slice(&[ESC, b'2']);
    cmd
}

// ============================================================================
// GRAPHICS BUFFER (GS ( L / GS 8 L)
// ============================================================================

/// # Store Raster Graphics, then Print (GS ( L fn 112 + fn 50)
///
/// Store: `GS ( L pL pH 48 112 48 1 1 49 xL xH yL yH d1...dk` where
/// `p = k + 10`. When `p` does not fit in 16 bits the extended form
/// `GS 8 L p1 p2 p3 p4 ...` is used instead.
///
/// Print: `GS ( L 2 0 48 50`.
pub fn graphics(width_dots: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let [xl, xh] = u16_le(width_dots);
    let [yl, yh] = u16_le(height);
    let body = [48, 112, 48, 1, 1, 49, xl, xh, yl, yh];
    let p = data.len() + body.len();

    let mut cmd = Vec::with_capacity(p + 16);
    if p <= u16::MAX as usize {
        let [pl, ph] = u16_le(p as u16);
        cmd.extend_from_slice(&[GS, b'(', b'L', pl, ph]);
    } else {
        let len = (p as u32).to_le_bytes();
        cmd.extend_from_slice(&[GS, b'8', b'L']);
        cmd.extend_from_slice(&len);
    }
    cmd.extend_from_slice(&body);
    cmd.extend_from_slice(data);
    cmd.extend_from_slice(&[GS, b'(', b'L', 2, 0, 48, 50]);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(ImageMode::parse("bitImageRaster"), Some(ImageMode::BitImageRaster));
        assert_eq!(ImageMode::parse("bit_image_column"), Some(ImageMode::BitImageColumn));
        assert_eq!(ImageMode::parse("GRAPHICS"), Some(ImageMode::Graphics));
        assert_eq!(ImageMode::parse("sixel"), None);
    }

    #[test]
    fn test_raster_header() {
        let data = vec![0xAA; 2 * 3];
        let cmd = raster(16, 3, &data);
        assert_eq!(&cmd[..8], &[0x1D, 0x76, 0x30, 0x00, 2, 0, 3, 0]);
        assert_eq!(&cmd[8..], &data[..]);
    }

    #[test]
    fn test_raster_width_rounding() {
        // 510 dots round up to 64 bytes
        let data = vec![0u8; 64];
        let cmd = raster(510, 1, &data);
        assert_eq!(cmd[4], 64);
    }

    #[test]
    fn test_raster_splits_tall_images() {
        let height = RASTER_FRAGMENT_HEIGHT + 40;
        let data = vec![0x0F; height as usize];
        let cmd = raster(8, height, &data);

        // Two headers
        assert_eq!(cmd.len(), 2 * 8 + height as usize);
        assert_eq!(&cmd[..3], &[0x1D, 0x76, 0x30]);
        assert_eq!(u16::from_le_bytes([cmd[6], cmd[7]]), RASTER_FRAGMENT_HEIGHT);

        let second = 8 + RASTER_FRAGMENT_HEIGHT as usize;
        assert_eq!(&cmd[second..second + 3], &[0x1D, 0x76, 0x30]);
        assert_eq!(cmd[second + 6], 40);
    }

    #[test]
    fn test_column_layout() {
        // 8 dots wide, 24 rows, only the top-left dot is black
        let mut data = vec![0u8; 24];
        data[0] = 0x80;
        let cmd = column(8, 24, &data);

        assert_eq!(&cmd[..3], &[0x1B, 0x33, 24]);
        assert_eq!(&cmd[3..8], &[0x1B, 0x2A, 33, 8, 0]);
        // First column: top dot set in the MSB of the first byte
        assert_eq!(&cmd[8..11], &[0x80, 0x00, 0x00]);
        // Remaining 7 columns are blank
        assert!(cmd[11..8 + 24].iter().all(|&b| b == 0));
        assert_eq!(cmd[8 + 24], LF);
        assert_eq!(&cmd[cmd.len() - 2..], &[0x1B, 0x32]);
    }

    #[test]
    fn test_column_pads_partial_stripe() {
        // 10 rows still produce one full 24-dot stripe
        let data = vec![0xFF; 10];
        let cmd = column(8, 10, &data);
        let stripe = &cmd[8..8 + 24];
        for col in stripe.chunks(3) {
            assert_eq!(col, &[0xFF, 0xC0, 0x00]);
        }
    }

    #[test]
    fn test_graphics_store_and_print() {
        let data = vec![0xFF; 4];
        let cmd = graphics(16, 2, &data);
        // p = 4 + 10
        assert_eq!(&cmd[..5], &[0x1D, 0x28, 0x4C, 14, 0]);
        assert_eq!(&cmd[5..15], &[48, 112, 48, 1, 1, 49, 16, 0, 2, 0]);
        assert_eq!(&cmd[15..19], &data[..]);
        assert_eq!(&cmd[19..], &[0x1D, 0x28, 0x4C, 2, 0, 48, 50]);
    }

    #[test]
    fn test_graphics_extended_length() {
        let data = vec![0u8; 70_000];
        let cmd = graphics(560, 1000, &data);
        assert_eq!(&cmd[..3], &[0x1D, 0x38, 0x4C]);
        assert_eq!(u32::from_le_bytes([cmd[3], cmd[4], cmd[5], cmd[6]]), 70_010);
    }
}
