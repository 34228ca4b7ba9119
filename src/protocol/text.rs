//! # ESC/POS Text Styling Commands
//!
//! | Style | Command | Effect |
//! |-------|---------|--------|
//! | Alignment | ESC a n | Left / center / right justification |
//! | Bold | ESC E n | Emphasized text |
//! | Underline | ESC - n | 1-dot or 2-dot underline |
//! | Character size | GS ! n | 1-8x width and height |
//! | Invert | GS B n | White on black |
//! | Code page | ESC t n | Character table for bytes 0x80-0xFF |
//!
//! All of these modes stay active until changed or until `ESC @`.

use super::commands::{ESC, GS};
use crate::error::{RelayError, RelayResult};

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

impl Alignment {
    /// Parse `left` / `center` / `right` (also `centre`, `l`, `c`, `r`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Some(Self::Left),
            "center" | "centre" | "c" => Some(Self::Center),
            "right" | "r" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// # Select Justification (ESC a n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
///
/// Takes effect at the start of the next line.
///
/// ```
/// use escpos_relay::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

// ============================================================================
// EMPHASIS
// ============================================================================

/// # Turn Emphasized Mode On/Off (ESC E n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC E n  |
/// | Hex     | 1B 45 n  |
#[inline]
pub fn bold(enabled: bool) -> Vec<u8> {
    vec![ESC, b'E', enabled as u8]
}

// ============================================================================
// UNDERLINE
// ============================================================================

/// Underline thickness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Underline {
    #[default]
    None = 0,
    /// 1 dot thick
    Single = 1,
    /// 2 dots thick
    Double = 2,
}

impl Underline {
    pub fn from_mode(mode: i64) -> RelayResult<Self> {
        match mode {
            0 => Ok(Self::None),
            1 => Ok(Self::Single),
            2 => Ok(Self::Double),
            other => Err(RelayError::InvalidCommand(format!(
                "underline must be 0, 1 or 2, got {}",
                other
            ))),
        }
    }
}

/// # Turn Underline Mode On/Off (ESC - n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC - n  |
/// | Hex     | 1B 2D n  |
///
/// Underline does not apply to spaces produced by HT or to rotated text.
#[inline]
pub fn underline(mode: Underline) -> Vec<u8> {
    vec![ESC, b'-', mode as u8]
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// Character magnification, validated to 1-8 on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSize {
    width: u8,
    height: u8,
}

impl CharSize {
    pub const NORMAL: CharSize = CharSize {
        width: 1,
        height: 1,
    };

    pub const DOUBLE: CharSize = CharSize {
        width: 2,
        height: 2,
    };

    /// Build a size from width and height multipliers.
    ///
    /// ```
    /// use escpos_relay::protocol::text::CharSize;
    ///
    /// assert!(CharSize::new(2, 3).is_ok());
    /// assert!(CharSize::new(0, 1).is_err());
    /// assert!(CharSize::new(1, 9).is_err());
    /// ```
    pub fn new(width: i64, height: i64) -> RelayResult<Self> {
        let check = |name: &str, v: i64| -> RelayResult<u8> {
            if (1..=8).contains(&v) {
                Ok(v as u8)
            } else {
                Err(RelayError::InvalidCommand(format!(
                    "{} must be between 1 and 8, got {}",
                    name, v
                )))
            }
        };
        Ok(Self {
            width: check("width", width)?,
            height: check("height", height)?,
        })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// The `GS !` parameter byte: width in the high nibble, height in the low.
    pub fn to_byte(&self) -> u8 {
        ((self.width - 1) << 4) | (self.height - 1)
    }
}

impl Default for CharSize {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// # Select Character Size (GS ! n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS ! n   |
/// | Hex     | 1D 21 n  |
///
/// Bits 4-6 hold `width - 1`, bits 0-2 hold `height - 1`.
///
/// ```
/// use escpos_relay::protocol::text::{char_size, CharSize};
///
/// let size = CharSize::new(2, 3).unwrap();
/// assert_eq!(char_size(size), vec![0x1D, 0x21, 0x12]);
/// ```
#[inline]
pub fn char_size(size: CharSize) -> Vec<u8> {
    vec![GS, b'!', size.to_byte()]
}

// ============================================================================
// REVERSE PRINTING
// ============================================================================

/// # Turn White/Black Reverse Printing On/Off (GS B n)
#[inline]
pub fn invert(enabled: bool) -> Vec<u8> {
    vec![GS, b'B', enabled as u8]
}

// ============================================================================
// CODE PAGE
// ============================================================================

/// # Select Character Code Table (ESC t n)
///
/// `n = 0` selects PC437, which is what [`super::cp437::encode`] produces.
#[inline]
pub fn code_page(n: u8) -> Vec<u8> {
    vec![ESC, b't', n]
}

/// Code table index of PC437 (USA, Standard Europe)
pub const CODE_PAGE_PC437: u8 = 0;
