//! # ESC/POS Basic Commands
//!
//! Printer initialization, paper handling (feed, cut) and peripheral control
//! (buzzer, cash drawer).
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`
//! - Two bytes: `ESC @`
//! - Multi-byte with parameters: `ESC d n`, `ESC p m t1 t2`, `GS V m`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for character size, cutter, barcode, raster and 2D symbol commands.
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets modes to their power-on defaults.
/// Every job built by this crate starts with it, so no style leaks in from
/// a previous request.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ## Example
///
/// ```
/// use escpos_relay::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// PAPER FEED
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
///
/// Prints the line buffer and feeds the paper `n` lines.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC d n  |
/// | Hex     | 1B 64 n  |
///
/// ```
/// use escpos_relay::protocol::commands;
///
/// assert_eq!(commands::feed_lines(5), vec![0x1B, 0x64, 5]);
/// ```
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

// ============================================================================
// CUTTER
// ============================================================================

/// Cutter mode for `GS V m`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutMode {
    /// Cut all the way through the paper
    #[default]
    Full = 0,
    /// Leave a small hinge so the receipt does not drop
    Partial = 1,
}

impl CutMode {
    /// Parse a cut mode name (`full` / `partial`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Some(Self::Full),
            "partial" | "part" => Some(Self::Partial),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
        }
    }
}

/// # Select Cut Mode and Cut Paper (GS V m)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V m   |
/// | Hex     | 1D 56 m  |
///
/// - `m = 0`: full cut
/// - `m = 1`: partial cut
///
/// ```
/// use escpos_relay::protocol::commands::{cut, CutMode};
///
/// assert_eq!(cut(CutMode::Full), vec![0x1D, 0x56, 0x00]);
/// assert_eq!(cut(CutMode::Partial), vec![0x1D, 0x56, 0x01]);
/// ```
#[inline]
pub fn cut(mode: CutMode) -> Vec<u8> {
    vec![GS, b'V', mode as u8]
}

// ============================================================================
// PERIPHERALS
// ============================================================================

/// # Buzzer (ESC B n t)
///
/// Sounds the built-in buzzer `count` times, each lasting `duration` × ~100ms.
/// Both parameters are meaningful in 1-9; callers validate the range.
///
/// | Format  | Bytes       |
/// |---------|-------------|
/// | ASCII   | ESC B n t   |
/// | Hex     | 1B 42 n t   |
#[inline]
pub fn beep(count: u8, duration: u8) -> Vec<u8> {
    vec![ESC, b'B', count, duration]
}

/// Cash drawer connector pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawerPin {
    /// Connector pin 2
    #[default]
    Pin2 = 0,
    /// Connector pin 5
    Pin5 = 1,
}

/// # Generate Drawer Kick Pulse (ESC p m t1 t2)
///
/// Sends a pulse through the drawer connector. The ON time is `t1 × 2ms`,
/// the OFF time `t2 × 2ms`.
///
/// | Format  | Bytes            |
/// |---------|------------------|
/// | ASCII   | ESC p m t1 t2    |
/// | Hex     | 1B 70 m t1 t2    |
///
/// ```
/// use escpos_relay::protocol::commands::{drawer_kick, DrawerPin};
///
/// assert_eq!(drawer_kick(DrawerPin::Pin2, 100, 100), vec![0x1B, 0x70, 0, 100, 100]);
/// ```
#[inline]
pub fn drawer_kick(pin: DrawerPin, t1: u8, t2: u8) -> Vec<u8> {
    vec![ESC, b'p', pin as u8, t1, t2]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use escpos_relay::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(510), [0xFE, 0x01]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}
