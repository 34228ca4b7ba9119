//! # ESC/POS Protocol Implementation
//!
//! Low-level command encoders for Epson-compatible thermal receipt printers.
//! Every function returns the exact bytes for one command; nothing here does
//! I/O or keeps state.
//!
//! ## Module Structure
//!
//! - [`commands`]: Init, feed, cut, buzzer, drawer kick
//! - [`text`]: Alignment, emphasis, underline, character size, code page
//! - [`graphics`]: Raster, column and graphics-buffer bit images
//! - [`barcode`]: 1D barcodes and native QR codes
//! - [`cp437`]: Text encoding for the PC437 code table
//!
//! ## Usage Example
//!
//! ```
//! use escpos_relay::protocol::{commands, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::align(text::Alignment::Center));
//! data.extend(text::bold(true));
//! data.extend(b"RECEIPT\n");
//! data.extend(text::bold(false));
//! data.extend(commands::feed_lines(3));
//! data.extend(commands::cut(commands::CutMode::Full));
//!
//! assert_eq!(&data[..2], &[0x1B, 0x40]);
//! ```

pub mod barcode;
pub mod commands;
pub mod cp437;
pub mod graphics;
pub mod text;
