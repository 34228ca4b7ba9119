//! QR codes and 1D barcodes.

use super::{in_range, Finish, Job};
use crate::error::{RelayError, RelayResult};
use crate::protocol::barcode::barcode1d::{self, Symbology};
use crate::protocol::barcode::qr::{self, QrErrorLevel};
use crate::protocol::graphics::{self, ImageMode};
use crate::protocol::text::{self, Alignment};
use crate::render::{self, Bitmap};

fn centered(center: bool, out: &mut Vec<u8>, body: impl FnOnce(&mut Vec<u8>)) {
    if center {
        out.extend(text::align(Alignment::Center));
    }
    body(out);
    if center {
        out.extend(text::align(Alignment::Left));
    }
}

// ============================================================================
// QR
// ============================================================================

/// How the symbol reaches the paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrSymbol {
    /// Printer-side encoding with `GS ( k`
    Native,
    /// Rendered here and sent as a raster image
    Raster(Bitmap),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrJob {
    pub data: Vec<u8>,
    pub size: u8,
    pub level: QrErrorLevel,
    pub symbol: QrSymbol,
    pub center: bool,
    pub finish: Finish,
}

impl QrJob {
    /// Validate payload and module size. With `native == false` the symbol
    /// is rendered immediately, which can fail if the payload does not fit.
    pub fn new(text: &str, size: i64, level: QrErrorLevel, native: bool) -> RelayResult<Self> {
        let data = text.as_bytes().to_vec();
        if data.is_empty() || data.len() > qr::MAX_PAYLOAD {
            return Err(RelayError::InvalidCommand(format!(
                "QR text must be between 1 and {} bytes, got {}",
                qr::MAX_PAYLOAD,
                data.len()
            )));
        }
        let size = in_range("size", size, 1, 8)?;
        let symbol = if native {
            QrSymbol::Native
        } else {
            QrSymbol::Raster(render::qr::render(&data, size, level)?)
        };
        Ok(Self {
            data,
            size,
            level,
            symbol,
            center: false,
            finish: Finish::default(),
        })
    }
}

impl Job for QrJob {
    fn kind(&self) -> &'static str {
        "qr"
    }

    fn emit(&self, out: &mut Vec<u8>) {
        centered(self.center, out, |out| match &self.symbol {
            QrSymbol::Native => {
                out.extend(qr::qr_code(&self.data, self.size, self.level));
            }
            QrSymbol::Raster(bitmap) => {
                out.extend(graphics::image(
                    ImageMode::BitImageRaster,
                    bitmap.width,
                    bitmap.height,
                    &bitmap.data,
                ));
            }
        });
        self.finish.emit(out);
    }
}

// ============================================================================
// BARCODE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeJob {
    pub symbology: Symbology,
    pub payload: Vec<u8>,
    pub height: u8,
    pub width: u8,
    pub center: bool,
    pub finish: Finish,
}

impl BarcodeJob {
    pub const DEFAULT_HEIGHT: i64 = 64;
    pub const DEFAULT_WIDTH: i64 = 2;

    pub fn new(code: &str, barcode_type: &str, height: i64, width: i64) -> RelayResult<Self> {
        let symbology = Symbology::parse(barcode_type).ok_or_else(|| {
            RelayError::InvalidCommand(format!("unsupported barcode type '{}'", barcode_type))
        })?;
        let height = in_range("height", height, 1, 255)?;
        let width = in_range("width", width, 2, 6)?;
        let payload = symbology.validate(code)?;
        Ok(Self {
            symbology,
            payload,
            height,
            width,
            center: false,
            finish: Finish::default(),
        })
    }
}

impl Job for BarcodeJob {
    fn kind(&self) -> &'static str {
        "barcode"
    }

    fn emit(&self, out: &mut Vec<u8>) {
        centered(self.center, out, |out| {
            out.extend(barcode1d::barcode(
                self.symbology,
                self.height,
                self.width,
                &self.payload,
            ));
        });
        self.finish.emit(out);
    }
}
