//! Software QR rendering, for printers without `GS ( k` support.

use qrcode::{Color, EcLevel, QrCode};

use super::dither::pack_row;
use super::Bitmap;
use crate::error::{RelayError, RelayResult};
use crate::protocol::barcode::qr::QrErrorLevel;

/// Quiet zone around the symbol, in modules.
const QUIET_ZONE: usize = 4;

fn ec_level(level: QrErrorLevel) -> EcLevel {
    match level {
        QrErrorLevel::L => EcLevel::L,
        QrErrorLevel::M => EcLevel::M,
        QrErrorLevel::Q => EcLevel::Q,
        QrErrorLevel::H => EcLevel::H,
    }
}

/// Render `data` as a QR symbol with `module_dots` dots per module.
pub fn render(data: &[u8], module_dots: u8, level: QrErrorLevel) -> RelayResult<Bitmap> {
    let code = QrCode::with_error_correction_level(data, ec_level(level))
        .map_err(|e| RelayError::InvalidCommand(format!("cannot encode QR code: {}", e)))?;

    let modules = code.width();
    let colors = code.to_colors();
    let scale = module_dots.max(1) as usize;
    let side = (modules + 2 * QUIET_ZONE) * scale;

    let mut data = Vec::with_capacity(side.div_ceil(8) * side);
    for y in 0..side {
        let my = (y / scale) as isize - QUIET_ZONE as isize;
        let row: Vec<bool> = (0..side)
            .map(|x| {
                let mx = (x / scale) as isize - QUIET_ZONE as isize;
                (0..modules as isize).contains(&mx)
                    && (0..modules as isize).contains(&my)
                    && colors[my as usize * modules + mx as usize] == Color::Dark
            })
            .collect();
        data.extend(pack_row(&row));
    }

    Bitmap::new(side as u16, side as u16, data)
}
