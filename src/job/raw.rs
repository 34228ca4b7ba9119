//! Pass-through ESC/POS bytes supplied by the client.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::Job;
use crate::error::{RelayError, RelayResult};

/// Why a raw payload could not be turned into bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RawError {
    /// Missing, ambiguous or empty input
    #[error("Invalid raw payload: {0}")]
    Invalid(String),
    /// Input present but not valid base64/hex
    #[error("Cannot decode raw payload: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawJob {
    pub data: Vec<u8>,
}

impl RawJob {
    /// Decode exactly one of `base64` or `hex`. Whitespace inside hex input
    /// is ignored.
    ///
    /// ```
    /// use escpos_relay::job::{Job, RawJob};
    ///
    /// let a = RawJob::decode(Some("G0Bw"), None).unwrap();
    /// let b = RawJob::decode(None, Some("1B 40 70")).unwrap();
    /// assert_eq!(a.build(), vec![0x1B, 0x40, 0x70]);
    /// assert_eq!(a, b);
    /// ```
    pub fn decode(base64: Option<&str>, hex: Option<&str>) -> Result<Self, RawError> {
        let base64 = base64.filter(|s| !s.trim().is_empty());
        let hex = hex.filter(|s| !s.trim().is_empty());

        let data = match (base64, hex) {
            (Some(_), Some(_)) => {
                return Err(RawError::Invalid(
                    "provide either base64 or hex, not both".to_string(),
                ));
            }
            (None, None) => {
                return Err(RawError::Invalid(
                    "one of base64 or hex is required".to_string(),
                ));
            }
            // An unescaped '+' in a query string arrives as a space
            (Some(b64), None) => STANDARD
                .decode(b64.replace(' ', "+").trim())
                .map_err(|e| RawError::Decode(format!("invalid base64: {}", e)))?,
            (None, Some(hex_str)) => {
                let compact: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();
                hex::decode(compact).map_err(|e| RawError::Decode(format!("invalid hex: {}", e)))?
            }
        };

        Self::new(data).map_err(|e| RawError::Invalid(e.to_string()))
    }

    pub fn new(data: Vec<u8>) -> RelayResult<Self> {
        if data.is_empty() {
            return Err(RelayError::InvalidCommand("raw payload is empty".to_string()));
        }
        Ok(Self { data })
    }
}

impl Job for RawJob {
    fn kind(&self) -> &'static str {
        "raw"
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.data);
    }

    /// Raw payloads go out untouched, without `ESC @`.
    fn build(&self) -> Vec<u8> {
        self.data.clone()
    }
}
