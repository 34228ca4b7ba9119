//! # ESC/POS Barcode Commands
//!
//! ## Supported Barcode Types
//!
//! | Type | Command | Payload |
//! |------|---------|---------|
//! | UPC-A, UPC-E, EAN13, EAN8 | GS k m n | Digits, optional check digit |
//! | CODE39, CODE93, CODE128, ITF, CODABAR | GS k m n | Symbology character set |
//! | QR Code | GS ( k | Any bytes, up to 7089 |
//!
//! ## 1D Barcode Usage
//!
//! ```
//! use escpos_relay::protocol::barcode::barcode1d::{self, Symbology};
//!
//! let payload = Symbology::Ean13.validate("4006381333931").unwrap();
//! let cmd = barcode1d::barcode(Symbology::Ean13, 64, 2, &payload);
//! assert_eq!(&cmd[cmd.len() - 15..cmd.len() - 13], &[0x43, 13]);
//! ```
//!
//! ## QR Code Usage
//!
//! ```
//! use escpos_relay::protocol::barcode::qr::{self, QrErrorLevel};
//!
//! let cmd = qr::qr_code(b"https://example.com", 4, QrErrorLevel::L);
//! assert_eq!(&cmd[..3], &[0x1D, 0x28, 0x6B]);
//! ```

use super::commands::GS;

// ============================================================================
// 1D BARCODE COMMANDS (GS k)
// ============================================================================

/// 1D Barcode command builders
///
/// Payload validation happens in [`Symbology::validate`]; the command
/// builders assume a validated payload.
pub mod barcode1d {
    use super::GS;
    use crate::error::{RelayError, RelayResult};

    /// Barcode system codes for `GS k` function B (m = 65-73)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(u8)]
    pub enum Symbology {
        /// UPC-A (11 digits + check digit)
        UpcA = 65,
        /// UPC-E (6-8 or 11-12 digits)
        UpcE = 66,
        /// EAN-13 / JAN-13 (12 digits + check digit)
        Ean13 = 67,
        /// EAN-8 / JAN-8 (7 digits + check digit)
        Ean8 = 68,
        /// Code39 (A-Z, 0-9, space, -.$/+%)
        Code39 = 69,
        /// ITF (Interleaved 2 of 5, digit pairs)
        Itf = 70,
        /// NW-7 / Codabar
        Codabar = 71,
        /// Code93 (full ASCII)
        Code93 = 72,
        /// Code128 (full ASCII, code set prefix)
        Code128 = 73,
    }

    impl Symbology {
        /// Parse a symbology name. Case-insensitive; `-`, `_` and spaces are
        /// ignored so `EAN13`, `ean-13` and `Ean_13` are the same.
        pub fn parse(s: &str) -> Option<Self> {
            let key: String = s
                .chars()
                .filter(|c| !matches!(c, '-' | '_' | ' '))
                .collect::<String>()
                .to_ascii_uppercase();
            match key.as_str() {
                "UPCA" => Some(Self::UpcA),
                "UPCE" => Some(Self::UpcE),
                "EAN13" | "JAN13" => Some(Self::Ean13),
                "EAN8" | "JAN8" => Some(Self::Ean8),
                "CODE39" => Some(Self::Code39),
                "ITF" | "I25" => Some(Self::Itf),
                "NW7" | "CODABAR" => Some(Self::Codabar),
                "CODE93" => Some(Self::Code93),
                "CODE128" => Some(Self::Code128),
                _ => None,
            }
        }

        pub fn as_str(&self) -> &'static str {
            match self {
                Self::UpcA => "UPC-A",
                Self::UpcE => "UPC-E",
                Self::Ean13 => "EAN13",
                Self::Ean8 => "EAN8",
                Self::Code39 => "CODE39",
                Self::Itf => "ITF",
                Self::Codabar => "CODABAR",
                Self::Code93 => "CODE93",
                Self::Code128 => "CODE128",
            }
        }

        /// Check `code` against the symbology's character set and length
        /// rules and return the bytes to send.
        ///
        /// EAN/UPC check digits are verified when supplied. Code128 payloads
        /// without a `{A`/`{B`/`{C` code-set prefix get `{B`.
        pub fn validate(&self, code: &str) -> RelayResult<Vec<u8>> {
            let invalid = |why: String| {
                RelayError::InvalidCommand(format!("invalid {} barcode: {}", self.as_str(), why))
            };

            if code.is_empty() {
                return Err(invalid("code is empty".into()));
            }
            if !code.is_ascii() {
                return Err(invalid("code must be ASCII".into()));
            }

            let digits = code.bytes().all(|b| b.is_ascii_digit());
            let len = code.len();

            let payload = match self {
                Self::UpcA => {
                    require_digits(digits, &invalid)?;
                    check_digits(code, &[11, 12], 12, &invalid)?;
                    code.as_bytes().to_vec()
                }
                Self::UpcE => {
                    require_digits(digits, &invalid)?;
                    if ![6, 7, 8, 11, 12].contains(&len) {
                        return Err(invalid(format!(
                            "expected 6, 7, 8, 11 or 12 digits, got {}",
                            len
                        )));
                    }
                    code.as_bytes().to_vec()
                }
                Self::Ean13 => {
                    require_digits(digits, &invalid)?;
                    check_digits(code, &[12, 13], 13, &invalid)?;
                    code.as_bytes().to_vec()
                }
                Self::Ean8 => {
                    require_digits(digits, &invalid)?;
                    check_digits(code, &[7, 8], 8, &invalid)?;
                    code.as_bytes().to_vec()
                }
                Self::Code39 => {
                    let body = code
                        .strip_prefix('*')
                        .and_then(|c| c.strip_suffix('*'))
                        .unwrap_or(code);
                    if let Some(bad) = body.chars().find(|c| !is_code39_char(*c)) {
                        return Err(invalid(format!("character {:?} not allowed", bad)));
                    }
                    code.as_bytes().to_vec()
                }
                Self::Itf => {
                    require_digits(digits, &invalid)?;
                    if len < 2 || len % 2 != 0 {
                        return Err(invalid(format!(
                            "expected an even number of digits, got {}",
                            len
                        )));
                    }
                    code.as_bytes().to_vec()
                }
                Self::Codabar => {
                    let bytes = code.to_ascii_uppercase().into_bytes();
                    let guard = |b: u8| (b'A'..=b'D').contains(&b);
                    if bytes.len() < 2 || !guard(bytes[0]) || !guard(bytes[bytes.len() - 1]) {
                        return Err(invalid("must start and end with A, B, C or D".into()));
                    }
                    if let Some(bad) = bytes[1..bytes.len() - 1]
                        .iter()
                        .find(|b| !(b.is_ascii_digit() || b"-$:/.+".contains(b)))
                    {
                        return Err(invalid(format!("character {:?} not allowed", *bad as char)));
                    }
                    bytes
                }
                Self::Code93 => {
                    require_printable(code, &invalid)?;
                    code.as_bytes().to_vec()
                }
                Self::Code128 => {
                    require_printable(code, &invalid)?;
                    let has_set = code.len() >= 2
                        && code.starts_with('{')
                        && matches!(code.as_bytes()[1], b'A' | b'B' | b'C');
                    if has_set {
                        code.as_bytes().to_vec()
                    } else {
                        let mut prefixed = b"{B".to_vec();
                        prefixed.extend_from_slice(code.as_bytes());
                        prefixed
                    }
                }
            };

            if payload.len() > 255 {
                return Err(invalid(format!(
                    "payload is {} bytes, maximum is 255",
                    payload.len()
                )));
            }
            Ok(payload)
        }
    }

    fn require_digits(
        digits: bool,
        invalid: &impl Fn(String) -> RelayError,
    ) -> RelayResult<()> {
        if digits {
            Ok(())
        } else {
            Err(invalid("only digits are allowed".into()))
        }
    }

    fn require_printable(code: &str, invalid: &impl Fn(String) -> RelayError) -> RelayResult<()> {
        match code.bytes().find(|b| !(0x20..=0x7E).contains(b)) {
            Some(bad) => Err(invalid(format!("byte 0x{:02X} is not printable ASCII", bad))),
            None => Ok(()),
        }
    }

    /// Accept either the bare data digits or data + check digit; in the
    /// latter case the check digit must be correct.
    fn check_digits(
        code: &str,
        allowed: &[usize],
        with_check: usize,
        invalid: &impl Fn(String) -> RelayError,
    ) -> RelayResult<()> {
        let len = code.len();
        if !allowed.contains(&len) {
            let expected: Vec<String> = allowed.iter().map(|n| n.to_string()).collect();
            return Err(invalid(format!(
                "expected {} digits, got {}",
                expected.join(" or "),
                len
            )));
        }
        if len == with_check {
            let (data, check) = code.split_at(len - 1);
            let expected = gtin_check_digit(data);
            let given = check.as_bytes()[0] - b'0';
            if expected != given {
                return Err(invalid(format!(
                    "check digit is {}, expected {}",
                    given, expected
                )));
            }
        }
        Ok(())
    }

    /// GS1 mod-10 check digit: weights 3,1,3,1... from the rightmost data digit.
    ///
    /// ```
    /// use escpos_relay::protocol::barcode::barcode1d::gtin_check_digit;
    ///
    /// assert_eq!(gtin_check_digit("400638133393"), 1);
    /// assert_eq!(gtin_check_digit("9638507"), 4);
    /// ```
    pub fn gtin_check_digit(data: &str) -> u8 {
        let sum: u32 = data
            .bytes()
            .rev()
            .enumerate()
            .map(|(i, b)| {
                let d = (b - b'0') as u32;
                if i % 2 == 0 { d * 3 } else { d }
            })
            .sum();
        ((10 - sum % 10) % 10) as u8
    }

    fn is_code39_char(c: char) -> bool {
        c.is_ascii_digit() || c.is_ascii_uppercase() || " -.$/+%".contains(c)
    }

    /// HRI (Human Readable Interpretation) position
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum HriPosition {
        None = 0,
        Above = 1,
        #[default]
        Below = 2,
        Both = 3,
    }

    /// # Select HRI Print Position (GS H n)
    #[inline]
    pub fn hri_position(pos: HriPosition) -> Vec<u8> {
        vec![GS, b'H', pos as u8]
    }

    /// # Select HRI Font (GS f n), 0 = Font A
    #[inline]
    pub fn hri_font(font: u8) -> Vec<u8> {
        vec![GS, b'f', font]
    }

    /// # Set Barcode Height (GS h n), in dots
    #[inline]
    pub fn height(dots: u8) -> Vec<u8> {
        vec![GS, b'h', dots]
    }

    /// # Set Barcode Module Width (GS w n), 2-6
    #[inline]
    pub fn module_width(n: u8) -> Vec<u8> {
        vec![GS, b'w', n]
    }

    /// # Print Barcode (GS k m n d1...dn)
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | ASCII   | GS k m n d1...dn |
    /// | Hex     | 1D 6B m n d1...dn |
    ///
    /// Function B form: `m` in 65-73, `n` is the payload length.
    /// HRI is printed below the bars in Font A.
    pub fn barcode(symbology: Symbology, height_dots: u8, width: u8, payload: &[u8]) -> Vec<u8> {
        debug_assert!(payload.len() <= 255);

        let mut cmd = Vec::with_capacity(16 + payload.len());
        cmd.extend(hri_position(HriPosition::Below));
        cmd.extend(hri_font(0));
        cmd.extend(height(height_dots));
        cmd.extend(module_width(width));
        cmd.extend_from_slice(&[GS, b'k', symbology as u8, payload.len() as u8]);
        cmd.extend_from_slice(payload);
        cmd
    }

}

// ============================================================================
// QR CODE COMMANDS (GS ( k)
// ============================================================================

/// Native QR code commands (`GS ( k`, cn = 49)
pub mod qr {
    use super::GS;
    use crate::protocol::commands::u16_le;

    /// Largest payload a version 40 symbol holds at level L (numeric mode)
    pub const MAX_PAYLOAD: usize = 7089;

    /// QR Code error correction level
    ///
    /// | Level | Recovery |
    /// |-------|----------|
    /// | L | ~7% |
    /// | M | ~15% |
    /// | Q | ~25% |
    /// | H | ~30% |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum QrErrorLevel {
        #[default]
        L = 48,
        M = 49,
        Q = 50,
        H = 51,
    }

    impl QrErrorLevel {
        pub fn parse(s: &str) -> Option<Self> {
            match s.trim().to_ascii_uppercase().as_str() {
                "L" => Some(Self::L),
                "M" => Some(Self::M),
                "Q" => Some(Self::Q),
                "H" => Some(Self::H),
                _ => None,
            }
        }

        pub fn as_str(&self) -> &'static str {
            match self {
                Self::L => "L",
                Self::M => "M",
                Self::Q => "Q",
                Self::H => "H",
            }
        }
    }

    fn function(body: &[u8]) -> Vec<u8> {
        let [pl, ph] = u16_le(body.len() as u16);
        let mut cmd = Vec::with_capacity(5 + body.len());
        cmd.extend_from_slice(&[GS, b'(', b'k', pl, ph]);
        cmd.extend_from_slice(body);
        cmd
    }

    /// # Select Model (fn 165): Model 2
    pub fn select_model2() -> Vec<u8> {
        function(&[49, 65, 50, 0])
    }

    /// # Set Module Size (fn 167), in dots
    pub fn module_size(dots: u8) -> Vec<u8> {
        function(&[49, 67, dots])
    }

    /// # Select Error Correction Level (fn 169)
    pub fn error_correction(level: QrErrorLevel) -> Vec<u8> {
        function(&[49, 69, level as u8])
    }

    /// # Store Data in the Symbol Storage Area (fn 180)
    pub fn store(data: &[u8]) -> Vec<u8> {
        let mut body = Vec::with_capacity(3 + data.len());
        body.extend_from_slice(&[49, 80, 48]);
        body.extend_from_slice(data);
        function(&body)
    }

    /// # Print the Stored Symbol (fn 181)
    pub fn print() -> Vec<u8> {
        function(&[49, 81, 48])
    }

    /// Full sequence: model, size, error correction, store, print.
    pub fn qr_code(data: &[u8], module_dots: u8, level: QrErrorLevel) -> Vec<u8> {
        let mut cmd = Vec::with_capacity(40 + data.len());
        cmd.extend(select_model2());
        cmd.extend(module_size(module_dots));
        cmd.extend(error_correction(level));
        cmd.extend(store(data));
        cmd.extend(print());
        cmd
    }

}
