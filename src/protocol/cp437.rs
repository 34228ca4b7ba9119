//! # Code Page 437 Text Encoding
//!
//! ESC/POS printers interpret bytes 0x80-0xFF through the selected character
//! code table. Jobs select PC437 (`ESC t 0`) and text is encoded here to
//! match. ASCII passes through unchanged; characters outside CP437 become `?`.

use tracing::debug;

/// Upper half of the code page, one row per high nibble (0x8_ to 0xF_).
const UPPER_HALF: [&str; 8] = [
    "ÇüéâäàåçêëèïîìÄÅ",
    "ÉæÆôöòûùÿÖÜ¢£¥₧ƒ",
    "áíóúñÑªº¿⌐¬½¼¡«»",
    "░▒▓│┤╡╢╖╕╣║╗╝╜╛┐",
    "└┴┬├─┼╞╟╚╔╩╦╠═╬╧",
    "╨╤╥╙╘╒╓╫╪┘┌█▄▌▐▀",
    "αßΓπΣσµτΦΘΩδ∞φε∩",
    "≡±≥≤⌠⌡÷≈°∙·√ⁿ²■\u{00A0}",
];

/// Encode a Unicode string as CP437 bytes.
///
/// ```
/// use escpos_relay::protocol::cp437;
///
/// assert_eq!(cp437::encode("Caf\u{e9} 20\u{b0}"), vec![b'C', b'a', b'f', 0x82, b' ', b'2', b'0', 0xF8]);
/// ```
pub fn encode(s: &str) -> Vec<u8> {
    let mut unmapped = 0usize;
    let out: Vec<u8> = s
        .chars()
        .map(|ch| {
            lookup(ch).unwrap_or_else(|| {
                unmapped += 1;
                b'?'
            })
        })
        .collect();
    if unmapped > 0 {
        debug!(unmapped, "replaced characters without a CP437 mapping");
    }
    out
}

fn lookup(ch: char) -> Option<u8> {
    if ch.is_ascii() {
        return Some(ch as u8);
    }
    // German sharp s prints with the Greek beta glyph
    let ch = if ch == 'β' { 'ß' } else { ch };
    UPPER_HALF.iter().enumerate().find_map(|(row, chars)| {
        chars
            .chars()
            .position(|c| c == ch)
            .map(|col| 0x80 + (row as u8) * 16 + col as u8)
    })
}
