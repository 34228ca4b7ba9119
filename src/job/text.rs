//! Styled text.
//!
//! Character size is always stated with one `GS !`. The other attributes are
//! sent only when they differ from the power-on defaults, and only those
//! (plus a non-normal size) are switched back off after the text.

use super::{Finish, Job};
use crate::error::{RelayError, RelayResult};
use crate::protocol::commands::LF;
use crate::protocol::cp437;
use crate::protocol::text::{self, Alignment, CharSize, Underline};

#[derive(Debug, Clone, PartialEq)]
pub struct TextJob {
    pub text: String,
    pub bold: bool,
    pub underline: Underline,
    pub size: CharSize,
    pub align: Alignment,
    pub invert: bool,
    pub finish: Finish,
}

impl TextJob {
    /// Plain left-aligned text with no trailing feed or cut.
    pub fn new(text: impl Into<String>) -> RelayResult<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(RelayError::InvalidCommand("text must not be empty".to_string()));
        }
        Ok(Self {
            text,
            bold: false,
            underline: Underline::None,
            size: CharSize::NORMAL,
            align: Alignment::Left,
            invert: false,
            finish: Finish::default(),
        })
    }
}

impl Job for TextJob {
    fn kind(&self) -> &'static str {
        "text"
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend(text::code_page(text::CODE_PAGE_PC437));

        let scaled = self.size != CharSize::NORMAL;
        if self.align != Alignment::Left {
            out.extend(text::align(self.align));
        }
        if self.bold {
            out.extend(text::bold(true));
        }
        if self.underline != Underline::None {
            out.extend(text::underline(self.underline));
        }
        out.extend(text::char_size(self.size));
        if self.invert {
            out.extend(text::invert(true));
        }

        out.extend(cp437::encode(&self.text));
        if !self.text.ends_with('\n') {
            out.push(LF);
        }

        if self.invert {
            out.extend(text::invert(false));
        }
        if scaled {
            out.extend(text::char_size(CharSize::NORMAL));
        }
        if self.underline != Underline::None {
            out.extend(text::underline(Underline::None));
        }
        if self.bold {
            out.extend(text::bold(false));
        }
        if self.align != Alignment::Left {
            out.extend(text::align(Alignment::Left));
        }

        self.finish.emit(out);
    }
}
