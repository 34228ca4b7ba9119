//! # Print Jobs
//!
//! One builder per kind of request. A job holds already-validated
//! parameters and turns them into the complete byte buffer for a single
//! send; building never fails and never does I/O.
//!
//! ```
//! use escpos_relay::job::Job;
//! use escpos_relay::job::control::FeedJob;
//!
//! let job = FeedJob::new(3).unwrap();
//! assert_eq!(job.build(), vec![0x1B, 0x40, 0x1B, 0x64, 3]);
//! ```

pub mod code;
pub mod control;
pub mod image;
pub mod raw;
pub mod text;

use crate::error::{RelayError, RelayResult};
use crate::protocol::commands::{self, CutMode};

pub use code::{BarcodeJob, QrJob};
pub use control::{BeepJob, CutJob, DrawerJob, FeedJob};
pub use image::ImageJob;
pub use raw::RawJob;
pub use text::TextJob;

pub trait Job {
    /// Short name used in logs.
    fn kind(&self) -> &'static str;

    /// Append the job body (everything after `ESC @`).
    fn emit(&self, out: &mut Vec<u8>);

    /// The full buffer: initialize, then the body.
    fn build(&self) -> Vec<u8> {
        let mut out = commands::init();
        self.emit(&mut out);
        out
    }
}

/// Trailing feed and cut shared by the print jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Finish {
    pub lines_after: u8,
    pub cut: bool,
}

impl Finish {
    pub fn new(lines_after: i64, cut: bool) -> RelayResult<Self> {
        Ok(Self {
            lines_after: in_range("lines_after", lines_after, 0, 255)?,
            cut,
        })
    }

    pub fn emit(&self, out: &mut Vec<u8>) {
        if self.lines_after > 0 {
            out.extend(commands::feed_lines(self.lines_after));
        }
        if self.cut {
            out.extend(commands::cut(CutMode::Full));
        }
    }
}

/// Check `value` against an inclusive range and narrow it to a byte.
pub fn in_range(name: &str, value: i64, min: u8, max: u8) -> RelayResult<u8> {
    if (min as i64..=max as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(RelayError::InvalidCommand(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )))
    }
}
