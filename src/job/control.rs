//! Paper and peripheral control: cut, feed, buzzer, cash drawer.
//!
//! Values outside the documented ranges are rejected, never clamped.

use super::{in_range, Job};
use crate::error::{RelayError, RelayResult};
use crate::protocol::commands::{self, CutMode, DrawerPin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutJob {
    pub lines_before: u8,
    pub mode: CutMode,
}

impl CutJob {
    pub fn new(lines_before: i64, mode: CutMode) -> RelayResult<Self> {
        Ok(Self {
            lines_before: in_range("lines_before", lines_before, 0, 255)?,
            mode,
        })
    }
}

impl Job for CutJob {
    fn kind(&self) -> &'static str {
        "cut"
    }

    fn emit(&self, out: &mut Vec<u8>) {
        if self.lines_before > 0 {
            out.extend(commands::feed_lines(self.lines_before));
        }
        out.extend(commands::cut(self.mode));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedJob {
    pub lines: u8,
}

impl FeedJob {
    pub fn new(lines: i64) -> RelayResult<Self> {
        Ok(Self {
            lines: in_range("lines", lines, 0, 255)?,
        })
    }
}

impl Job for FeedJob {
    fn kind(&self) -> &'static str {
        "feed"
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend(commands::feed_lines(self.lines));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeepJob {
    pub count: u8,
    pub duration: u8,
}

impl BeepJob {
    pub fn new(count: i64, duration: i64) -> RelayResult<Self> {
        Ok(Self {
            count: in_range("count", count, 1, 9)?,
            duration: in_range("duration", duration, 1, 9)?,
        })
    }
}

impl Job for BeepJob {
    fn kind(&self) -> &'static str {
        "beep"
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend(commands::beep(self.count, self.duration));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawerJob {
    pub pin: DrawerPin,
    pub t1: u8,
    pub t2: u8,
}

impl DrawerJob {
    pub fn new(pin: i64, t1: i64, t2: i64) -> RelayResult<Self> {
        let pin = match pin {
            0 => DrawerPin::Pin2,
            1 => DrawerPin::Pin5,
            other => {
                return Err(RelayError::InvalidCommand(format!(
                    "pin must be 0 or 1, got {}",
                    other
                )));
            }
        };
        Ok(Self {
            pin,
            t1: in_range("t1", t1, 0, 255)?,
            t2: in_range("t2", t2, 0, 255)?,
        })
    }
}

impl Job for DrawerJob {
    fn kind(&self) -> &'static str {
        "drawer"
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend(commands::drawer_kick(self.pin, self.t1, self.t2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cut() {
        let job = CutJob::new(3, CutMode::Partial).unwrap();
        assert_eq!(job.build(), vec![0x1B, 0x40, 0x1B, 0x64, 3, 0x1D, 0x56, 1]);

        let job = CutJob::new(0, CutMode::Full).unwrap();
        assert_eq!(job.build(), vec![0x1B, 0x40, 0x1D, 0x56, 0]);
    }

    #[test]
    fn test_cut_is_deterministic() {
        let a = CutJob::new(2, CutMode::Full).unwrap().build();
        let b = CutJob::new(2, CutMode::Full).unwrap().build();
        assert_eq!(a, b);
    }

    #[test]
    fn test_feed() {
        assert_eq!(FeedJob::new(7).unwrap().build(), vec![0x1B, 0x40, 0x1B, 0x64, 7]);
        assert!(FeedJob::new(256).is_err());
    }

    #[test]
    fn test_beep() {
        assert_eq!(BeepJob::new(3, 2).unwrap().build(), vec![0x1B, 0x40, 0x1B, 0x42, 3, 2]);
        for (count, duration) in [(0, 1), (10, 1), (1, 0), (1, 10)] {
            assert!(BeepJob::new(count, duration).is_err());
        }
    }

    #[test]
    fn test_drawer() {
        assert_eq!(
            DrawerJob::new(1, 50, 250).unwrap().build(),
            vec![0x1B, 0x40, 0x1B, 0x70, 1, 50, 250]
        );
        assert!(DrawerJob::new(2, 50, 50).is_err());
        assert!(DrawerJob::new(0, 256, 50).is_err());
        assert!(DrawerJob::new(0, 50, -1).is_err());
    }
}
