//! Dithered bitmap images.

use super::{Finish, Job};
use crate::protocol::graphics::{self, ImageMode};
use crate::protocol::text::{self, Alignment};
use crate::render::Bitmap;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageJob {
    pub bitmap: Bitmap,
    pub mode: ImageMode,
    pub center: bool,
    pub finish: Finish,
}

impl ImageJob {
    pub fn new(bitmap: Bitmap) -> Self {
        Self {
            bitmap,
            mode: ImageMode::default(),
            center: false,
            finish: Finish::default(),
        }
    }
}

impl Job for ImageJob {
    fn kind(&self) -> &'static str {
        "image"
    }

    fn emit(&self, out: &mut Vec<u8>) {
        if self.center {
            out.extend(text::align(Alignment::Center));
        }
        out.extend(graphics::image(
            self.mode,
            self.bitmap.width,
            self.bitmap.height,
            &self.bitmap.data,
        ));
        if self.center {
            out.extend(text::align(Alignment::Left));
        }
        self.finish.emit(out);
    }
}
