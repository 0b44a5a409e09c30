//! Draw-call recording surface
//!
//! Captures the ordered call stream instead of rasterizing. Used by the
//! render tests and the headless binary to observe what a frame would do.

use super::{Color, CropRect, Surface2D};
use crate::ImageId;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Color),
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    Image {
        image: ImageId,
        src: Option<CropRect>,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
    },
}

/// A `Surface2D` that records calls in order
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<DrawCall>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl Surface2D for Recorder {
    fn clear(&mut self, color: Color) {
        self.calls.push(DrawCall::Clear(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.calls.push(DrawCall::FillRect { x, y, w, h, color });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.calls.push(DrawCall::StrokeRect { x, y, w, h, color });
    }

    fn draw_image(&mut self, image: &ImageId, src: Option<CropRect>, x: f32, y: f32, w: f32, h: f32) {
        self.calls.push(DrawCall::Image {
            image: image.clone(),
            src,
            x,
            y,
            w,
            h,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        self.calls.push(DrawCall::Text {
            text: text.to_owned(),
            x,
            y,
            size,
            color,
        });
    }
}
