//! A canvas that remembers what it was asked to draw.

use crate::renderer::{Canvas, Rgba, Slice};

/// Owned copy of one [`Slice`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
    pub tex_name: String,
    pub tex_x: usize,
    pub tex_y0: usize,
    pub tex_y1: usize,
    pub x: i32,
    pub y_top: i32,
    pub y_bottom: i32,
    pub shade: u8,
    pub depth: f64,
}

pub struct RecordingCanvas {
    pub width: usize,
    pub height: usize,
    pub slices: Vec<Recorded>,
    pub layers: Vec<(Vec<Rgba>, f64)>,
}

impl RecordingCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            slices: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// Slices drawn into screen column `x`, in call order.
    pub fn slices_at(&self, x: i32) -> impl Iterator<Item = &Recorded> {
        self.slices.iter().filter(move |s| s.x == x)
    }

    /// Pixel `(x, y)` of the most recent layer.
    pub fn layer_pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        self.layers.last().map(|(px, _)| px[y * self.width + x])
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn draw_slice(&mut self, s: &Slice<'_>) {
        self.slices.push(Recorded {
            tex_name: s.texture.name.clone(),
            tex_x: s.tex_x,
            tex_y0: s.tex_y0,
            tex_y1: s.tex_y1,
            x: s.x,
            y_top: s.y_top,
            y_bottom: s.y_bottom,
            shade: s.shade,
            depth: s.depth,
        });
    }

    fn draw_layer(&mut self, pixels: &[Rgba], depth: f64) {
        self.layers.push((pixels.to_vec(), depth));
    }
}
