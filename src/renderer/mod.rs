//! Drawing surface abstraction.
//!
//! *The engine never touches a pixel buffer directly.* It emits textured
//! one-pixel-wide [`Slice`]s plus one full-screen floor/ceiling layer per frame
//! and hands them to a type that implements [`Canvas`].
//!
//! Every draw carries a **depth key**: larger keys end up on top, and for
//! equal keys the later draw wins. The engine relies on this instead of
//! sorting walls, wall sprites and billboards against each other.

use crate::world::Texture;

/// Pixel format of the frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// A texture column stretched over a screen column.
#[derive(Clone, Copy, Debug)]
pub struct Slice<'t> {
    pub texture: &'t Texture,
    /// Texture column to sample.
    pub tex_x: usize,
    /// Texture rows `tex_y0 .. tex_y1` are mapped onto the screen span.
    pub tex_y0: usize,
    pub tex_y1: usize,
    /// Screen column.
    pub x: i32,
    /// Screen rows `y_top .. y_bottom` (unclipped, may leave the screen).
    pub y_top: i32,
    pub y_bottom: i32,
    /// 0 = black, 255 = full brightness.
    pub shade: u8,
    pub depth: f64,
}

/// A surface the engine composites one frame into.
pub trait Canvas {
    /// Size in pixels as `(width, height)`.
    fn size(&self) -> (usize, usize);

    /// Rasterise one vertical texture slice.
    fn draw_slice(&mut self, slice: &Slice<'_>);

    /// Composite a full-screen `width × height` layer; transparent pixels
    /// leave the surface untouched.
    fn draw_layer(&mut self, pixels: &[Rgba], depth: f64);
}

/// Multiply the RGB channels of `px` by `shade / 255`, keeping alpha.
#[inline]
pub fn shade_rgb(px: Rgba, shade: u8) -> Rgba {
    if shade == u8::MAX {
        return px;
    }
    let s = shade as u32;
    let r = ((px >> 16) & 0xFF) * s / 255;
    let g = ((px >> 8) & 0xFF) * s / 255;
    let b = (px & 0xFF) * s / 255;
    (px & 0xFF00_0000) | (r << 16) | (g << 8) | b
}

/// Multiply the RGB channels of `px` by `factor` in `[0, 1]`, keeping alpha.
#[inline]
pub fn darken(px: Rgba, factor: f64) -> Rgba {
    let f = factor.clamp(0.0, 1.0);
    let scale = |c: u32| ((c & 0xFF) as f64 * f) as u32;
    (px & 0xFF00_0000) | (scale(px >> 16) << 16) | (scale(px >> 8) << 8) | scale(px)
}

pub mod software;

pub use software::SoftwareCanvas;
