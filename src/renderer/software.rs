//! ---------------------------------------------------------------------------
//! CPU canvas
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Keeps one depth key per pixel so slices, billboards and the
//!   floor/ceiling layer composite in depth order regardless of the order
//!   they arrive in. Equal keys: the later draw wins.
//! * Texels with zero alpha are skipped (see-through wall sprites).
//! ---------------------------------------------------------------------------

use crate::{
    renderer::{Canvas, Rgba, Slice, shade_rgb},
    world::Texture,
};

/// Background behind everything the engine draws.
const CLEAR_COLOUR: Rgba = 0xFF_000000;

#[derive(Default)]
pub struct SoftwareCanvas {
    scratch: Vec<Rgba>,
    depth: Vec<f64>,
    width: usize,
    height: usize,
}

impl SoftwareCanvas {
    pub fn new(w: usize, h: usize) -> Self {
        let mut canvas = Self::default();
        canvas.begin_frame(w, h);
        canvas
    }

    /// (Re)allocate for the requested resolution and clear it.
    pub fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            log::debug!("software canvas resized to {w}x{h}");
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
            self.depth.resize(w * h, f64::NEG_INFINITY);
        }
        self.scratch.fill(CLEAR_COLOUR);
        self.depth.fill(f64::NEG_INFINITY);
    }

    /// Finish the frame and **loan** the finished buffer to `submit`.
    pub fn end_frame<F, R>(&self, submit: F) -> R
    where
        F: FnOnce(&[Rgba], usize, usize) -> R,
    {
        submit(&self.scratch, self.width, self.height)
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.scratch[y * self.width + x]
    }

    #[inline]
    fn plot(&mut self, idx: usize, px: Rgba, depth: f64) {
        if Texture::opaque(px) && depth >= self.depth[idx] {
            self.scratch[idx] = px;
            self.depth[idx] = depth;
        }
    }
}

impl Canvas for SoftwareCanvas {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn draw_slice(&mut self, s: &Slice<'_>) {
        if s.x < 0 || s.x as usize >= self.width || s.y_bottom <= s.y_top {
            return;
        }
        let tex = s.texture;
        let rows = s.tex_y1.min(tex.h).saturating_sub(s.tex_y0);
        if rows == 0 || s.tex_x >= tex.w {
            return;
        }

        /* clip to integer pixel rows; spans may exceed i32 */
        let span = (i64::from(s.y_bottom) - i64::from(s.y_top)) as f64;
        let y0 = s.y_top.max(0);
        let y1 = s.y_bottom.min(self.height as i32);
        let step_v = rows as f64 / span;

        let col = s.x as usize;
        for y in y0..y1 {
            let dy = (i64::from(y) - i64::from(s.y_top)) as f64;
            let v = s.tex_y0 + ((dy * step_v) as usize).min(rows - 1);
            let px = shade_rgb(tex.pixel(s.tex_x, v), s.shade);
            self.plot(y as usize * self.width + col, px, s.depth);
        }
    }

    fn draw_layer(&mut self, pixels: &[Rgba], depth: f64) {
        debug_assert_eq!(pixels.len(), self.scratch.len());
        for (idx, &px) in pixels.iter().enumerate().take(self.scratch.len()) {
            self.plot(idx, px, depth);
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: Rgba = 0xFF_0000FF;
    const RED: Rgba = 0xFF_FF0000;

    fn slice(tex: &Texture, x: i32, depth: f64) -> Slice<'_> {
        Slice {
            texture: tex,
            tex_x: 0,
            tex_y0: 0,
            tex_y1: tex.h,
            x,
            y_top: 1,
            y_bottom: 5,
            shade: 255,
            depth,
        }
    }

    #[test]
    fn software_renders_slice() {
        let tex = Texture::solid("BLUE", 4, 4, BLUE);
        let mut sw = SoftwareCanvas::new(8, 8);
        sw.draw_slice(&slice(&tex, 2, 0.0));

        assert_eq!(sw.pixel(2, 0), CLEAR_COLOUR);
        assert!((1..5).all(|y| sw.pixel(2, y) == BLUE));
        assert_eq!(sw.pixel(2, 5), CLEAR_COLOUR);
        assert_eq!(sw.pixel(3, 2), CLEAR_COLOUR);
    }

    #[test]
    fn higher_depth_key_wins_regardless_of_order() {
        let blue = Texture::solid("BLUE", 1, 4, BLUE);
        let red = Texture::solid("RED", 1, 4, RED);
        let mut sw = SoftwareCanvas::new(4, 8);

        sw.draw_slice(&slice(&red, 1, -1.0));
        sw.draw_slice(&slice(&blue, 1, -5.0));
        assert_eq!(sw.pixel(1, 2), RED);

        // equal keys: later draw wins
        sw.draw_slice(&slice(&blue, 1, -1.0));
        assert_eq!(sw.pixel(1, 2), BLUE);
    }

    #[test]
    fn transparent_texels_are_skipped() {
        let glass = Texture::solid("GLASS", 1, 4, 0x00_FFFFFF);
        let red = Texture::solid("RED", 1, 4, RED);
        let mut sw = SoftwareCanvas::new(4, 8);
        sw.draw_slice(&slice(&red, 0, -10.0));
        sw.draw_slice(&slice(&glass, 0, 0.0));
        assert_eq!(sw.pixel(0, 3), RED);
    }

    #[test]
    fn offscreen_rows_are_clipped() {
        let tex = Texture::checker("C", 2, 2, BLUE, RED);
        let mut sw = SoftwareCanvas::new(2, 4);
        sw.draw_slice(&Slice {
            y_top: -4,
            y_bottom: 12,
            ..slice(&tex, 1, 0.0)
        });
        sw.draw_slice(&slice(&tex, -1, 0.0));
        sw.draw_slice(&slice(&tex, 2, 0.0));
        // 16-row span over 2 texels: rows -4..4 sample texel row 0
        assert!((0..4).all(|y| sw.pixel(1, y) == BLUE));
        assert!((0..4).all(|y| sw.pixel(0, y) == CLEAR_COLOUR));
    }

    #[test]
    fn full_range_slice_does_not_overflow() {
        let tex = Texture::checker("C", 2, 2, BLUE, RED);
        let mut sw = SoftwareCanvas::new(2, 4);
        sw.draw_slice(&Slice {
            y_top: i32::MIN,
            y_bottom: i32::MAX,
            ..slice(&tex, 0, 0.0)
        });
        // the visible rows sit in the middle of the span: texel row 1
        assert!((0..4).all(|y| sw.pixel(0, y) == RED));
    }

    #[test]
    fn layer_respects_depth_and_alpha() {
        let wall = Texture::solid("W", 1, 4, RED);
        let mut sw = SoftwareCanvas::new(2, 8);
        sw.draw_slice(&slice(&wall, 0, -100.0));

        let mut layer = vec![BLUE; 16];
        layer[1] = 0; // (1, 0) transparent
        sw.draw_layer(&layer, -150.0);

        assert_eq!(sw.pixel(0, 2), RED); // wall covers layer
        assert_eq!(sw.pixel(0, 0), BLUE);
        assert_eq!(sw.pixel(1, 0), CLEAR_COLOUR);
    }

    #[test]
    fn begin_frame_clears_previous_frame() {
        let tex = Texture::solid("BLUE", 1, 1, BLUE);
        let mut sw = SoftwareCanvas::new(2, 8);
        sw.draw_slice(&slice(&tex, 0, 0.0));
        sw.begin_frame(2, 8);
        let all_clear = sw.end_frame(|fb, w, h| {
            assert_eq!((w, h), (2, 8));
            fb.iter().all(|&px| px == CLEAR_COLOUR)
        });
        assert!(all_clear);
    }
}
