use glam::DVec2;

use crate::world::Camera;

/// Projected rows are kept inside `±ROW_LIMIT` so row arithmetic never
/// overflows, however close the camera stands to a wall or sprite.
pub const ROW_LIMIT: i32 = 1 << 24;

/// Camera and frame-buffer constants for one draw call.
#[derive(Clone, Copy, Debug)]
pub struct View {
    pub pos: DVec2,
    pub dir: DVec2,
    pub plane: DVec2,
    pub width: usize,
    pub height: usize,
    pub height_f: f64, // pre-derived for speed
    pub half_w: i32,   // integer halves, rounded down
    pub half_h: i32,
    /// Rows everything is shifted down by (pitch + bob).
    pub pitch_px: i32,
}

impl View {
    pub fn new(camera: &Camera, width: usize, height: usize) -> Self {
        Self {
            pos: camera.position(),
            dir: camera.coordinate_system(),
            plane: camera.plane(),
            width,
            height,
            height_f: height as f64,
            half_w: (width / 2) as i32,
            half_h: (height / 2) as i32,
            pitch_px: (height as f64 * camera.view_offset()) as i32,
        }
    }

    /// Screen row for a projected `y`, clamped to `±ROW_LIMIT`.
    #[inline]
    pub fn row(&self, y: f64) -> i32 {
        y.clamp(-f64::from(ROW_LIMIT), f64::from(ROW_LIMIT)) as i32
    }

    /// Brightness for something `px` rows tall.
    #[inline]
    pub fn shade_for(&self, px: f64) -> u8 {
        (255.0 * px / self.height_f).clamp(0.0, 255.0) as u8
    }
}

/// What one draw call produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub columns: usize,
    pub wall_slices: usize,
    pub wall_sprite_slices: usize,
    pub sprite_stripes: usize,
}
