//! Floor & ceiling projection.
//!
//! Floors are not cast: once a column knows where its solid wall meets the
//! ground, every screen row below the wall maps back to a world point on
//! the segment camera → wall base. The ceiling is the same point mirrored
//! about the horizon. Results land in a full-screen [`PlaneLayer`] that is
//! composited once, behind everything else.

use glam::{DVec2, dvec2};

use crate::{
    engine::{caster::WallHit, types::View},
    renderer::{Rgba, darken},
    world::{MapQuery, Side, TRANSPARENT, Texture},
};

/// Full-screen floor/ceiling buffer, rebuilt every frame.
#[derive(Clone, Debug, Default)]
pub struct PlaneLayer {
    pixels: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl PlaneLayer {
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.resize(width * height, TRANSPARENT);
    }

    pub fn clear(&mut self) {
        self.pixels.fill(TRANSPARENT);
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }

    #[inline]
    fn put(&mut self, x: usize, y: i32, px: Rgba) {
        if x < self.width && y >= 0 && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x] = px;
        }
    }

    /// Fill column `x` below a wall whose base is `base`, `wall_distance`
    /// away, and whose slice ends at screen row `y_bottom`.
    ///
    /// Rows whose world point has no floor (resp. ceiling) texture, including
    /// points outside the map, are written transparent.
    #[allow(clippy::too_many_arguments)]
    pub fn project_column<'t, M>(
        &mut self,
        view: &View,
        map: &M,
        x: usize,
        base: DVec2,
        wall_distance: f64,
        y_bottom: i32,
        fog_distance: f64,
    ) where
        M: MapQuery<'t> + ?Sized,
    {
        let h = view.height as i32;
        let p = view.pitch_px;
        // rows at or above the horizon have no floor point
        let start = y_bottom.saturating_sub(p + 2).max(view.half_h + 1);
        let end = h + p.abs() + 2;

        for y in start..end {
            let current = view.height_f / f64::from(2 * y - h);
            let weight = current / wall_distance;
            let point = base * weight + view.pos * (1.0 - weight);
            let darkness = (1.0 - current / fog_distance).max(0.0);

            let cell = map.query(point.x.floor() as i32, point.y.floor() as i32);
            let floor = cell
                .floor
                .map_or(TRANSPARENT, |t| sample(t, point, darkness));
            let ceiling = cell
                .ceiling
                .map_or(TRANSPARENT, |t| sample(t, point, darkness));

            self.put(x, y + p, floor);
            self.put(x, h + p - y, ceiling);
        }
    }
}

/// World-space point where the wall face meets the floor.
pub fn wall_base(hit: &WallHit<'_>, ray: DVec2, wall_x: f64) -> DVec2 {
    let cell = hit.cell.as_dvec2();
    match hit.side {
        Side::X if ray.x > 0.0 => dvec2(cell.x, cell.y + wall_x),
        Side::X => dvec2(cell.x + 1.0, cell.y + wall_x),
        Side::Y if ray.y > 0.0 => dvec2(cell.x + wall_x, cell.y),
        Side::Y => dvec2(cell.x + wall_x, cell.y + 1.0),
    }
}

/// Texel under world point `p`, one texture per cell, faded by `darkness`.
#[inline]
fn sample(tex: &Texture, p: DVec2, darkness: f64) -> Rgba {
    if tex.w == 0 || tex.h == 0 {
        return TRANSPARENT;
    }
    let (w, h) = (tex.w as i64, tex.h as i64);
    let tx = ((p.x * w as f64).floor() as i64).rem_euclid(w);
    let ty = ((p.y * h as f64).floor() as i64).rem_euclid(h);
    darken(tex.pixel(tx as usize, ty as usize), darkness)
}

/*──────────────────────────────── Tests ───────────────────────────────*/
