use glam::DVec2;

use crate::{
    engine::{
        RayCaster,
        caster::{CastState, ColumnCaster, ColumnState, Pass, WallHit, perpendicular_distance},
        planes::wall_base,
        types::{FrameStats, View},
    },
    renderer::{Canvas, Slice},
    world::{MapQuery, Side, Texture},
};

/// A projected wall slice for one column.
#[derive(Clone, Copy, Debug)]
pub struct WallSlice<'t> {
    pub texture: &'t Texture,
    pub line_height: f64,
    /// Fractional hit position along the wall face, before any texture offset.
    pub wall_x: f64,
    pub tex_x: usize,
    pub y_top: i32,
    pub y_bottom: i32,
}

impl<'t> WallSlice<'t> {
    /// Project `hit` at perpendicular distance `dist`.
    ///
    /// `None` if the slice is at most one pixel tall, or if the texture
    /// offset slid the sampled column off the texture.
    pub fn project(
        view: &View,
        col: &ColumnState,
        hit: &WallHit<'t>,
        dist: f64,
        texture_offset: f64,
    ) -> Option<Self> {
        let line_height = if dist == 0.0 { 0.0 } else { view.height_f / dist };
        if !(line_height > 1.0) {
            return None;
        }
        let texture = hit.data.wall?;
        if texture.w == 0 || texture.h == 0 {
            return None;
        }

        let ray = col.ray_dir;
        let mut wall_x = match hit.side {
            Side::X => view.pos.y + dist * ray.y,
            Side::Y => view.pos.x + dist * ray.x,
        };
        wall_x -= wall_x.floor();

        let tex_x = texture_column(texture.w, wall_x - texture_offset, hit.side, ray)?;

        let half = view.half_h as f64;
        let pitch = view.pitch_px as f64;
        Some(Self {
            texture,
            line_height,
            wall_x,
            tex_x,
            y_top: view.row(half - line_height / 2.0 + pitch),
            y_bottom: view.row(half + line_height / 2.0 + pitch + 1.0),
        })
    }

    pub fn slice(&self, x: usize, shade: u8, depth: f64) -> Slice<'t> {
        // outermost texel rows are dropped like the outermost columns
        let (tex_y0, tex_y1) = if self.texture.h > 2 {
            (1, self.texture.h - 1)
        } else {
            (0, self.texture.h)
        };
        Slice {
            texture: self.texture,
            tex_x: self.tex_x,
            tex_y0,
            tex_y1,
            x: x as i32,
            y_top: self.y_top,
            y_bottom: self.y_bottom,
            shade,
            depth,
        }
    }
}

/// Texture column for fractional wall position `u`.
///
/// Mirrored so textures read the same way from both sides of a block, and
/// the first/last columns are pulled one texel inward.
fn texture_column(w: usize, u: f64, side: Side, ray: DVec2) -> Option<usize> {
    let w = w as i64;
    let mut tex_x = (w as f64 * u).floor() as i64;
    let mirrored = match side {
        Side::X => ray.x > 0.0,
        Side::Y => ray.y < 0.0,
    };
    if mirrored {
        tex_x = w - tex_x - 1;
    }
    if !(0..w).contains(&tex_x) {
        return None;
    }
    if w > 2 {
        if tex_x == 0 {
            tex_x = 1;
        } else if tex_x == w - 1 {
            tex_x = w - 2;
        }
    }
    Some(tex_x as usize)
}

/*──────────────────────────── passes ────────────────────────────────*/

impl RayCaster {
    /// Pass 1: nearest opaque wall per column, its distance, and the
    /// floor/ceiling around it.
    pub(super) fn solid_pass<'t, C, M>(
        &mut self,
        view: &View,
        map: &M,
        canvas: &mut C,
        stats: &mut FrameStats,
    ) where
        C: Canvas + ?Sized,
        M: MapQuery<'t> + ?Sized,
    {
        for x in 0..view.width {
            let col = self.columns[x];
            let mut caster = ColumnCaster::new(view.pos, &col, self.config.max_ray_steps);

            let hit = loop {
                match caster.advance(map, Pass::Solid) {
                    CastState::HitAccepted(hit) => break Some(hit),
                    CastState::OutOfBounds => break None,
                    CastState::Stepping | CastState::HitRejected => {}
                }
            };
            let Some(hit) = hit else {
                continue;
            };

            let dist = perpendicular_distance(view.pos, col.ray_dir, hit.cell, hit.side, 0.0);
            self.columns[x].wall_distance = dist;

            let Some(wall) = WallSlice::project(view, &col, &hit, dist, 0.0) else {
                continue;
            };
            canvas.draw_slice(&wall.slice(
                x,
                view.shade_for(wall.line_height),
                self.config.wall_depth(dist),
            ));
            stats.wall_slices += 1;

            let base = wall_base(&hit, col.ray_dir, wall.wall_x);
            self.layer
                .project_column(view, map, x, base, dist, wall.y_bottom, self.config.fog_distance);
        }
    }

    /// Pass 2: every wall sprite along each ray that is not behind the
    /// column's solid wall.
    pub(super) fn wall_sprite_pass<'t, C, M>(
        &mut self,
        view: &View,
        map: &M,
        canvas: &mut C,
        stats: &mut FrameStats,
    ) where
        C: Canvas + ?Sized,
        M: MapQuery<'t> + ?Sized,
    {
        for x in 0..view.width {
            let col = self.columns[x];
            let mut caster = ColumnCaster::new(view.pos, &col, self.config.max_ray_steps);

            loop {
                let hit = match caster.advance(map, Pass::WallSprite) {
                    CastState::OutOfBounds => break,
                    CastState::Stepping | CastState::HitRejected => continue,
                    CastState::HitAccepted(hit) => hit,
                };

                let dist = perpendicular_distance(
                    view.pos,
                    col.ray_dir,
                    hit.cell,
                    hit.side,
                    hit.data.inset_amount,
                );
                if !(dist <= col.wall_distance) {
                    continue;
                }
                let Some(wall) = WallSlice::project(view, &col, &hit, dist, hit.data.texture_offset)
                else {
                    continue;
                };
                canvas.draw_slice(&wall.slice(
                    x,
                    view.shade_for(wall.line_height),
                    self.config.wall_depth(dist),
                ));
                stats.wall_sprite_slices += 1;
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
