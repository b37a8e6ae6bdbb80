//! Billboards.
//!
//! Sprites are projected into camera space, scaled by distance, and drawn
//! one texture column per screen column. There is no sorting: each stripe
//! carries depth key `-tz`, so nearer sprites win on the canvas.

use glam::DVec2;

use crate::{
    engine::{
        RayCaster,
        types::{FrameStats, View},
    },
    renderer::{Canvas, Slice},
    world::{Sprite, Texture},
};

/// A sprite projected onto the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Billboard {
    /// Camera-space depth; always positive.
    pub tz: f64,
    pub screen_x: i32,
    pub height: f64,
    pub width: f64,
    /// Screen pixels per texel.
    pub scale: f64,
    pub y_top: i32,
    pub y_bottom: i32,
}

impl Billboard {
    /// Project a sprite at `pos` with a `tex_w × tex_h` texture.
    ///
    /// `None` when the sprite is at or behind the camera plane.
    pub fn project(view: &View, pos: DVec2, tex_w: usize, tex_h: usize, sprite_scale: f64) -> Option<Self> {
        let rel = pos - view.pos;
        let (dir, plane) = (view.dir, view.plane);
        let inv_det = 1.0 / (plane.x * dir.y - dir.x * plane.y);
        let tx = inv_det * (dir.y * rel.x - dir.x * rel.y);
        let tz = inv_det * (-plane.y * rel.x + plane.x * rel.y);
        if !(tz > 0.0) {
            return None;
        }

        let screen_x = (f64::from(view.half_w) * (1.0 + tx / tz)) as i32;
        let height = (view.width as f64 / tz).abs() * sprite_scale;
        let scale = height / tex_h as f64;
        let width = tex_w as f64 * scale;

        let half = f64::from(view.half_h);
        let pitch = f64::from(view.pitch_px);
        Some(Self {
            tz,
            screen_x,
            height,
            width,
            scale,
            y_top: view.row(half - height / 2.0 + pitch),
            y_bottom: view.row(half + height / 2.0 + pitch),
        })
    }

    /// Screen column of stripe `i`.
    #[inline]
    fn column(&self, i: usize) -> i32 {
        (self.left() + i as f64).floor() as i32
    }

    #[inline]
    fn left(&self) -> f64 {
        f64::from(self.screen_x) - self.width / 2.0
    }

    /// Stripes whose column can land in `0..screen_w`; a billboard right in
    /// front of the camera is far wider than the screen.
    fn visible_stripes(&self, screen_w: usize) -> std::ops::Range<usize> {
        let total = self.width.ceil().max(0.0);
        let first = (-self.left()).floor().clamp(0.0, total);
        let last = (screen_w as f64 - self.left()).ceil().clamp(first, total);
        first as usize..last as usize
    }
}

/// `true` if a stripe `tz` deep may draw over a wall `wall_distance` away.
///
/// Sprites standing at (or slightly inside) a wall still show.
#[inline]
pub fn visible_against(wall_distance: f64, tz: f64, tolerance: f64) -> bool {
    (wall_distance - tz).abs() < tolerance || wall_distance > tz
}

impl RayCaster {
    pub(super) fn sprite_pass<'t, C>(
        &self,
        view: &View,
        sprites: &[Sprite<'t>],
        canvas: &mut C,
        stats: &mut FrameStats,
    ) where
        C: Canvas + ?Sized,
    {
        for sprite in sprites {
            let tex: &Texture = sprite.texture;
            if tex.w == 0 || tex.h == 0 {
                continue;
            }
            let Some(bb) = Billboard::project(view, sprite.pos, tex.w, tex.h, self.config.sprite_scale)
            else {
                continue;
            };

            for i in bb.visible_stripes(view.width) {
                let x = bb.column(i);
                if x < 0 || x as usize >= view.width {
                    continue;
                }
                let wall_distance = self.columns[x as usize].wall_distance;
                if !visible_against(wall_distance, bb.tz, self.config.sprite_depth_tolerance) {
                    continue;
                }
                let tex_x = ((i as f64 / bb.scale) as usize).min(tex.w - 1);
                canvas.draw_slice(&Slice {
                    texture: tex,
                    tex_x,
                    tex_y0: 0,
                    tex_y1: tex.h,
                    x,
                    y_top: bb.y_top,
                    y_bottom: bb.y_bottom,
                    shade: view.shade_for(bb.height),
                    depth: -bb.tz,
                });
                stats.sprite_stripes += 1;
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
