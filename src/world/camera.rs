use glam::{DVec2, dvec2};

use crate::world::CollisionQuery;

/// Length of the plane vector relative to the facing vector (≈ 66° FoV).
pub const FOV_FACTOR: f64 = 0.66;

/// Pitch and bob range are kept inside half a screen.
const VIEW_LIMIT: f64 = 0.5;

/// Bob overshoot smaller than this snaps back onto the limit.
const BOB_SNAP: f64 = 0.1;

/// Vertical oscillation used to fake footsteps.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Bob {
    current: f64,
    range: f64,
    direction: f64, // +1 or -1
}

impl Default for Bob {
    fn default() -> Self {
        Self {
            current: 0.0,
            range: 0.0,
            direction: 1.0,
        }
    }
}

/// Player view-point on the grid.
///
/// * `pos` is in continuous cell units (cell `(3, 4)` spans `3.0..4.0 × 4.0..5.0`).
/// * `dir` is the facing vector, `plane` the camera plane. `plane` is always
///   re-derived from `dir`, never written on its own.
/// * `pitch` and the bob offset are fractions of the screen height.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pos: DVec2,
    dir: DVec2,
    plane: DVec2,
    rotation: f64, // degrees, [0, 360)
    pitch: f64,
    bob: Bob,
}

impl Default for Camera {
    /// Origin, looking towards −Y.
    fn default() -> Self {
        Self::new(DVec2::ZERO, dvec2(0.0, -1.0))
    }
}

impl Camera {
    /// Create a camera at `pos` facing along `dir`.
    pub fn new(pos: DVec2, dir: DVec2) -> Self {
        let mut cam = Self {
            pos,
            dir,
            plane: DVec2::ZERO,
            rotation: 0.0,
            pitch: 0.0,
            bob: Bob::default(),
        };
        cam.set_coordinate_system(dir.x, dir.y);
        cam
    }

    /*──────────────────────── position ─────────────────────────────*/

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.pos = dvec2(x, y);
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.pos
    }

    /*──────────────────────── orientation ──────────────────────────*/

    /// Additive turn by `degrees`.
    pub fn rotate(&mut self, degrees: f64) {
        let (s, c) = degrees.to_radians().sin_cos();
        self.dir = dvec2(self.dir.x * c - self.dir.y * s, self.dir.x * s + self.dir.y * c);
        self.update_plane();
        self.rotation = wrap_degrees(self.rotation + degrees);
    }

    /// Heading in degrees, `[0, 360)`.
    #[inline]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Facing vector. `(1, 0)` means looking straight down +X.
    #[inline]
    pub fn coordinate_system(&self) -> DVec2 {
        self.dir
    }

    /// Replace the facing vector; `plane` and `rotation` follow.
    pub fn set_coordinate_system(&mut self, x: f64, y: f64) {
        self.dir = dvec2(x, y);
        self.update_plane();
        self.rotation = wrap_degrees(x.atan2(y).to_degrees());
    }

    #[inline]
    pub fn plane(&self) -> DVec2 {
        self.plane
    }

    #[inline]
    fn update_plane(&mut self) {
        self.plane = dvec2(-self.dir.y * FOV_FACTOR, self.dir.x * FOV_FACTOR);
    }

    /*──────────────────────── movement ─────────────────────────────*/

    /// Walk `forward` along the facing vector and `strafe` along the plane.
    ///
    /// When the destination collides the camera slides: keep the new X,
    /// else keep the new Y, else stay put.
    pub fn move_by(&mut self, forward: f64, strafe: f64, collide: &impl CollisionQuery) {
        let old = self.pos;
        let new = old + self.dir * forward + self.plane * strafe;

        self.pos = if !collide.collide(new.x, new.y) {
            new
        } else if !collide.collide(new.x, old.y) {
            dvec2(new.x, old.y)
        } else if !collide.collide(old.x, new.y) {
            dvec2(old.x, new.y)
        } else {
            old
        };
    }

    /*──────────────────────── bob / pitch ──────────────────────────*/

    pub fn set_bob_range(&mut self, range: f64) {
        self.bob.range = range.clamp(-VIEW_LIMIT, VIEW_LIMIT);
    }

    #[inline]
    pub fn bob_range(&self) -> f64 {
        self.bob.range
    }

    /// Current bob offset.
    #[inline]
    pub fn bob(&self) -> f64 {
        self.bob.current
    }

    /// Animate the bob by `delta`; does nothing while fully at rest.
    pub fn advance_bob(&mut self, delta: f64) {
        let bob = &mut self.bob;
        if bob.range == 0.0 && bob.current == 0.0 {
            return;
        }

        bob.current += delta * bob.direction;

        if bob.direction > 0.0 && bob.current > bob.range {
            bob.direction = -1.0;
            if bob.current - bob.range < BOB_SNAP {
                bob.current = bob.range;
            }
        } else if bob.direction < 0.0 && bob.current < -bob.range {
            bob.direction = 1.0;
            if -bob.range - bob.current < BOB_SNAP {
                bob.current = -bob.range;
            }
        }
    }

    pub fn set_pitch(&mut self, pitch: f64) {
        self.pitch = pitch.clamp(-VIEW_LIMIT, VIEW_LIMIT);
    }

    /// Additive form of [`Camera::set_pitch`].
    pub fn pitch_by(&mut self, delta: f64) {
        self.set_pitch(self.pitch + delta);
    }

    #[inline]
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Combined pitch + bob, clamped so rows never leave the screen.
    #[inline]
    pub fn view_offset(&self) -> f64 {
        (self.pitch + self.bob.current).clamp(-VIEW_LIMIT, VIEW_LIMIT)
    }
}

/// Fold an angle into `[0, 360)`; `rem_euclid` alone can round up to 360.
#[inline]
fn wrap_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d >= 360.0 { 0.0 } else { d }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
