//! Grid traversal (DDA) for one screen column.
//!
//! The caster walks cell by cell, always crossing whichever grid line is
//! nearer along the ray, and asks the map what it found. Each call to
//! [`ColumnCaster::advance`] is one transition of the per-column state
//! machine:
//!
//! ```text
//! STEPPING ──▶ HIT_ACCEPTED | HIT_REJECTED | OUT_OF_BOUNDS
//! ```

use glam::{DVec2, IVec2, dvec2, ivec2};

use crate::world::{MapCell, MapQuery, Side};

/// Per-column ray parameters shared by both passes and the sprite stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnState {
    /// Screen column mapped to `[-1, 1)`.
    pub camera_x: f64,
    pub ray_dir: DVec2,
    /// Ray length between two consecutive X (resp. Y) grid lines.
    pub delta: DVec2,
    /// Perpendicular distance to the nearest solid wall; `+∞` if none.
    pub wall_distance: f64,
}

impl Default for ColumnState {
    fn default() -> Self {
        Self {
            camera_x: 0.0,
            ray_dir: DVec2::ZERO,
            delta: DVec2::INFINITY,
            wall_distance: f64::INFINITY,
        }
    }
}

impl ColumnState {
    /// Ray for column `x` of `width`, fanned across the camera plane.
    pub fn new(x: usize, width: usize, dir: DVec2, plane: DVec2) -> Self {
        let camera_x = 2.0 * x as f64 / width as f64 - 1.0;
        let ray_dir = dir + plane * camera_x;
        Self {
            camera_x,
            ray_dir,
            delta: dvec2(
                line_spacing(ray_dir.x, ray_dir.y),
                line_spacing(ray_dir.y, ray_dir.x),
            ),
            wall_distance: f64::INFINITY,
        }
    }
}

/// `sqrt(1 + (across/along)²)`; a ray parallel to the lines never crosses
/// them, so a vanishing `along` yields `+∞` instead of dividing by zero.
#[inline]
fn line_spacing(along: f64, across: f64) -> f64 {
    if along.abs() < f64::EPSILON {
        f64::INFINITY
    } else {
        let r = across / along;
        (1.0 + r * r).sqrt()
    }
}

/// Which walls a pass is interested in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    /// Opaque walls; the first hit ends the column.
    Solid,
    /// Wall sprites; every hit along the ray is reported.
    WallSprite,
}

impl Pass {
    #[inline]
    fn accepts(self, cell: &MapCell<'_>) -> bool {
        match self {
            Pass::Solid => !cell.is_wall_sprite(),
            Pass::WallSprite => cell.is_wall_sprite(),
        }
    }
}

/// A visible wall face the current pass accepted.
#[derive(Clone, Copy, Debug)]
pub struct WallHit<'t> {
    pub cell: IVec2,
    pub side: Side,
    pub data: MapCell<'t>,
}

/// Outcome of one DDA step.
#[derive(Clone, Copy, Debug)]
pub enum CastState<'t> {
    /// Empty cell, or a skipped lookahead step.
    Stepping,
    HitAccepted(WallHit<'t>),
    /// A wall was there but hidden on this side or meant for the other pass.
    HitRejected,
    OutOfBounds,
}

/// DDA cursor over the grid for one column and one pass.
#[derive(Clone, Debug)]
pub struct ColumnCaster {
    cell: IVec2,
    step: IVec2,
    side_dist: DVec2,
    delta: DVec2,
    side: Side,
    /// Steps still to be taken without querying the map.
    skip: u32,
    steps: usize,
    max_steps: usize,
}

impl ColumnCaster {
    /// Start in the cell containing `origin`.
    pub fn new(origin: DVec2, column: &ColumnState, max_steps: usize) -> Self {
        let ray = column.ray_dir;
        let cell = origin.floor().as_ivec2();
        let step = ivec2(
            if ray.x < 0.0 { -1 } else { 1 },
            if ray.y < 0.0 { -1 } else { 1 },
        );

        let first = |pos: f64, cell: i32, step: i32, delta: f64| {
            if delta.is_infinite() {
                return f64::INFINITY;
            }
            let gap = if step < 0 {
                pos - cell as f64
            } else {
                cell as f64 + 1.0 - pos
            };
            gap * delta
        };

        Self {
            cell,
            step,
            side_dist: dvec2(
                first(origin.x, cell.x, step.x, column.delta.x),
                first(origin.y, cell.y, step.y, column.delta.y),
            ),
            delta: column.delta,
            side: Side::X,
            skip: 0,
            steps: 0,
            max_steps,
        }
    }

    /// Advance the next `n` cells without looking at them.
    pub fn skip_cells(&mut self, n: u32) {
        self.skip += n;
    }

    #[inline]
    pub fn cell(&self) -> IVec2 {
        self.cell
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Cross the nearer grid line; ties go to Y.
    fn step(&mut self) {
        if self.side_dist.x < self.side_dist.y {
            self.side_dist.x += self.delta.x;
            self.cell.x += self.step.x;
            self.side = Side::X;
        } else {
            self.side_dist.y += self.delta.y;
            self.cell.y += self.step.y;
            self.side = Side::Y;
        }
        self.steps += 1;
    }

    /// Take one step and classify what was found for `pass`.
    pub fn advance<'t, M>(&mut self, map: &M, pass: Pass) -> CastState<'t>
    where
        M: MapQuery<'t> + ?Sized,
    {
        if self.steps >= self.max_steps {
            log::warn!(
                "ray gave up after {} steps at cell {}; map never reported out of bounds",
                self.steps,
                self.cell
            );
            return CastState::OutOfBounds;
        }

        self.step();

        if self.skip > 0 {
            self.skip -= 1;
            return CastState::Stepping;
        }

        let data = map.query(self.cell.x, self.cell.y);
        if data.invalid {
            return CastState::OutOfBounds;
        }
        if data.wall.is_none() {
            return CastState::Stepping;
        }
        if data.hidden_on(self.side) || !pass.accepts(&data) {
            return CastState::HitRejected;
        }
        CastState::HitAccepted(WallHit {
            cell: self.cell,
            side: self.side,
            data,
        })
    }
}

/// Distance from `origin` to the face of `cell` crossed on `side`, measured
/// along the camera's forward axis (no fisheye).
///
/// `inset` pushes the face further along the crossed axis, away from the
/// viewer.
pub fn perpendicular_distance(origin: DVec2, ray: DVec2, cell: IVec2, side: Side, inset: f64) -> f64 {
    let (pos, cell, ray) = match side {
        Side::X => (origin.x, cell.x, ray.x),
        Side::Y => (origin.y, cell.y, ray.y),
    };
    let away = if ray > 0.0 { 1.0 } else { -1.0 };
    let near_face = if ray < 0.0 { 1.0 } else { 0.0 };
    (cell as f64 + inset * away - pos + near_face) / ray
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
