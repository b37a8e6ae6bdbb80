//! The contracts the engine uses to look at a world it does not own.
//!
//! * [`MapQuery`] answers "what is in cell (x, y)?" many times per frame.
//! * [`CollisionQuery`] answers "may the camera stand at (x, y)?".
//! * [`Sprite`] is a billboard the host wants drawn this frame.
//!
//! Both traits are blanket-implemented for plain closures.

use bitflags::bitflags;
use glam::DVec2;

use crate::world::texture::Texture;

bitflags! {
    /// Per-cell rendering switches.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        /// Faces crossed on the X axis are not drawn.
        const X_HIDDEN    = 0x01;
        /// Faces crossed on the Y axis are not drawn.
        const Y_HIDDEN    = 0x02;
        /// The wall is a secondary, possibly transparent or offset, wall.
        const WALL_SPRITE = 0x04;
    }
}

/// Everything the renderer needs to know about one grid cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct MapCell<'t> {
    /// Out of bounds; stops the ray.
    pub invalid: bool,

    pub wall: Option<&'t Texture>,
    pub floor: Option<&'t Texture>,
    pub ceiling: Option<&'t Texture>,

    pub flags: CellFlags,

    /// Wall sprites only: extra virtual distance along the crossed axis.
    pub inset_amount: f64,
    /// Wall sprites only: horizontal texture shift, fraction of a cell.
    pub texture_offset: f64,
}

impl<'t> MapCell<'t> {
    /// The out-of-bounds sentinel.
    pub fn invalid() -> Self {
        Self {
            invalid: true,
            ..Self::default()
        }
    }

    /// Opaque wall cell.
    pub fn wall(tex: &'t Texture) -> Self {
        Self {
            wall: Some(tex),
            ..Self::default()
        }
    }

    /// Open cell with optional floor and ceiling.
    pub fn open(floor: Option<&'t Texture>, ceiling: Option<&'t Texture>) -> Self {
        Self {
            floor,
            ceiling,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_wall_sprite(&self) -> bool {
        self.flags.contains(CellFlags::WALL_SPRITE)
    }

    /// `true` if the face crossed on `side` is suppressed.
    #[inline]
    pub fn hidden_on(&self, side: Side) -> bool {
        match side {
            Side::X => self.flags.contains(CellFlags::X_HIDDEN),
            Side::Y => self.flags.contains(CellFlags::Y_HIDDEN),
        }
    }
}

/// Which grid axis a ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    X,
    Y,
}

/// Map lookup by integer cell.
///
/// Must return [`MapCell::invalid`] for every out-of-bounds cell and be
/// deterministic for the duration of one draw call.
pub trait MapQuery<'t> {
    fn query(&self, x: i32, y: i32) -> MapCell<'t>;
}

impl<'t, F> MapQuery<'t> for F
where
    F: Fn(i32, i32) -> MapCell<'t>,
{
    #[inline]
    fn query(&self, x: i32, y: i32) -> MapCell<'t> {
        self(x, y)
    }
}

/// `true` means the point is blocked.
pub trait CollisionQuery {
    fn collide(&self, x: f64, y: f64) -> bool;
}

impl<F> CollisionQuery for F
where
    F: Fn(f64, f64) -> bool,
{
    #[inline]
    fn collide(&self, x: f64, y: f64) -> bool {
        self(x, y)
    }
}

/// Billboard to draw this frame. The texture is borrowed, never owned.
#[derive(Clone, Copy, Debug)]
pub struct Sprite<'t> {
    pub texture: &'t Texture,
    pub pos: DVec2,
}

impl<'t> Sprite<'t> {
    pub fn new(texture: &'t Texture, x: f64, y: f64) -> Self {
        Self {
            texture,
            pos: DVec2::new(x, y),
        }
    }
}
