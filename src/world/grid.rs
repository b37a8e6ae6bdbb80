//! Text-grid world used by the viewer and by tests.
//!
//! ```text
//! #  wall            .  open floor (space works too)
//! S  player start    E  enemy sprite
//! |  door on X       -  door on Y
//! C  carpeted floor
//! ```
//!
//! Doors are wall sprites pushed half a cell into their block, with the
//! perpendicular faces hidden so they sit flush with the neighbouring walls.

use glam::{DVec2, IVec2, dvec2};
use thiserror::Error;

use crate::world::{
    query::{CellFlags, CollisionQuery, MapCell, MapQuery, Sprite},
    texture::{Texture, TextureBank, TextureError, TextureId},
};

/// Layout the viewer starts with when no map file is given.
pub const DEFAULT_MAP: &str = "\
############
#S.#.......#
#..|.......#
#..#..C.#..#
#..####.#.E#
#..#..E.#..#
#..#..C.#..#
#....#-#...#
#E.#......E#
############";

/// Things that can go wrong while parsing a grid.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,

    #[error("row {row} is {found} cells wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown glyph `{glyph}` at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },

    #[error("map has no open cell to start in")]
    NoStart,

    #[error(transparent)]
    Texture(#[from] TextureError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Open,
    Carpet,
    Wall,
    /// Door whose visible faces are crossed on `Side::X`.
    DoorX,
    /// Door whose visible faces are crossed on `Side::Y`.
    DoorY,
}

impl Tile {
    /// Walls and (closed) doors block movement.
    #[inline]
    pub fn solid(self) -> bool {
        matches!(self, Tile::Wall | Tile::DoorX | Tile::DoorY)
    }
}

/// Texture names a [`GridMap`] resolves in its bank.
pub mod names {
    pub const WALL: &str = "WALL";
    pub const DOOR: &str = "DOOR";
    pub const FLOOR: &str = "FLOOR";
    pub const CARPET: &str = "CARPET";
    pub const CEILING: &str = "CEILING";
    pub const ENEMY: &str = "ENEMY";
}

/// Fill `bank` with the procedural textures a [`GridMap`] expects.
pub fn install_default_textures(bank: &mut TextureBank) -> Result<(), TextureError> {
    bank.insert(
        names::WALL,
        Texture::bricks(names::WALL, 64, 64, 0xFF_8C3A28, 0xFF_B0A89C),
    )?;
    bank.insert(names::DOOR, door_texture(64, 64))?;
    bank.insert(
        names::FLOOR,
        Texture::checker(names::FLOOR, 32, 32, 0xFF_6A6A6A, 0xFF_4A4A4A),
    )?;
    bank.insert(
        names::CARPET,
        Texture::checker(names::CARPET, 16, 16, 0xFF_7A1F2B, 0xFF_5C1620),
    )?;
    bank.insert(
        names::CEILING,
        Texture::solid(names::CEILING, 8, 8, 0xFF_303848),
    )?;
    bank.insert(names::ENEMY, enemy_texture(32, 48))?;
    Ok(())
}

/// Wooden panel with a transparent window in its upper half.
fn door_texture(w: usize, h: usize) -> Texture {
    let mut tex = Texture::solid(names::DOOR, w, h, 0xFF_6B4A2B);
    for y in h / 8..h * 3 / 8 {
        for x in w / 4..w * 3 / 4 {
            tex.pixels[y * w + x] = 0x00_000000;
        }
    }
    tex
}

/// Crude figure on a transparent background.
fn enemy_texture(w: usize, h: usize) -> Texture {
    let mut tex = Texture::solid(names::ENEMY, w, h, 0x00_000000);
    let (cx, head_r) = (w as i32 / 2, (w / 6) as i32);
    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (x as i32, y as i32);
            let head = (xi - cx).pow(2) + (yi - head_r - 1).pow(2) <= head_r * head_r;
            let body = yi > head_r * 2 && (xi - cx).abs() <= (w as i32) / 4;
            if head || body {
                tex.pixels[y * w + x] = if head { 0xFF_E0C090 } else { 0xFF_2050C0 };
            }
        }
    }
    tex
}

/// Resolved texture handles, looked up once.
#[derive(Clone, Copy)]
struct Skins<'t> {
    wall: &'t Texture,
    door: &'t Texture,
    floor: &'t Texture,
    carpet: &'t Texture,
    ceiling: &'t Texture,
    enemy: &'t Texture,
}

/// Rectangular grid with textures borrowed from a [`TextureBank`].
pub struct GridMap<'t> {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    start: IVec2,
    enemies: Vec<IVec2>,
    skins: Skins<'t>,
}

impl<'t> GridMap<'t> {
    /// Parse `text` (one line per row). Every texture in [`names`] must be
    /// present in `bank`; missing ones fall back to the checkerboard.
    pub fn parse(text: &str, bank: &'t TextureBank) -> Result<Self, MapError> {
        let rows: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let width = rows.first().map(|r| r.chars().count()).ok_or(MapError::Empty)?;

        let mut tiles = Vec::with_capacity(width * rows.len());
        let mut start = None;
        let mut first_open = None;
        let mut enemies = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MapError::Ragged {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let cell = IVec2::new(x as i32, y as i32);
                let tile = match glyph {
                    '#' => Tile::Wall,
                    '.' | ' ' => Tile::Open,
                    'C' => Tile::Carpet,
                    '|' => Tile::DoorX,
                    '-' => Tile::DoorY,
                    'S' => {
                        start = Some(cell);
                        Tile::Open
                    }
                    'E' => {
                        enemies.push(cell);
                        Tile::Open
                    }
                    _ => return Err(MapError::UnknownGlyph { glyph, x, y }),
                };
                if first_open.is_none() && !tile.solid() {
                    first_open = Some(cell);
                }
                tiles.push(tile);
            }
        }

        let start = start.or(first_open).ok_or(MapError::NoStart)?;
        let skins = Skins {
            wall: Self::skin(bank, names::WALL)?,
            door: Self::skin(bank, names::DOOR)?,
            floor: Self::skin(bank, names::FLOOR)?,
            carpet: Self::skin(bank, names::CARPET)?,
            ceiling: Self::skin(bank, names::CEILING)?,
            enemy: Self::skin(bank, names::ENEMY)?,
        };

        log::debug!(
            "parsed {}x{} grid, start {start}, {} enemies",
            width,
            rows.len(),
            enemies.len()
        );

        Ok(Self {
            width,
            height: rows.len(),
            tiles,
            start,
            enemies,
            skins,
        })
    }

    fn skin(bank: &'t TextureBank, name: &str) -> Result<&'t Texture, TextureError> {
        let id: TextureId = bank.id_or_missing(name);
        bank.texture(id)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at `(x, y)`, or `None` outside the grid.
    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.tiles[y as usize * self.width + x as usize])
    }

    /// Centre of the start cell.
    pub fn start(&self) -> DVec2 {
        self.start.as_dvec2() + 0.5
    }

    /// One billboard per enemy, centred in its cell.
    pub fn sprites(&self) -> Vec<Sprite<'t>> {
        self.enemies
            .iter()
            .map(|c| Sprite::new(self.skins.enemy, c.x as f64 + 0.5, c.y as f64 + 0.5))
            .collect()
    }

    /// Walk from `pos` along `dir` one step at a time and report the first
    /// sprite sharing a cell with the walker. Walls stop the walk.
    pub fn hit_test(&self, pos: DVec2, dir: DVec2, sprites: &[Sprite<'_>]) -> Option<usize> {
        if dir == DVec2::ZERO {
            return None;
        }
        let max_steps = self.width + self.height;
        let mut p = pos;

        for _ in 0..max_steps {
            p += dir;
            let cell = p.floor().as_ivec2();
            match self.tile(cell.x, cell.y) {
                None => return None,
                Some(t) if t.solid() => return None,
                Some(_) => {}
            }
            if let Some(hit) = sprites
                .iter()
                .position(|s| s.pos.floor().as_ivec2() == cell)
            {
                return Some(hit);
            }
        }
        None
    }
}

impl<'t> MapQuery<'t> for GridMap<'t> {
    fn query(&self, x: i32, y: i32) -> MapCell<'t> {
        let Some(tile) = self.tile(x, y) else {
            return MapCell::invalid();
        };
        let s = &self.skins;
        match tile {
            Tile::Wall => MapCell::wall(s.wall),
            Tile::Open => MapCell::open(Some(s.floor), Some(s.ceiling)),
            Tile::Carpet => MapCell::open(Some(s.carpet), Some(s.ceiling)),
            Tile::DoorX | Tile::DoorY => {
                let hidden = if tile == Tile::DoorX {
                    CellFlags::Y_HIDDEN
                } else {
                    CellFlags::X_HIDDEN
                };
                MapCell {
                    wall: Some(s.door),
                    floor: Some(s.floor),
                    ceiling: Some(s.ceiling),
                    flags: CellFlags::WALL_SPRITE | hidden,
                    inset_amount: 0.5,
                    ..MapCell::default()
                }
            }
        }
    }
}

impl CollisionQuery for GridMap<'_> {
    fn collide(&self, x: f64, y: f64) -> bool {
        let c = dvec2(x, y).floor().as_ivec2();
        self.tile(c.x, c.y).is_none_or(Tile::solid)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
