//! ---------------------------------------------------------------------------
//! Frame pipeline
//!
//! `RayCaster::draw` composites one frame in four stages:
//!
//! 1. **Solid pass**: per column, DDA to the nearest opaque wall, draw its
//!    slice, record its distance, project floor & ceiling below/above it.
//! 2. **Wall-sprite pass**: per column, DDA again and draw every wall sprite
//!    that is not behind the recorded solid distance.
//! 3. **Sprites**: billboards, depth-tested per stripe against stage 1.
//! 4. **Planes**: the floor/ceiling layer, behind everything else.
//!
//! Ordering on screen is left to the canvas depth keys.
//! ---------------------------------------------------------------------------

pub mod caster;
pub mod config;
pub mod planes;
pub mod sprites;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;
pub mod walls;

pub use caster::{CastState, ColumnCaster, ColumnState, Pass, WallHit, perpendicular_distance};
pub use config::EngineConfig;
pub use planes::PlaneLayer;
pub use sprites::{Billboard, visible_against};
pub use types::{FrameStats, View};
pub use walls::WallSlice;

use crate::{
    renderer::Canvas,
    world::{Camera, MapQuery, Sprite},
};

/// Owns the camera plus all per-frame scratch state.
pub struct RayCaster {
    camera: Camera,
    config: EngineConfig,
    /// One entry per screen column; only reallocated on a resolution change.
    columns: Vec<ColumnState>,
    layer: PlaneLayer,
    size: (usize, usize),
}

impl RayCaster {
    pub fn new(camera: Camera) -> Self {
        Self::with_config(camera, EngineConfig::default())
    }

    pub fn with_config(camera: Camera, config: EngineConfig) -> Self {
        Self {
            camera,
            config,
            columns: Vec::new(),
            layer: PlaneLayer::default(),
            size: (0, 0),
        }
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// Column state of the last frame.
    #[inline]
    pub fn columns(&self) -> &[ColumnState] {
        &self.columns
    }

    /// Floor/ceiling layer of the last frame.
    #[inline]
    pub fn layer(&self) -> &PlaneLayer {
        &self.layer
    }

    fn prepare(&mut self, width: usize, height: usize) {
        if self.size != (width, height) {
            log::debug!("ray caster scratch resized to {width}x{height}");
            self.size = (width, height);
            self.columns.resize(width, ColumnState::default());
            self.layer.resize(width, height);
        }
        self.layer.clear();
    }

    /// Render one frame of `map` and `sprites` into `canvas`.
    pub fn draw<'t, C, M>(&mut self, canvas: &mut C, map: &M, sprites: &[Sprite<'t>]) -> FrameStats
    where
        C: Canvas + ?Sized,
        M: MapQuery<'t> + ?Sized,
    {
        let (width, height) = canvas.size();
        let mut stats = FrameStats {
            columns: width,
            ..FrameStats::default()
        };
        if width == 0 || height == 0 {
            return stats;
        }

        self.prepare(width, height);
        let view = View::new(&self.camera, width, height);
        for (x, col) in self.columns.iter_mut().enumerate() {
            *col = ColumnState::new(x, width, view.dir, view.plane);
        }

        self.solid_pass(&view, map, canvas, &mut stats);
        self.wall_sprite_pass(&view, map, canvas, &mut stats);
        self.sprite_pass(&view, sprites, canvas, &mut stats);
        canvas.draw_layer(self.layer.pixels(), self.config.layer_depth);

        log::trace!(
            "frame {width}x{height}: {} walls, {} wall sprites, {} sprite stripes",
            stats.wall_slices,
            stats.wall_sprite_slices,
            stats.sprite_stripes
        );
        stats
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::{testing::RecordingCanvas, *};
    use crate::{
        renderer::{SoftwareCanvas, darken},
        world::{DEFAULT_MAP, GridMap, MapCell, TRANSPARENT, Texture, TextureBank, install_default_textures},
    };
    use glam::dvec2;

    /// `w × h` box with floor/ceiling everywhere inside.
    fn room<'t>(
        w: i32,
        h: i32,
        wall: &'t Texture,
        floor: Option<&'t Texture>,
        ceiling: Option<&'t Texture>,
    ) -> impl Fn(i32, i32) -> MapCell<'t> {
        move |x: i32, y: i32| {
            if !(0..w).contains(&x) || !(0..h).contains(&y) {
                MapCell::invalid()
            } else if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                MapCell::wall(wall)
            } else {
                MapCell::open(floor, ceiling)
            }
        }
    }

    #[test]
    fn single_column_in_three_by_three_room() {
        let wall = Texture::solid("WALL", 10, 10, 0xFF_FFFFFF);
        let map = room(3, 3, &wall, None, None);
        let mut rc = RayCaster::new(Camera::new(dvec2(1.5, 1.5), dvec2(0.0, -1.0)));
        let mut canvas = RecordingCanvas::new(1, 8);

        let stats = rc.draw(&mut canvas, &map, &[]);
        assert_eq!(stats.wall_slices, 1);
        assert_eq!(rc.columns()[0].wall_distance, 0.5);
        // hit x ≈ 1.17 → column 1, mirrored on a −Y face → 8
        assert_eq!(canvas.slices[0].tex_x, 8);
    }

    #[test]
    fn centre_column_samples_middle_of_texture() {
        let wall = Texture::solid("WALL", 8, 8, 0xFF_FFFFFF);
        let map = room(3, 3, &wall, None, None);
        let mut rc = RayCaster::new(Camera::new(dvec2(1.5, 1.5), dvec2(0.0, -1.0)));
        let mut canvas = RecordingCanvas::new(2, 8);

        rc.draw(&mut canvas, &map, &[]);
        let s = canvas.slices_at(1).next().unwrap();
        assert_eq!(s.tex_x, 3);
        // lh = 16 around row 4
        assert_eq!((s.y_top, s.y_bottom), (-4, 13));
        assert_eq!(s.shade, 255);
    }

    const FLOOR: u32 = 0xFF_C86432;
    const CEIL: u32 = 0xFF_3264C8;

    #[test]
    fn floor_and_ceiling_fade_with_distance() {
        let wall = Texture::solid("WALL", 8, 8, 0xFF_FFFFFF);
        let floor = Texture::solid("FLOOR", 4, 4, FLOOR);
        let ceil = Texture::solid("CEIL", 4, 4, CEIL);
        let map = room(3, 7, &wall, Some(&floor), Some(&ceil));
        let mut rc = RayCaster::new(Camera::new(dvec2(1.5, 5.5), dvec2(0.0, -1.0)));
        let mut canvas = RecordingCanvas::new(2, 20);

        rc.draw(&mut canvas, &map, &[]);
        assert_eq!(rc.columns()[1].wall_distance, 4.5);

        // row 13 lies 20/6 cells away
        let darkness = 1.0 - (20.0 / 6.0) / 10.0;
        assert_eq!(canvas.layer_pixel(1, 13), Some(darken(FLOOR, darkness)));
        assert_eq!(canvas.layer_pixel(1, 7), Some(darken(CEIL, darkness)));
        // row 12 projects into the wall cell, row 11 outside the map
        assert_eq!(canvas.layer_pixel(1, 12), Some(TRANSPARENT));
        assert_eq!(canvas.layer_pixel(1, 11), Some(TRANSPARENT));

        assert_eq!(canvas.layers[0].1, -150.0);
    }

    #[test]
    fn layer_has_no_memory_between_frames() {
        let wall = Texture::solid("WALL", 8, 8, 0xFF_FFFFFF);
        let floor = Texture::solid("FLOOR", 4, 4, FLOOR);
        let lit = room(3, 7, &wall, Some(&floor), None);
        let bare = room(3, 7, &wall, None, None);
        let mut rc = RayCaster::new(Camera::new(dvec2(1.5, 5.5), dvec2(0.0, -1.0)));

        let mut canvas = RecordingCanvas::new(2, 20);
        rc.draw(&mut canvas, &lit, &[]);
        assert_ne!(canvas.layer_pixel(1, 13), Some(TRANSPARENT));

        rc.draw(&mut canvas, &bare, &[]);
        assert!(rc.layer().pixels().iter().all(|&p| p == TRANSPARENT));

        // a column that hits nothing is cleared too
        let void = |_: i32, _: i32| MapCell::invalid();
        rc.draw(&mut canvas, &lit, &[]);
        rc.draw(&mut canvas, &void, &[]);
        assert!(rc.layer().pixels().iter().all(|&p| p == TRANSPARENT));
    }

    #[test]
    fn columns_are_reused_until_resolution_changes() {
        let wall = Texture::solid("WALL", 8, 8, 0xFF_FFFFFF);
        let map = room(3, 3, &wall, None, None);
        let mut rc = RayCaster::new(Camera::new(dvec2(1.5, 1.5), dvec2(0.0, -1.0)));

        rc.draw(&mut RecordingCanvas::new(4, 8), &map, &[]);
        let ptr = rc.columns().as_ptr();
        rc.draw(&mut RecordingCanvas::new(4, 8), &map, &[]);
        assert_eq!(rc.columns().as_ptr(), ptr);

        rc.draw(&mut RecordingCanvas::new(6, 8), &map, &[]);
        assert_eq!(rc.columns().len(), 6);
        assert_eq!(rc.layer().pixels().len(), 6 * 8);
    }

    #[test]
    fn empty_canvas_draws_nothing() {
        let map = |_: i32, _: i32| MapCell::invalid();
        let mut rc = RayCaster::new(Camera::default());
        let mut canvas = RecordingCanvas::new(0, 0);
        let stats = rc.draw(&mut canvas, &map, &[]);
        assert_eq!(stats, FrameStats::default());
        assert!(canvas.layers.is_empty());
    }

    #[test]
    fn pitch_shifts_walls_down() {
        let wall = Texture::solid("WALL", 8, 8, 0xFF_FFFFFF);
        let map = room(3, 7, &wall, None, None);
        let mut rc = RayCaster::new(Camera::new(dvec2(1.5, 5.5), dvec2(0.0, -1.0)));

        let mut level = RecordingCanvas::new(2, 20);
        rc.draw(&mut level, &map, &[]);
        rc.camera_mut().set_pitch(0.25);
        let mut pitched = RecordingCanvas::new(2, 20);
        rc.draw(&mut pitched, &map, &[]);

        let a = level.slices_at(1).next().unwrap();
        let b = pitched.slices_at(1).next().unwrap();
        assert_eq!(b.y_top - a.y_top, 5);
        assert_eq!(b.y_bottom - a.y_bottom, 5);
    }

    #[test]
    fn camera_touching_wall_keeps_rows_bounded() {
        let wall = Texture::solid("WALL", 8, 8, 0xFF_FFFFFF);
        let floor = Texture::solid("FLOOR", 4, 4, FLOOR);
        let map = room(4, 3, &wall, Some(&floor), None);
        let mut rc = RayCaster::new(Camera::new(dvec2(3.0 - 1e-9, 1.5), dvec2(1.0, 0.0)));
        let mut canvas = SoftwareCanvas::new(8, 600);

        let stats = rc.draw(&mut canvas, &map, &[]);
        assert_eq!(stats.wall_slices, 8);
        assert_eq!(canvas.pixel(4, 0), 0xFF_FFFFFF);
        assert_eq!(canvas.pixel(4, 599), 0xFF_FFFFFF);

        rc.camera_mut().set_pitch(-0.5);
        let mut recorded = RecordingCanvas::new(8, 600);
        rc.draw(&mut recorded, &map, &[]);
        let s = recorded.slices_at(4).next().unwrap();
        assert!(s.y_top <= 0 && s.y_bottom >= 600);
    }

    #[test]
    fn default_map_renders_through_software_canvas() {
        let mut bank = TextureBank::default_with_checker();
        install_default_textures(&mut bank).unwrap();
        let grid = GridMap::parse(DEFAULT_MAP, &bank).unwrap();
        let sprites = grid.sprites();

        let mut rc = RayCaster::new(Camera::new(grid.start(), dvec2(0.0, 1.0)));
        let mut canvas = SoftwareCanvas::new(64, 48);
        let stats = rc.draw(&mut canvas, &grid, &sprites);

        assert_eq!(stats.columns, 64);
        assert_eq!(stats.wall_slices, 64);
        assert!(stats.sprite_stripes > 0);
        assert!(rc.columns().iter().all(|c| c.wall_distance.is_finite()));
        // bottom row is floor, not the clear colour
        assert_ne!(canvas.pixel(32, 47), 0xFF_000000);
    }
}
