/// Tuning knobs of the ray-casting renderer.
///
/// Depth keys follow the [`Canvas`](crate::renderer::Canvas) convention:
/// larger is nearer the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Depth key of a wall slice at distance 0.
    pub wall_depth_base: f64,
    /// How fast wall depth keys fall off with distance.
    pub wall_depth_scale: f64,
    /// Depth key of the floor/ceiling layer (below every wall).
    pub layer_depth: f64,
    /// Floor/ceiling texels fade to black at this distance.
    pub fog_distance: f64,
    /// Billboard height relative to screen width at distance 1.
    pub sprite_scale: f64,
    /// A billboard this close to a wall still draws in front of it.
    pub sprite_depth_tolerance: f64,
    /// Upper bound on DDA steps per column and pass.
    pub max_ray_steps: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wall_depth_base: -100.0,
            wall_depth_scale: 0.05,
            layer_depth: -150.0,
            fog_distance: 10.0,
            sprite_scale: 0.75,
            sprite_depth_tolerance: 0.5,
            max_ray_steps: 4096,
        }
    }
}

impl EngineConfig {
    /// Depth key for a wall slice `dist` cells away.
    #[inline]
    pub fn wall_depth(&self, dist: f64) -> f64 {
        self.wall_depth_base - dist * self.wall_depth_scale
    }
}
