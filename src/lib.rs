//! Grid ray-casting renderer.
//!
//! * [`world`] – camera, textures, the map/collision contracts and a demo grid.
//! * [`engine`] – DDA column caster, wall / wall-sprite passes, floor-ceiling
//!   projection and sprite billboards.
//! * [`renderer`] – the drawable surface the engine composites into, plus a
//!   CPU implementation.

pub mod engine;
pub mod renderer;
pub mod world;
