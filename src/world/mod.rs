mod camera;
mod grid;
mod query;
mod texture;

pub use camera::{Camera, FOV_FACTOR};

pub use grid::{DEFAULT_MAP, GridMap, MapError, Tile, install_default_textures, names};

pub use query::{CellFlags, CollisionQuery, MapCell, MapQuery, Side, Sprite};

pub use texture::{NO_TEXTURE, TRANSPARENT, Texture, TextureBank, TextureError, TextureId};
