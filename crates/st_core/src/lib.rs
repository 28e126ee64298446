pub mod coords;
pub mod noise;
pub mod tile;

pub use coords::{GridTransform, TileCoord};
pub use noise::NoiseStrategy;
pub use tile::{TileDef, TileFlags, TileId, TileRegistry};
