pub mod heightmap;
pub mod profile;
pub mod strategy;

pub use heightmap::{HeightmapGenerator, HeightmapParams, MIDDLE_CHANNEL_SEED_OFFSET};
pub use profile::ColumnProfile;
pub use strategy::PerlinStrategy;
