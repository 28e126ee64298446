use bevy::prelude::*;

pub mod builder;
pub mod destructible;
pub mod grid;

pub use builder::{BuildError, GeneratedTerrain, ResolvedStrata, TerrainGridBuilder, MAX_WORLD_WIDTH};
pub use destructible::{cells_in_radius, damage_tier, DestructibleGrid, TileChange};
pub use grid::{GridBounds, TileGrid};

/// Emitted once per cell mutation so renderers can swap damage appearances.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileChanged(pub TileChange);

/// Tilemap plugin for Stratum.
/// Registers the tile change events emitted by the destructible grid.
pub struct StTilemapPlugin;

impl Plugin for StTilemapPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TileChanged>();
    }
}
