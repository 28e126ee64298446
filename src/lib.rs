//! Stratum: procedural, destructible 2D terrain.
//!
//! Add [`StratumPlugins`] to an app, send [`RegenerateTerrain`] and listen
//! for [`TerrainReady`] and the spawn signals. After a pass, every terrain
//! mutation goes through [`TerrainService`].

use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

pub mod pipeline;
pub mod service;

pub use pipeline::{AmbienceChanged, DamageTerrain, RegenerateTerrain, TerrainReady};
pub use service::{
    ActiveAmbience, GenerationError, GenerationReport, GenerationRequest, GenerationSettings,
    GenerationStage, TerrainService,
};

pub use st_core::{GridTransform, TileCoord, TileId, TileRegistry};
pub use st_entity_spawn::{EnemySpawnsReady, PlayerSpawnReady, SpawnDecoration, SpawnPoints};
pub use st_tilemap::{TileChange, TileChanged};
pub use st_world::{BiomeDefinition, BiomeLibrary, TerrainConfig};

/// Runs generation passes and routes terrain mutations.
pub struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TerrainService>()
            .init_resource::<GenerationSettings>()
            .init_resource::<ActiveAmbience>()
            .add_event::<RegenerateTerrain>()
            .add_event::<TerrainReady>()
            .add_event::<AmbienceChanged>()
            .add_event::<DamageTerrain>()
            .add_systems(
                Update,
                (
                    pipeline::start_generation,
                    pipeline::run_generation,
                    pipeline::apply_damage_requests,
                    pipeline::forward_tile_changes,
                )
                    .chain(),
            );
    }
}

/// Every Stratum plugin, in dependency order.
pub struct StratumPlugins;

impl PluginGroup for StratumPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(st_world::StWorldPlugin)
            .add(st_tilemap::StTilemapPlugin)
            .add(st_entity_spawn::StEntitySpawnPlugin)
            .add(TerrainPlugin)
    }
}

/// Install a loaded configuration: its tiles into the terrain service and its
/// biomes into the library. The first biome becomes active.
pub fn apply_config(world: &mut World, config: &TerrainConfig) {
    world
        .resource_mut::<TerrainService>()
        .set_tiles(config.tile_registry());
    world.insert_resource(config.biome_library());
}
