use bevy::prelude::*;

pub mod config_io;
pub mod definition;
pub mod library;

pub use config_io::{
    load_config, parse_config, save_config, ConfigIoError, TerrainConfig, DEFAULT_CONFIG_PATH,
};
pub use definition::{
    Ambience, BiomeDefinition, BiomeError, DecorationRule, GenerationParams, LiquidConfig,
    OreVein, SpecialConfig, StrataTiles, WeatherConfig,
};
pub use library::BiomeLibrary;

/// World plugin for Stratum.
/// Owns the biome library that generation reads from.
pub struct StWorldPlugin;

impl Plugin for StWorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BiomeLibrary>();
    }
}
