use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use st_core::{TileDef, TileRegistry};
use thiserror::Error;

use crate::definition::{BiomeDefinition, BiomeError};
use crate::library::BiomeLibrary;

/// Default location of the terrain configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "assets/terrain.ron";

/// Error type for configuration I/O operations.
#[derive(Debug, Error)]
pub enum ConfigIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON serialization error: {0}")]
    Ron(#[from] ron::Error),
    #[error("RON parse error: {0}")]
    RonSpanned(#[from] ron::error::SpannedError),
    #[error("invalid biome: {0}")]
    Biome(#[from] BiomeError),
}

/// Everything generation needs from disk: tile types and biomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    pub tiles: Vec<TileDef>,
    pub biomes: Vec<BiomeDefinition>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            tiles: TileRegistry::builtin().iter().map(|(_, def)| def.clone()).collect(),
            biomes: vec![BiomeDefinition::meadow()],
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), BiomeError> {
        self.biomes.iter().try_for_each(BiomeDefinition::validate)
    }

    pub fn tile_registry(&self) -> TileRegistry {
        TileRegistry::from_defs(self.tiles.iter().cloned())
    }

    pub fn biome_library(&self) -> BiomeLibrary {
        BiomeLibrary::new(self.biomes.clone())
    }
}

/// Parse and validate a configuration from RON text.
pub fn parse_config(contents: &str) -> Result<TerrainConfig, ConfigIoError> {
    let config: TerrainConfig = ron::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a configuration from a RON file.
pub fn load_config(path: &Path) -> Result<TerrainConfig, ConfigIoError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Save a configuration to a RON file.
pub fn save_config(path: &Path, config: &TerrainConfig) -> Result<(), ConfigIoError> {
    let pretty_config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .separate_tuple_members(true);

    let ron_string = ron::ser::to_string_pretty(config, pretty_config)?;
    fs::write(path, ron_string)?;
    Ok(())
}
