//! The terrain resource: one generation pass at a time, then the only
//! gateway for terrain mutation until the next pass.

use std::sync::Arc;

use bevy::prelude::*;
use st_core::{GridTransform, TileId, TileRegistry};
use st_entity_spawn::{
    DecorationPlacer, SpacingCursor, SpawnDecoration, SpawnPointCalculator, SpawnPoints,
};
use st_noise::ColumnProfile;
use st_tilemap::{BuildError, DestructibleGrid, TerrainGridBuilder, TileChange};
use st_world::{BiomeDefinition, BiomeLibrary};
use thiserror::Error;

/// Knobs for a generation pass that do not belong to a biome.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub world_width: usize,
    /// Used when a request does not carry its own seed.
    pub seed: u32,
    /// Columns inward from each edge for enemy spawns.
    pub edge_offset: i32,
    /// Cells above the surface for player and enemy spawns.
    pub spawn_height_offset: i32,
    pub transform: GridTransform,
    pub spacing: SpacingCursor,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            world_width: 128,
            seed: 42,
            edge_offset: 5,
            spawn_height_offset: 2,
            transform: GridTransform::default(),
            spacing: SpacingCursor::PerRule,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("a generation pass is already pending or running")]
    Busy,
    #[error("unknown biome `{0}`")]
    UnknownBiome(String),
    #[error("no active biome to generate")]
    NoActiveBiome,
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Stages of one pass, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationStage {
    Init,
    Background,
    Strata,
    Decorations,
    Ambience,
    SpawnPoints,
    Complete,
}

impl GenerationStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Background => "background",
            Self::Strata => "strata",
            Self::Decorations => "decorations",
            Self::Ambience => "ambience",
            Self::SpawnPoints => "spawn points",
            Self::Complete => "complete",
        }
    }
}

/// A queued regenerate. `None` fields fall back to the active biome and the
/// configured seed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub biome: Option<String>,
    pub seed: Option<u32>,
}

/// Presentation state of the active biome.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ActiveAmbience {
    pub biome: String,
    pub sky_color: [f32; 4],
    pub ambient_light: [f32; 4],
    pub background: Option<String>,
    /// Empty unless the biome enables weather.
    pub weather: Vec<String>,
}

impl ActiveAmbience {
    pub fn from_biome(biome: &BiomeDefinition) -> Self {
        let weather = &biome.special.weather;
        Self {
            biome: biome.name.clone(),
            sky_color: biome.ambience.sky_color,
            ambient_light: biome.ambience.ambient_light,
            background: biome.ambience.background.clone(),
            weather: if weather.enabled {
                weather.effects.clone()
            } else {
                Vec::new()
            },
        }
    }
}

/// Everything a finished pass hands to the rest of the game.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub biome: String,
    pub seed: u32,
    pub profile: ColumnProfile,
    pub decorations: Vec<SpawnDecoration>,
    pub spawn_points: SpawnPoints,
    pub ambience: ActiveAmbience,
    pub tile_count: usize,
}

/// Owns the tile grid, its health map and the outputs of the last pass.
#[derive(Resource, Debug)]
pub struct TerrainService {
    tiles: Arc<TileRegistry>,
    terrain: DestructibleGrid,
    profile: Option<ColumnProfile>,
    spawn_points: Option<SpawnPoints>,
    active_biome: Option<String>,
    pending: Option<GenerationRequest>,
    stage: Option<GenerationStage>,
}

impl Default for TerrainService {
    fn default() -> Self {
        Self::new(TileRegistry::builtin())
    }
}

impl TerrainService {
    pub fn new(tiles: TileRegistry) -> Self {
        let tiles = Arc::new(tiles);
        Self {
            terrain: DestructibleGrid::new(Arc::clone(&tiles), GridTransform::default()),
            tiles,
            profile: None,
            spawn_points: None,
            active_biome: None,
            pending: None,
            stage: None,
        }
    }

    /// Swap the tile registry. The current world is discarded because its
    /// tile ids belong to the old registry.
    pub fn set_tiles(&mut self, tiles: TileRegistry) {
        let transform = *self.terrain.transform();
        *self = Self {
            pending: self.pending.take(),
            ..Self::new(tiles)
        };
        self.terrain.set_transform(transform);
    }

    pub fn tiles(&self) -> &TileRegistry {
        &self.tiles
    }

    pub fn tile_id(&self, name: &str) -> Option<TileId> {
        self.tiles.id_of(name)
    }

    pub fn terrain(&self) -> &DestructibleGrid {
        &self.terrain
    }

    pub fn profile(&self) -> Option<&ColumnProfile> {
        self.profile.as_ref()
    }

    pub fn spawn_points(&self) -> Option<&SpawnPoints> {
        self.spawn_points.as_ref()
    }

    pub fn active_biome(&self) -> Option<&str> {
        self.active_biome.as_deref()
    }

    /// Stage of the running pass, `None` when idle.
    pub fn stage(&self) -> Option<GenerationStage> {
        self.stage
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.stage.is_some()
    }

    /// Queue a pass. Refused while another one is pending or running.
    pub fn request_generation(&mut self, request: GenerationRequest) -> Result<(), GenerationError> {
        if self.is_busy() {
            return Err(GenerationError::Busy);
        }
        self.pending = Some(request);
        Ok(())
    }

    /// Run the queued pass, if any.
    pub fn run_pending(
        &mut self,
        library: &BiomeLibrary,
        settings: &GenerationSettings,
    ) -> Option<Result<GenerationReport, GenerationError>> {
        let request = self.pending.take()?;
        Some(self.generate(library, settings, &request))
    }

    /// Run a full pass to completion. On error the previous world, spawn
    /// points and active biome are left as they were.
    pub fn generate(
        &mut self,
        library: &BiomeLibrary,
        settings: &GenerationSettings,
        request: &GenerationRequest,
    ) -> Result<GenerationReport, GenerationError> {
        if self.stage.is_some() {
            return Err(GenerationError::Busy);
        }

        let result = self.run_stages(library, settings, request);
        self.stage = None;
        result
    }

    fn enter(&mut self, stage: GenerationStage) {
        debug!("terrain generation: {}", stage.label());
        self.stage = Some(stage);
    }

    fn run_stages(
        &mut self,
        library: &BiomeLibrary,
        settings: &GenerationSettings,
        request: &GenerationRequest,
    ) -> Result<GenerationReport, GenerationError> {
        self.enter(GenerationStage::Init);
        let biome = match &request.biome {
            Some(name) => library
                .get(name)
                .ok_or_else(|| GenerationError::UnknownBiome(name.clone()))?,
            None => library
                .active()
                .ok_or(GenerationError::NoActiveBiome)?,
        };
        let seed = request.seed.unwrap_or(settings.seed);

        self.enter(GenerationStage::Background);
        if let Some(background) = &biome.ambience.background {
            debug!("terrain background: {background}");
        }

        self.enter(GenerationStage::Strata);
        let generated =
            TerrainGridBuilder::new(&self.tiles).build(biome, settings.world_width, seed)?;
        let tile_count = generated.grid.len();
        self.terrain.replace_grid(generated.grid);
        self.terrain.set_transform(settings.transform);
        let profile = generated.profile;

        self.enter(GenerationStage::Decorations);
        let decorations: Vec<SpawnDecoration> =
            DecorationPlacer::new(&profile, &biome.decorations, seed)
                .with_transform(settings.transform)
                .with_spacing(settings.spacing)
                .placements()
                .map(|placement| SpawnDecoration {
                    entity: biome.decorations[placement.rule].entity.clone(),
                    rule: placement.rule,
                    column: placement.column,
                    position: placement.position,
                })
                .collect();

        self.enter(GenerationStage::Ambience);
        let ambience = ActiveAmbience::from_biome(biome);

        self.enter(GenerationStage::SpawnPoints);
        let spawn_points =
            SpawnPointCalculator::new(settings.edge_offset, settings.spawn_height_offset)
                .compute(&profile, &settings.transform)
                .unwrap_or_default();

        self.enter(GenerationStage::Complete);
        self.profile = Some(profile.clone());
        self.spawn_points = Some(spawn_points.clone());
        self.active_biome = Some(biome.name.clone());

        Ok(GenerationReport {
            biome: biome.name.clone(),
            seed,
            profile,
            decorations,
            spawn_points,
            ambience,
            tile_count,
        })
    }

    /// Surface row of column `x`; 0 outside the world or before the first pass.
    pub fn surface_height(&self, x: i32) -> i32 {
        self.profile.as_ref().map_or(0, |profile| profile.surface_height(x))
    }

    pub fn get_tile(&self, world: Vec2) -> Option<TileId> {
        self.terrain.get_tile(world)
    }

    pub fn is_solid(&self, world: Vec2) -> bool {
        self.terrain.is_solid(world)
    }

    pub fn damage_tile(&mut self, world: Vec2, amount: u32) {
        self.terrain.damage_tile(world, amount);
    }

    pub fn place_tile(&mut self, world: Vec2, tile: TileId) -> bool {
        self.terrain.place_tile(world, tile)
    }

    pub fn area_damage(&mut self, center: Vec2, radius: f32, amount: u32) {
        self.terrain.area_damage(center, radius, amount);
    }

    pub fn area_clear(&mut self, center: Vec2, radius: f32) {
        self.terrain.area_clear(center, radius);
    }

    pub fn destroy_terrain_at(&mut self, world: Vec2, radius: f32, amount: u32) {
        self.terrain.destroy_terrain_at(world, radius, amount);
    }

    pub fn drain_changes(&mut self) -> Vec<TileChange> {
        self.terrain.drain_changes()
    }
}
