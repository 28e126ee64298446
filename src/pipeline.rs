use bevy::prelude::*;
use st_entity_spawn::{EnemySpawnsReady, PlayerSpawnReady, SpawnDecoration};
use st_tilemap::TileChanged;
use st_world::BiomeLibrary;

use crate::service::{
    ActiveAmbience, GenerationReport, GenerationRequest, GenerationSettings, TerrainService,
};

/// Ask for a new world. `None` keeps the active biome or the configured seed.
#[derive(Event, Debug, Clone, Default, PartialEq, Eq)]
pub struct RegenerateTerrain {
    pub biome: Option<String>,
    pub seed: Option<u32>,
}

/// The pass finished; spawn points and the grid can be queried.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerrainReady;

#[derive(Event, Debug, Clone, PartialEq)]
pub struct AmbienceChanged(pub ActiveAmbience);

/// Damage request from gameplay. A radius of zero or less hits one cell.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageTerrain {
    pub position: Vec2,
    pub radius: f32,
    pub damage: u32,
}

/// Queue the first regenerate request of the frame; the rest are refused.
pub fn start_generation(
    mut requests: EventReader<RegenerateTerrain>,
    mut service: ResMut<TerrainService>,
) {
    for request in requests.read() {
        let request = GenerationRequest {
            biome: request.biome.clone(),
            seed: request.seed,
        };
        match service.request_generation(request.clone()) {
            Ok(()) => debug!("terrain generation queued: {:?}", request),
            Err(err) => warn!("dropping terrain request {:?}: {err}", request),
        }
    }
}

/// Run the queued pass and publish its results.
#[allow(clippy::too_many_arguments)]
pub fn run_generation(
    mut service: ResMut<TerrainService>,
    mut library: ResMut<BiomeLibrary>,
    settings: Res<GenerationSettings>,
    mut ambience: ResMut<ActiveAmbience>,
    mut ready: EventWriter<TerrainReady>,
    mut player: EventWriter<PlayerSpawnReady>,
    mut enemies: EventWriter<EnemySpawnsReady>,
    mut decorations: EventWriter<SpawnDecoration>,
    mut ambience_changed: EventWriter<AmbienceChanged>,
) {
    let Some(result) = service.run_pending(&library, &settings) else {
        return;
    };

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            warn!("terrain generation failed: {err}");
            return;
        }
    };

    log_report(&report, settings.world_width);
    library.set_active(&report.biome);

    let GenerationReport {
        decorations: placed,
        spawn_points,
        ambience: new_ambience,
        ..
    } = report;

    decorations.send_batch(placed);
    *ambience = new_ambience.clone();
    ambience_changed.send(AmbienceChanged(new_ambience));
    player.send(PlayerSpawnReady(spawn_points.player));
    enemies.send(EnemySpawnsReady(spawn_points.enemies.to_vec()));
    ready.send(TerrainReady);
}

fn log_report(report: &GenerationReport, world_width: usize) {
    info!(
        "generated {} (seed {}): {} columns, {} tiles, {} decorations",
        report.biome,
        report.seed,
        world_width,
        report.tile_count,
        report.decorations.len()
    );
}

pub fn apply_damage_requests(
    mut requests: EventReader<DamageTerrain>,
    mut service: ResMut<TerrainService>,
) {
    for request in requests.read() {
        service.destroy_terrain_at(request.position, request.radius, request.damage);
    }
}

/// Publish the grid's change journal as [`TileChanged`] events.
pub fn forward_tile_changes(
    mut service: ResMut<TerrainService>,
    mut changed: EventWriter<TileChanged>,
) {
    let changes = service.drain_changes();
    if !changes.is_empty() {
        changed.send_batch(changes.into_iter().map(TileChanged));
    }
}
