//! Headless sandbox: generate a world, knock a hole in it and log what the
//! signals carried.
//!
//! Usage: `stratum [biome] [seed]`

use std::path::Path;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use st_world::{load_config, TerrainConfig, DEFAULT_CONFIG_PATH};
use stratum::{
    apply_config, DamageTerrain, EnemySpawnsReady, PlayerSpawnReady, RegenerateTerrain,
    SpawnDecoration, StratumPlugins, TerrainReady, TerrainService, TileChanged,
};

fn main() {
    let mut args = std::env::args().skip(1);
    let biome = args.next();
    let seed = args.next().and_then(|s| s.parse::<u32>().ok());

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default(), StratumPlugins))
        .add_systems(
            Update,
            (log_spawns, log_tile_changes).after(stratum::pipeline::forward_tile_changes),
        );

    let config = match load_config(Path::new(DEFAULT_CONFIG_PATH)) {
        Ok(config) => {
            info!("loaded {} biomes from {DEFAULT_CONFIG_PATH}", config.biomes.len());
            config
        }
        Err(err) => {
            warn!("using built-in terrain config ({err})");
            TerrainConfig::default()
        }
    };
    apply_config(app.world_mut(), &config);

    app.world_mut().send_event(RegenerateTerrain { biome, seed });
    app.update();

    let Some(target) = crater_target(app.world().resource::<TerrainService>()) else {
        error!("no terrain was generated");
        return;
    };
    app.world_mut().send_event(DamageTerrain {
        position: target,
        radius: 3.0,
        damage: 2,
    });
    app.update();
}

/// Surface of the center column.
fn crater_target(service: &TerrainService) -> Option<Vec2> {
    let profile = service.profile()?;
    let x = profile.width() as i32 / 2;
    let transform = service.terrain().transform();
    Some(transform.cell_center(stratum::TileCoord::new(x, profile.surface_height(x))))
}

fn log_spawns(
    mut ready: EventReader<TerrainReady>,
    mut player: EventReader<PlayerSpawnReady>,
    mut enemies: EventReader<EnemySpawnsReady>,
    mut decorations: EventReader<SpawnDecoration>,
) {
    for spawn in player.read() {
        info!("player spawn at {}", spawn.0);
    }
    for spawns in enemies.read() {
        info!("enemy spawns at {:?}", spawns.0);
    }
    for decoration in decorations.read() {
        debug!(
            "decoration {} at column {} ({})",
            decoration.entity, decoration.column, decoration.position
        );
    }
    if ready.read().count() > 0 {
        info!("terrain ready");
    }
}

fn log_tile_changes(mut changes: EventReader<TileChanged>) {
    let count = changes.read().count();
    if count > 0 {
        info!("{count} tile changes");
    }
}
