use bevy::prelude::*;

pub mod decoration;
pub mod spawn_points;

pub use decoration::{DecorationPlacement, DecorationPlacements, DecorationPlacer, SpacingCursor};
pub use spawn_points::{SpawnPointCalculator, SpawnPoints};

/// Fired once per generation pass with the player's world-space spawn.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerSpawnReady(pub Vec2);

/// Fired once per generation pass with the enemy world-space spawns.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EnemySpawnsReady(pub Vec<Vec2>);

/// Request to instantiate one decoration. The receiver owns the entity.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SpawnDecoration {
    /// Index of the rule in the biome's decoration list.
    pub rule: usize,
    pub entity: String,
    pub column: i32,
    pub position: Vec2,
}

/// Entity spawn plugin for Stratum.
/// Registers the spawn-point and decoration signals of a generation pass.
pub struct StEntitySpawnPlugin;

impl Plugin for StEntitySpawnPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerSpawnReady>()
            .add_event::<EnemySpawnsReady>()
            .add_event::<SpawnDecoration>();
    }
}
