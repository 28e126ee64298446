use bevy::math::Vec2;
use smallvec::SmallVec;
use st_core::{GridTransform, TileCoord};
use st_noise::ColumnProfile;

/// World-space spawn positions derived from one generation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnPoints {
    pub player: Vec2,
    /// Left edge first, then right edge. Either may be missing on narrow worlds.
    pub enemies: SmallVec<[Vec2; 2]>,
}

/// Derives the player spawn from the center column and enemy spawns from
/// columns near the left and right edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnPointCalculator {
    /// Columns inward from each edge for the enemy spawns.
    pub edge_offset: i32,
    /// Cells above the surface tile.
    pub height_offset: i32,
}

impl Default for SpawnPointCalculator {
    fn default() -> Self {
        Self {
            edge_offset: 5,
            height_offset: 2,
        }
    }
}

impl SpawnPointCalculator {
    pub fn new(edge_offset: i32, height_offset: i32) -> Self {
        Self {
            edge_offset,
            height_offset,
        }
    }

    /// Returns `None` for an empty profile; there is no center column to use.
    pub fn compute(&self, profile: &ColumnProfile, transform: &GridTransform) -> Option<SpawnPoints> {
        if profile.is_empty() {
            return None;
        }

        let width = profile.width() as i32;
        let at = |x: i32| {
            let y = profile.surface_height(x) + self.height_offset;
            transform.cell_center(TileCoord::new(x, y))
        };

        let enemies = [self.edge_offset, width - 1 - self.edge_offset]
            .into_iter()
            .filter(|&x| profile.contains(x))
            .map(at)
            .collect();

        Some(SpawnPoints {
            player: at(width / 2),
            enemies,
        })
    }
}
