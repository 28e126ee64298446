//! Runtime mutation of a generated grid.
//!
//! Every cell runs a small state machine:
//! `Empty -> Intact -> Damaged(1) -> ... -> Damaged(k-1) -> Empty`,
//! where `k` is the tile's tier count. Health is tracked sparsely: a record
//! exists only for occupied cells that have been hit at least once, and is
//! dropped in the same call that empties or replaces the cell.
//!
//! Operations on empty or out-of-bounds cells are silent no-ops.

use std::collections::HashMap;
use std::sync::Arc;

use bevy::math::Vec2;
use st_core::{GridTransform, TileCoord, TileFlags, TileId, TileRegistry};

use crate::grid::{GridBounds, TileGrid};

/// A mutation that actually changed a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileChange {
    Damaged {
        coord: TileCoord,
        tile: TileId,
        tier: u32,
        health: u32,
    },
    Destroyed {
        coord: TileCoord,
        tile: TileId,
    },
    Placed {
        coord: TileCoord,
        tile: TileId,
    },
}

impl TileChange {
    pub fn coord(&self) -> TileCoord {
        match *self {
            Self::Damaged { coord, .. } | Self::Destroyed { coord, .. } | Self::Placed { coord, .. } => {
                coord
            }
        }
    }
}

/// Visual tier for a tile with `tier_count` tiers at `health`.
///
/// Computed from post-hit health, so the first hit on a multi-tier tile
/// already shows a damaged tier.
pub fn damage_tier(tier_count: u32, health: u32) -> u32 {
    let tiers = tier_count.max(1) as i64;
    (tiers - health as i64).clamp(0, tiers - 1) as u32
}

/// Cells within `radius` (cell space, inclusive) of `center`, restricted to
/// `clip`. The scan never leaves `clip`, so the work is bounded by its area
/// whatever the radius or center.
pub fn cells_in_radius(
    center: TileCoord,
    radius: f32,
    clip: GridBounds,
) -> impl Iterator<Item = TileCoord> {
    let radius = f64::from(radius.max(0.0));
    let extent = radius.ceil() as i64;
    let limit = radius * radius;
    let (cx, cy) = (i64::from(center.x), i64::from(center.y));

    let x_lo = cx.saturating_sub(extent).max(i64::from(clip.x_min));
    let x_hi = cx.saturating_add(extent).min(i64::from(clip.x_max) - 1);
    let y_lo = cy.saturating_sub(extent).max(i64::from(clip.y_min));
    let y_hi = cy.saturating_add(extent).min(i64::from(clip.y_max) - 1);

    (y_lo..=y_hi).flat_map(move |y| {
        let dy = (y - cy) as f64;
        (x_lo..=x_hi)
            .filter(move |&x| {
                let dx = (x - cx) as f64;
                dx * dx + dy * dy <= limit
            })
            .map(move |x| TileCoord::new(x as i32, y as i32))
    })
}

/// The only writer of the grid after generation.
///
/// Every effective mutation is appended to a change journal. The journal is
/// never trimmed on its own: callers that do not forward changes must call
/// [`DestructibleGrid::drain_changes`] periodically.
#[derive(Debug, Clone)]
pub struct DestructibleGrid {
    grid: TileGrid,
    health: HashMap<TileCoord, u32>,
    tiles: Arc<TileRegistry>,
    transform: GridTransform,
    changes: Vec<TileChange>,
}

impl DestructibleGrid {
    pub fn new(tiles: Arc<TileRegistry>, transform: GridTransform) -> Self {
        Self {
            grid: TileGrid::default(),
            health: HashMap::new(),
            tiles,
            transform,
            changes: Vec::new(),
        }
    }

    /// Adopt a freshly generated grid. Health records and pending changes
    /// from the previous world are discarded.
    pub fn replace_grid(&mut self, grid: TileGrid) {
        self.grid = grid;
        self.health.clear();
        self.changes.clear();
    }

    pub fn set_transform(&mut self, transform: GridTransform) {
        self.transform = transform;
    }

    pub fn set_tiles(&mut self, tiles: Arc<TileRegistry>) {
        self.tiles = tiles;
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn tiles(&self) -> &TileRegistry {
        &self.tiles
    }

    pub fn transform(&self) -> &GridTransform {
        &self.transform
    }

    pub fn cell_at(&self, world: Vec2) -> TileCoord {
        self.transform.world_to_cell(world)
    }

    pub fn get_tile(&self, world: Vec2) -> Option<TileId> {
        self.tile_at(self.cell_at(world))
    }

    pub fn tile_at(&self, coord: TileCoord) -> Option<TileId> {
        self.grid.get(coord)
    }

    /// True if the cell at `world` holds a solid tile.
    pub fn is_solid(&self, world: Vec2) -> bool {
        self.get_tile(world)
            .is_some_and(|tile| self.tiles.flags(tile).contains(TileFlags::SOLID))
    }

    /// Recorded health, `None` for empty or never-hit cells.
    pub fn health_at(&self, coord: TileCoord) -> Option<u32> {
        self.health.get(&coord).copied()
    }

    /// Current visual tier of an occupied cell.
    pub fn tier_at(&self, coord: TileCoord) -> Option<u32> {
        let tile = self.grid.get(coord)?;
        if let Some(&health) = self.health.get(&coord) {
            return Some(damage_tier(self.tiles.tier_count(tile), health));
        }
        Some(0)
    }

    pub fn damage_tile(&mut self, world: Vec2, amount: u32) {
        self.damage_cell(self.cell_at(world), amount);
    }

    pub fn damage_cell(&mut self, coord: TileCoord, amount: u32) {
        if amount == 0 {
            return;
        }
        let Some(tile) = self.grid.get(coord) else {
            return;
        };

        let max_health = self.tiles.max_health(tile);
        let health = self.health.entry(coord).or_insert(max_health);
        let remaining = health.saturating_sub(amount);

        if remaining == 0 {
            self.health.remove(&coord);
            self.grid.remove(coord);
            self.changes.push(TileChange::Destroyed { coord, tile });
            return;
        }

        *health = remaining;
        self.changes.push(TileChange::Damaged {
            coord,
            tile,
            tier: damage_tier(self.tiles.tier_count(tile), remaining),
            health: remaining,
        });
    }

    /// Place `tile` into an empty cell. Returns false if the cell is
    /// occupied or outside the grid.
    pub fn place_tile(&mut self, world: Vec2, tile: TileId) -> bool {
        self.place_cell(self.cell_at(world), tile)
    }

    pub fn place_cell(&mut self, coord: TileCoord, tile: TileId) -> bool {
        if !self.grid.set_if_empty(coord, tile) {
            return false;
        }
        self.health.remove(&coord);
        self.changes.push(TileChange::Placed { coord, tile });
        true
    }

    /// Damage every cell within `radius` cells of `center`.
    pub fn area_damage(&mut self, center: Vec2, radius: f32, amount: u32) {
        let clip = self.grid.bounds();
        for coord in cells_in_radius(self.cell_at(center), radius, clip) {
            self.damage_cell(coord, amount);
        }
    }

    /// Empty every cell within `radius` cells of `center`, ignoring health.
    pub fn area_clear(&mut self, center: Vec2, radius: f32) {
        let clip = self.grid.bounds();
        for coord in cells_in_radius(self.cell_at(center), radius, clip) {
            if let Some(tile) = self.grid.remove(coord) {
                self.health.remove(&coord);
                self.changes.push(TileChange::Destroyed { coord, tile });
            }
        }
    }

    /// Point damage for `radius <= 0`, area damage otherwise.
    pub fn destroy_terrain_at(&mut self, world: Vec2, radius: f32, amount: u32) {
        if radius <= 0.0 {
            self.damage_tile(world, amount);
        } else {
            self.area_damage(world, radius, amount);
        }
    }

    pub fn changes(&self) -> &[TileChange] {
        &self.changes
    }

    pub fn drain_changes(&mut self) -> Vec<TileChange> {
        std::mem::take(&mut self.changes)
    }

    /// Number of health records; each belongs to an occupied cell.
    pub fn tracked_cells(&self) -> usize {
        self.health.len()
    }

    #[cfg(test)]
    fn health_records_are_consistent(&self) -> bool {
        self.health.keys().all(|coord| self.grid.is_occupied(*coord))
    }
}
