use std::collections::HashMap;

use st_core::{TileCoord, TileId};

/// Half-open cell rectangle `[x_min, x_max) × [y_min, y_max)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridBounds {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl GridBounds {
    pub const EMPTY: Self = Self {
        x_min: 0,
        y_min: 0,
        x_max: 0,
        y_max: 0,
    };

    pub const fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Oversized region around a world of `world_width` columns:
    /// `[-w, 2w) × [-2·depth, 2·depth)`, grown to cover `[y_low, y_high]`.
    pub fn oversized(world_width: i32, depth: i32, y_low: i32, y_high: i32) -> Self {
        Self {
            x_min: -world_width,
            x_max: 2 * world_width,
            y_min: (-2 * depth).min(y_low),
            y_max: (2 * depth).max(y_high + 1),
        }
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        (self.x_min..self.x_max).contains(&coord.x) && (self.y_min..self.y_max).contains(&coord.y)
    }

    pub fn width(&self) -> i32 {
        (self.x_max - self.x_min).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y_max - self.y_min).max(0)
    }
}

/// Sparse 2D tile storage. Cells outside `bounds` can never be written.
#[derive(Clone, Debug, Default)]
pub struct TileGrid {
    cells: HashMap<TileCoord, TileId>,
    bounds: GridBounds,
}

impl TileGrid {
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            cells: HashMap::new(),
            bounds,
        }
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn get(&self, coord: TileCoord) -> Option<TileId> {
        self.cells.get(&coord).copied()
    }

    pub fn is_occupied(&self, coord: TileCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Write a tile. Returns false (and writes nothing) outside the bounds.
    pub fn set(&mut self, coord: TileCoord, tile: TileId) -> bool {
        if !self.bounds.contains(coord) {
            return false;
        }
        self.cells.insert(coord, tile);
        true
    }

    /// Write a tile only if the cell is empty.
    pub fn set_if_empty(&mut self, coord: TileCoord, tile: TileId) -> bool {
        if self.is_occupied(coord) {
            return false;
        }
        self.set(coord, tile)
    }

    pub fn remove(&mut self, coord: TileCoord) -> Option<TileId> {
        self.cells.remove(&coord)
    }

    /// Empty every cell inside `region`.
    pub fn clear_region(&mut self, region: GridBounds) {
        self.cells.retain(|coord, _| !region.contains(*coord));
    }

    /// Drop every cell and adopt new bounds.
    pub fn reset(&mut self, bounds: GridBounds) {
        self.cells.clear();
        self.bounds = bounds;
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, TileId)> + '_ {
        self.cells.iter().map(|(&coord, &tile)| (coord, tile))
    }

    /// Occupied cells of column `x`, top to bottom.
    pub fn column(&self, x: i32) -> Vec<(i32, TileId)> {
        let mut cells: Vec<_> = self
            .cells
            .iter()
            .filter(|(coord, _)| coord.x == x)
            .map(|(coord, &tile)| (coord.y, tile))
            .collect();
        cells.sort_by(|a, b| b.0.cmp(&a.0));
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_outside_bounds_are_ignored() {
        let mut grid = TileGrid::new(GridBounds::new(0, 0, 4, 4));
        assert!(!grid.set(TileCoord::new(4, 0), TileId(1)));
        assert!(!grid.set(TileCoord::new(0, -1), TileId(1)));
        assert!(grid.set(TileCoord::new(3, 3), TileId(1)));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn set_if_empty_keeps_existing() {
        let mut grid = TileGrid::new(GridBounds::new(0, 0, 4, 4));
        let coord = TileCoord::new(1, 1);
        assert!(grid.set_if_empty(coord, TileId(1)));
        assert!(!grid.set_if_empty(coord, TileId(2)));
        assert_eq!(grid.get(coord), Some(TileId(1)));
    }

    #[test]
    fn oversized_covers_required_region() {
        let bounds = GridBounds::oversized(10, 5, -5, 8);
        assert_eq!(bounds, GridBounds::new(-10, -10, 20, 10));
        let tall = GridBounds::oversized(10, 5, -5, 30);
        assert_eq!(tall.y_max, 31);
    }

    #[test]
    fn clear_region_only_touches_region() {
        let mut grid = TileGrid::new(GridBounds::new(-8, -8, 8, 8));
        grid.set(TileCoord::new(-5, 0), TileId(0));
        grid.set(TileCoord::new(5, 0), TileId(0));
        grid.clear_region(GridBounds::new(0, -8, 8, 8));
        assert!(grid.is_occupied(TileCoord::new(-5, 0)));
        assert!(!grid.is_occupied(TileCoord::new(5, 0)));
    }

    #[test]
    fn column_is_sorted_top_down() {
        let mut grid = TileGrid::new(GridBounds::new(0, -4, 2, 4));
        grid.set(TileCoord::new(0, -2), TileId(2));
        grid.set(TileCoord::new(0, 1), TileId(0));
        grid.set(TileCoord::new(1, 0), TileId(9));
        assert_eq!(grid.column(0), vec![(1, TileId(0)), (-2, TileId(2))]);
    }
}
