use bevy::math::Vec2;

/// Global tile position in cell-space coordinates.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug, Default)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this coordinate by a cell delta, saturating at the `i32` range.
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Squared cell-space distance to another coordinate.
    pub fn distance_squared(&self, other: TileCoord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

/// Fixed affine map between cell space and world space.
///
/// Cell `(x, y)` covers the world rectangle
/// `origin + (x, y) * cell_size .. origin + (x + 1, y + 1) * cell_size`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridTransform {
    /// World position of the bottom-left corner of cell (0, 0).
    pub origin: Vec2,
    /// World units per cell side.
    pub cell_size: f32,
}

impl Default for GridTransform {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            cell_size: 1.0,
        }
    }
}

impl GridTransform {
    pub const fn new(origin: Vec2, cell_size: f32) -> Self {
        Self { origin, cell_size }
    }

    /// Resolve the cell containing a world position.
    pub fn world_to_cell(&self, world: Vec2) -> TileCoord {
        let local = (world - self.origin) / self.cell_size;
        TileCoord::new(local.x.floor() as i32, local.y.floor() as i32)
    }

    /// World position of a cell's bottom-left corner.
    pub fn cell_to_world(&self, coord: TileCoord) -> Vec2 {
        self.origin + Vec2::new(coord.x as f32, coord.y as f32) * self.cell_size
    }

    /// World position of a cell's center.
    pub fn cell_center(&self, coord: TileCoord) -> Vec2 {
        self.cell_to_world(coord) + Vec2::splat(self.cell_size * 0.5)
    }
}
