//! Isometric projection between grid space and screen space.
//!
//! Every conversion between logical tile units and screen pixels routes
//! through [`TileGeometry`], so changing the tile constants requires no logic
//! change elsewhere.

use serde::{Deserialize, Serialize};

use crate::{FloorIndex, TileCoord};

/// Screen-space position measured in pixels after the diamond projection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal pixel coordinate.
    pub x: f32,
    /// Vertical pixel coordinate, growing downward.
    pub y: f32,
}

impl ScreenPoint {
    /// Creates a new screen point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Integer tile indices resolved from a screen position.
///
/// Indices may be negative or exceed the map; callers bounds-check via
/// [`GridCell::to_tile`] and the world map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl GridCell {
    /// Converts the cell into a tile coordinate when both indices are non-negative.
    #[must_use]
    pub fn to_tile(self) -> Option<TileCoord> {
        let column = u32::try_from(self.x).ok()?;
        let row = u32::try_from(self.y).ok()?;
        Some(TileCoord::new(column, row))
    }
}

/// Fixed tile dimensions shared by every consumer of the projection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileGeometry {
    /// Width of the tile diamond in pixels.
    pub tile_width: f32,
    /// Height of the tile diamond in pixels.
    pub tile_height: f32,
    /// Visual thickness of a floor slab in pixels.
    pub tile_depth: f32,
    /// Extra spacing inserted between stacked floors in pixels.
    pub floor_gap: f32,
}

impl TileGeometry {
    /// Geometry used by the reference tile art.
    pub const DEFAULT: Self = Self {
        tile_width: 64.0,
        tile_height: 32.0,
        tile_depth: 32.0,
        floor_gap: 5.0,
    };

    fn half_width(&self) -> f32 {
        self.tile_width / 2.0
    }

    fn half_height(&self) -> f32 {
        self.tile_height / 2.0
    }

    /// Projects a continuous grid position onto the screen.
    #[must_use]
    pub fn grid_to_screen(&self, x: f32, y: f32) -> ScreenPoint {
        ScreenPoint::new(
            (x - y) * self.half_width(),
            (x + y) * self.half_height(),
        )
    }

    /// Resolves the tile under a screen position.
    ///
    /// Both axes are floored to integer tile indices, so this is only an exact
    /// inverse of [`TileGeometry::grid_to_screen`] at integer grid positions.
    #[must_use]
    pub fn screen_to_grid(&self, screen: ScreenPoint) -> GridCell {
        let across = screen.x / self.half_width();
        let down = screen.y / self.half_height();
        GridCell {
            x: ((across + down) / 2.0).floor() as i32,
            y: ((down - across) / 2.0).floor() as i32,
        }
    }

    /// Vertical lift applied when drawing the provided floor.
    #[must_use]
    pub fn floor_offset(&self, floor: FloorIndex) -> f32 {
        floor.get() as f32 * (self.tile_depth + self.floor_gap)
    }

    /// Screen position of a grid point drawn on the provided floor.
    #[must_use]
    pub fn lifted(&self, x: f32, y: f32, floor: FloorIndex) -> ScreenPoint {
        let base = self.grid_to_screen(x, y);
        ScreenPoint::new(base.x, base.y - self.floor_offset(floor))
    }

    /// Inverse of [`TileGeometry::lifted`] at integer tile positions.
    #[must_use]
    pub fn unlifted(&self, screen: ScreenPoint, floor: FloorIndex) -> GridCell {
        self.screen_to_grid(ScreenPoint::new(
            screen.x,
            screen.y + self.floor_offset(floor),
        ))
    }
}

impl Default for TileGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}
