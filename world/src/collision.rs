//! Footprint collision and stairs detection against the world map.

use isonav_core::{FloorIndex, GridPosition, StairsDirection, TileCoord};
use tracing::warn;

use crate::Floor;

/// Reports whether a square footprint centred at `(x, y)` fits on walkable tiles.
///
/// Each of the four corners is floored to its containing tile independently;
/// the position is walkable only when every corner lands inside the floor on
/// a grass tile. Footprints up to one tile wide cover every tile they touch
/// with their corners, so shrinking such a footprint never blocks a walkable
/// position; wider footprints can straddle a blocked tile unnoticed.
pub(crate) fn is_walkable(floor: Option<&Floor>, x: f32, y: f32, footprint: f32) -> bool {
    let Some(floor) = floor else {
        return false;
    };

    let half = footprint / 2.0;
    let corners = [
        (x - half, y - half),
        (x + half, y - half),
        (x - half, y + half),
        (x + half, y + half),
    ];

    corners.into_iter().all(|(corner_x, corner_y)| {
        TileCoord::containing(corner_x, corner_y)
            .and_then(|tile| floor.tile(tile))
            .is_some_and(|tile| tile.is_walkable())
    })
}

/// Locates the first grass tile inside the outer ring, scanning rows top to bottom.
///
/// Falls back to tile `(1, 1)` with a warning when the floor has no interior
/// grass or does not exist.
pub(crate) fn find_first_walkable_tile(
    floor: Option<&Floor>,
    floor_index: FloorIndex,
) -> GridPosition {
    let found = floor.and_then(|floor| {
        let last_row = floor.rows().saturating_sub(1);
        let last_column = floor.columns().saturating_sub(1);
        (1..last_row)
            .flat_map(|row| (1..last_column).map(move |column| TileCoord::new(column, row)))
            .find(|tile| floor.tile(*tile).is_some_and(|tile| tile.is_walkable()))
    });

    match found {
        Some(tile) => GridPosition::centered_in(tile, floor_index),
        None => {
            warn!(
                floor = floor_index.get(),
                "no walkable interior tile found; falling back to tile (1, 1)"
            );
            GridPosition::centered_in(TileCoord::new(1, 1), floor_index)
        }
    }
}

/// Stairs direction of the tile containing `(x, y)`.
///
/// Returns [`StairsDirection::Level`] when the tile has no stairs or lies out of bounds.
pub(crate) fn check_for_stairs(floor: Option<&Floor>, x: f32, y: f32) -> StairsDirection {
    floor
        .zip(TileCoord::containing(x, y))
        .and_then(|(floor, tile)| floor.tile(tile))
        .map_or(StairsDirection::Level, |tile| tile.stairs())
}
