#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative multi-floor world map for the isometric navigation core.
//!
//! The [`World`] owns every floor of the building together with the floor
//! visibility bookkeeping. Mutations are routed through [`apply`] (or the
//! equivalent convenience methods on [`World`]); reads go through [`query`].

mod collision;
mod document;
mod floor;
mod visibility;

use isonav_core::{Command, Event, FloorIndex, StairsDirection, Tile, TileCoord, TileKind};
use thiserror::Error;
use tracing::{debug, warn};

pub use document::{MapDocument, TileRecord};
pub use floor::{Floor, FloorError};
pub use visibility::{FloorVisibility, LayerVisibility};

/// Ground floor of the built-in demo building.
pub const DEMO_GROUND_FLOOR: [&str; 20] = [
    "####################",
    "#.....#.......#....#",
    "#.....#.......#....#",
    "#..##.#..###..#....#",
    "#..#.....#.........#",
    "#..#.....#......~~.#",
    "#..#..####......~~.#",
    "#......^...........#",
    "#...........###....#",
    "#..~~~......#......#",
    "#..~~~......#......#",
    "#..~~~......#....#.#",
    "#................#.#",
    "#.......#........#.#",
    "#.......#..........#",
    "#..###..###........#",
    "#..................#",
    "#..................#",
    "#..................#",
    "####################",
];

/// Upper floor of the built-in demo building, reached by the stairs at (7, 7).
pub const DEMO_UPPER_FLOOR: [&str; 20] = [
    "####################",
    "####################",
    "####################",
    "####################",
    "####################",
    "#####........#######",
    "#####........#######",
    "#####..v.....#######",
    "#####........#######",
    "#####........#######",
    "#####........#######",
    "####################",
    "####################",
    "####################",
    "####################",
    "####################",
    "####################",
    "####################",
    "####################",
    "####################",
];

/// Represents the authoritative world map.
#[derive(Clone, Debug)]
pub struct World {
    floors: Vec<Floor>,
    visibility: FloorVisibility,
}

impl World {
    /// Assembles a world from floors, validating cross-floor invariants.
    ///
    /// Every floor must match the dimensions of floor zero and every stairs
    /// tile must be answered by a stairs tile with the opposite direction at
    /// the same coordinate on the connected floor.
    pub fn from_floors(floors: Vec<Floor>) -> Result<Self, MapError> {
        let Some(ground) = floors.first() else {
            return Err(MapError::EmptyWorld);
        };

        let expected = (ground.columns(), ground.rows());
        for (index, floor) in floors.iter().enumerate() {
            let found = (floor.columns(), floor.rows());
            if found != expected {
                return Err(MapError::MismatchedFloorSize {
                    floor: index,
                    expected,
                    found,
                });
            }
        }

        let world = Self::assemble(floors);
        world.validate_stairs()?;
        Ok(world)
    }

    /// Loads a world from a structured map document.
    pub fn from_document(document: &MapDocument) -> Result<Self, MapError> {
        Self::from_floors(document.to_floors()?)
    }

    /// Loads a world from a JSON map document.
    pub fn from_json(text: &str) -> Result<Self, MapError> {
        Self::from_document(&MapDocument::from_json(text)?)
    }

    /// Builds the two-storey demo building.
    pub fn demo() -> Result<Self, MapError> {
        let layouts: [&[&str]; 2] = [&DEMO_GROUND_FLOOR, &DEMO_UPPER_FLOOR];
        let floors = layouts
            .into_iter()
            .enumerate()
            .map(|(index, layout)| {
                Floor::from_layout(layout).map_err(|source| MapError::Floor {
                    floor: index,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_floors(floors)
    }

    /// Captures the world as a structured map document.
    #[must_use]
    pub fn to_document(&self) -> MapDocument {
        MapDocument::capture(&self.floors)
    }

    /// Writes a stairs pair linking `from` and `to` at the same tile.
    ///
    /// Returns `false` without mutating anything when either floor or the
    /// tile is out of bounds, when the floors are not adjacent, or when either
    /// end of the tile already carries stairs.
    pub fn set_stairs(&mut self, from: FloorIndex, to: FloorIndex, tile: TileCoord) -> bool {
        let mut events = Vec::new();
        apply(self, Command::PlaceStairs { from, to, tile }, &mut events);
        matches!(events.as_slice(), [Event::StairsPlaced { .. }])
    }

    /// Appends a floor on top of the building and returns its index.
    ///
    /// Without a template the new floor is entirely wall. A template whose
    /// dimensions differ from the existing floors, or whose stairs are not
    /// answered by the floor below, is replaced by an all-wall floor.
    pub fn append_floor(&mut self, template: Option<Floor>) -> FloorIndex {
        let floor = match template {
            Some(template) if !self.accepts(&template) => {
                warn!(
                    columns = template.columns(),
                    rows = template.rows(),
                    "floor template does not match the building footprint; appending walls"
                );
                self.filled_floor(TileKind::Wall)
            }
            Some(template) if !self.stairs_fit(&template) => {
                warn!("floor template carries unpaired stairs; appending walls");
                self.filled_floor(TileKind::Wall)
            }
            Some(template) => template,
            None => self.filled_floor(TileKind::Wall),
        };
        self.push_floor(floor)
    }

    /// Makes `target` the active floor, updating floor visibility.
    ///
    /// Returns `false` when the floor does not exist.
    pub fn change_floor(&mut self, target: FloorIndex) -> bool {
        let mut events = Vec::new();
        apply(self, Command::ChangeFloor { target }, &mut events);
        matches!(events.as_slice(), [Event::FloorChanged { .. }])
    }

    fn assemble(floors: Vec<Floor>) -> Self {
        let visibility = FloorVisibility::new(floors.len());
        Self { floors, visibility }
    }

    fn floor(&self, floor: FloorIndex) -> Option<&Floor> {
        self.floors.get(floor.as_usize())
    }

    fn floor_mut(&mut self, floor: FloorIndex) -> Option<&mut Floor> {
        self.floors.get_mut(floor.as_usize())
    }

    fn dimensions(&self) -> (u32, u32) {
        self.floors
            .first()
            .map_or((0, 0), |floor| (floor.columns(), floor.rows()))
    }

    fn accepts(&self, floor: &Floor) -> bool {
        self.floors.is_empty() || (floor.columns(), floor.rows()) == self.dimensions()
    }

    fn filled_floor(&self, kind: TileKind) -> Floor {
        let (columns, rows) = self.dimensions();
        Floor::filled(columns, rows, Tile::plain(kind))
    }

    fn next_index(&self) -> FloorIndex {
        FloorIndex::new(u32::try_from(self.floors.len()).unwrap_or(u32::MAX))
    }

    fn stairs_fit(&self, template: &Floor) -> bool {
        let index = self.next_index();
        template.iter().all(|(tile, value)| {
            let direction = value.stairs();
            direction.is_level() || self.stairs_answered(index, tile, direction)
        })
    }

    fn push_floor(&mut self, floor: Floor) -> FloorIndex {
        let index = self.next_index();
        self.floors.push(floor);
        self.visibility.set_floor_count(self.floors.len());
        index
    }

    fn place_stairs(&mut self, from: FloorIndex, to: FloorIndex, tile: TileCoord) -> bool {
        if from.get().abs_diff(to.get()) != 1 {
            return false;
        }
        let direction = StairsDirection::between(from, to);

        let free = [from, to].into_iter().all(|floor| {
            self.floor(floor)
                .and_then(|floor| floor.tile(tile))
                .is_some_and(|value| !value.has_stairs())
        });
        if !free {
            return false;
        }

        let ends = [(from, direction), (to, direction.opposite())];
        for (floor, direction) in ends {
            if let Some(floor) = self.floor_mut(floor) {
                let written = floor.set(tile, Tile::staircase(direction));
                debug_assert!(written, "stairs tile was bounds-checked");
            }
        }
        true
    }

    fn validate_stairs(&self) -> Result<(), MapError> {
        for (index, floor) in self.floors.iter().enumerate() {
            let floor_index = FloorIndex::new(u32::try_from(index).unwrap_or(u32::MAX));
            for (tile, value) in floor.iter() {
                let direction = value.stairs();
                if direction.is_level() {
                    continue;
                }
                if !self.stairs_answered(floor_index, tile, direction) {
                    return Err(MapError::UnpairedStairs {
                        floor: floor_index.get(),
                        column: tile.column(),
                        row: tile.row(),
                    });
                }
            }
        }
        Ok(())
    }

    fn stairs_answered(
        &self,
        origin: FloorIndex,
        tile: TileCoord,
        direction: StairsDirection,
    ) -> bool {
        origin
            .step(direction)
            .and_then(|partner| self.floor(partner))
            .and_then(|floor| floor.tile(tile))
            .is_some_and(|partner| partner.stairs() == direction.opposite())
    }
}

/// Applies the provided command to the world, reporting the outcome as events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceStairs { from, to, tile } => {
            if world.place_stairs(from, to, tile) {
                debug!(
                    from = from.get(),
                    to = to.get(),
                    column = tile.column(),
                    row = tile.row(),
                    "stairs placed"
                );
                out_events.push(Event::StairsPlaced { from, to, tile });
            } else {
                out_events.push(Event::StairsRejected { from, to, tile });
            }
        }
        Command::AppendFloor { fill } => {
            let floor = world.filled_floor(fill);
            let index = world.push_floor(floor);
            debug!(floor = index.get(), ?fill, "floor appended");
            out_events.push(Event::FloorAppended { floor: index });
        }
        Command::ChangeFloor { target } => {
            let from = world.visibility.active();
            if target.as_usize() < world.floors.len() {
                world.visibility.activate(target);
                debug!(from = from.get(), to = target.get(), "active floor changed");
                out_events.push(Event::FloorChanged { from, to: target });
            } else {
                out_events.push(Event::FloorChangeRejected { target });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use isonav_core::{FloorIndex, GridPosition, StairsDirection, Tile, TileCoord};

    use super::{collision, Floor, FloorVisibility, OutOfBounds, World};

    /// Retrieves the tile stored at the coordinate on the provided floor.
    pub fn tile_at(
        world: &World,
        floor: FloorIndex,
        tile: TileCoord,
    ) -> Result<Tile, OutOfBounds> {
        world
            .floor(floor)
            .and_then(|grid| grid.tile(tile))
            .ok_or(OutOfBounds { floor, tile })
    }

    /// Number of floors in the building.
    #[must_use]
    pub fn floor_count(world: &World) -> usize {
        world.floors.len()
    }

    /// Provides read-only access to a single floor.
    #[must_use]
    pub fn floor(world: &World, floor: FloorIndex) -> Option<&Floor> {
        world.floor(floor)
    }

    /// Iterates every floor in ascending order.
    pub fn floors(world: &World) -> impl Iterator<Item = (FloorIndex, &Floor)> {
        world
            .floors
            .iter()
            .zip(0u32..)
            .map(|(floor, index)| (FloorIndex::new(index), floor))
    }

    /// Width and height shared by every floor.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.dimensions()
    }

    /// Reports whether a square footprint of side `footprint` centred at
    /// `(x, y)` rests entirely on walkable tiles of `floor`.
    ///
    /// Only the four corners are tested, which is exact for footprints no
    /// wider than one tile.
    #[must_use]
    pub fn is_walkable(world: &World, x: f32, y: f32, floor: FloorIndex, footprint: f32) -> bool {
        collision::is_walkable(world.floor(floor), x, y, footprint)
    }

    /// Centre of the first walkable interior tile of `floor`.
    #[must_use]
    pub fn find_first_walkable_tile(world: &World, floor: FloorIndex) -> GridPosition {
        collision::find_first_walkable_tile(world.floor(floor), floor)
    }

    /// Stairs direction of the tile containing `(x, y)` on `floor`.
    #[must_use]
    pub fn check_for_stairs(world: &World, x: f32, y: f32, floor: FloorIndex) -> StairsDirection {
        collision::check_for_stairs(world.floor(floor), x, y)
    }

    /// Floor currently marked active.
    #[must_use]
    pub fn active_floor(world: &World) -> FloorIndex {
        world.visibility.active()
    }

    /// Snapshot of the floor visibility bookkeeping.
    #[must_use]
    pub fn floor_visibility(world: &World) -> FloorVisibility {
        world.visibility
    }
}

/// Raised when a tile lookup falls outside the stored extents.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error(
    "tile ({}, {}) on floor {} lies outside the world map",
    .tile.column(),
    .tile.row(),
    .floor.get()
)]
pub struct OutOfBounds {
    /// Floor provided to the lookup.
    pub floor: FloorIndex,
    /// Tile provided to the lookup.
    pub tile: TileCoord,
}

/// Errors raised while loading or assembling a world map.
#[derive(Debug, Error)]
pub enum MapError {
    /// The map contains no floors.
    #[error("world map contains no floors")]
    EmptyWorld,
    /// A floor failed shape validation.
    #[error("floor {floor} is malformed")]
    Floor {
        /// Zero-based index of the offending floor.
        floor: usize,
        /// Underlying shape error.
        #[source]
        source: FloorError,
    },
    /// A floor differs in size from floor zero.
    #[error("floor {floor} is {found:?} tiles, expected {expected:?}")]
    MismatchedFloorSize {
        /// Zero-based index of the offending floor.
        floor: usize,
        /// Columns and rows of floor zero.
        expected: (u32, u32),
        /// Columns and rows of the offending floor.
        found: (u32, u32),
    },
    /// A stairs tile has no opposite stairs on the floor it leads to.
    #[error("stairs on floor {floor} at ({column}, {row}) lead nowhere")]
    UnpairedStairs {
        /// Floor holding the unpaired stairs.
        floor: u32,
        /// Column of the stairs tile.
        column: u32,
        /// Row of the stairs tile.
        row: u32,
    },
    /// A document used a tile code outside `0..=2`.
    #[error("unknown tile code {code}")]
    UnknownTileCode {
        /// Code that failed to decode.
        code: u8,
    },
    /// The document is not valid JSON for the map schema.
    #[error("invalid map document")]
    Json(#[from] serde_json::Error),
}
