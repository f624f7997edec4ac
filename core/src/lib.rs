#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the isometric navigation engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired map mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing the
//! outcome. The player navigation system consumes per-step [`InputIntent`]
//! snapshots, queries the world, and reports what happened through the same
//! event stream.

mod config;
pub mod projection;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, NavigationConfig};
pub use projection::{GridCell, ScreenPoint, TileGeometry};

/// Side length of the player's collision square measured in grid units.
pub const DEFAULT_FOOTPRINT: f32 = 0.5;

/// Grid units travelled along each requested axis per simulation step.
pub const DEFAULT_PLAYER_SPEED: f32 = 0.1;

/// Number of steps that must elapse before another stairs interaction.
pub const DEFAULT_INTERACTION_COOLDOWN: u32 = 30;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Places a stairs pair linking two floors at the same tile.
    PlaceStairs {
        /// Floor the stairs start from.
        from: FloorIndex,
        /// Floor the stairs lead to.
        to: FloorIndex,
        /// Tile that receives the stairs on both floors.
        tile: TileCoord,
    },
    /// Appends a new floor uniformly filled with the provided tile kind.
    AppendFloor {
        /// Kind assigned to every tile of the new floor.
        fill: TileKind,
    },
    /// Requests that the provided floor become the active floor.
    ChangeFloor {
        /// Floor that should become active.
        target: FloorIndex,
    },
}

/// Events broadcast by the world and systems after processing commands and input.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a stairs pair was written to both floors.
    StairsPlaced {
        /// Floor whose tile now leads toward `to`.
        from: FloorIndex,
        /// Floor whose tile now leads back toward `from`.
        to: FloorIndex,
        /// Tile shared by both ends of the stairs.
        tile: TileCoord,
    },
    /// Reports that a stairs placement request was rejected.
    StairsRejected {
        /// Floor provided as the stairs origin.
        from: FloorIndex,
        /// Floor provided as the stairs destination.
        to: FloorIndex,
        /// Tile provided in the placement request.
        tile: TileCoord,
    },
    /// Confirms that a floor was appended on top of the building.
    FloorAppended {
        /// Index assigned to the new floor.
        floor: FloorIndex,
    },
    /// Announces that the active floor changed.
    FloorChanged {
        /// Floor that was active before the change.
        from: FloorIndex,
        /// Floor that is active after the change.
        to: FloorIndex,
    },
    /// Reports that a floor change targeted a floor that does not exist.
    FloorChangeRejected {
        /// Floor requested by the caller.
        target: FloorIndex,
    },
    /// Confirms that the player committed a move.
    PlayerMoved {
        /// Position occupied before the step.
        from: GridPosition,
        /// Position occupied after the step.
        to: GridPosition,
    },
    /// Reports that the player's requested move was not walkable.
    PlayerBlocked {
        /// Position the player remains at.
        at: GridPosition,
        /// Movement that was rejected.
        attempted: MoveVector,
    },
    /// Confirms that the player used stairs to reach another floor.
    PlayerChangedFloor {
        /// Floor the player left.
        from: FloorIndex,
        /// Floor the player arrived on.
        to: FloorIndex,
    },
}

/// Material occupying a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open ground; the only walkable kind.
    Grass,
    /// Solid wall.
    Wall,
    /// Impassable water.
    Water,
}

impl TileKind {
    /// Reports whether the player may stand on tiles of this kind.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Grass)
    }

    /// Numeric code used by map documents.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Grass => 0,
            Self::Wall => 1,
            Self::Water => 2,
        }
    }

    /// Resolves a map document code into a tile kind.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Grass),
            1 => Some(Self::Wall),
            2 => Some(Self::Water),
            _ => None,
        }
    }
}

/// Signed indicator linking a stairs tile to the floor above or below.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum StairsDirection {
    /// Leads to the floor below.
    Down,
    /// No vertical connection.
    #[default]
    Level,
    /// Leads to the floor above.
    Up,
}

impl StairsDirection {
    /// Signed representation: `-1`, `0` or `1`.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Down => -1,
            Self::Level => 0,
            Self::Up => 1,
        }
    }

    /// Resolves a signed value into a direction.
    #[must_use]
    pub const fn from_sign(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Self::Down),
            0 => Some(Self::Level),
            1 => Some(Self::Up),
            _ => None,
        }
    }

    /// Direction of travel from one floor toward another.
    #[must_use]
    pub fn between(from: FloorIndex, to: FloorIndex) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Self::Up,
            std::cmp::Ordering::Equal => Self::Level,
            std::cmp::Ordering::Less => Self::Down,
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Level => Self::Level,
            Self::Up => Self::Down,
        }
    }

    /// Reports whether the direction connects to another floor.
    #[must_use]
    pub const fn is_level(self) -> bool {
        matches!(self, Self::Level)
    }
}

impl From<StairsDirection> for i8 {
    fn from(direction: StairsDirection) -> Self {
        direction.sign()
    }
}

impl TryFrom<i8> for StairsDirection {
    type Error = InvalidStairsDirection;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Self::from_sign(value).ok_or(InvalidStairsDirection { value })
    }
}

/// Raised when a stairs direction outside `-1..=1` is decoded.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("stairs direction must be -1, 0 or 1 (received {value})")]
pub struct InvalidStairsDirection {
    /// Value that failed validation.
    pub value: i8,
}

/// Tagged record describing a single tile of a floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    kind: TileKind,
    has_stairs: bool,
    stairs_direction: StairsDirection,
}

impl Tile {
    /// Walkable ground without stairs.
    pub const GRASS: Self = Self::plain(TileKind::Grass);
    /// Solid wall.
    pub const WALL: Self = Self::plain(TileKind::Wall);
    /// Impassable water.
    pub const WATER: Self = Self::plain(TileKind::Water);

    /// Creates a tile from its raw fields.
    #[must_use]
    pub const fn new(kind: TileKind, has_stairs: bool, stairs_direction: StairsDirection) -> Self {
        Self {
            kind,
            has_stairs,
            stairs_direction,
        }
    }

    /// Creates a tile of the provided kind without stairs.
    #[must_use]
    pub const fn plain(kind: TileKind) -> Self {
        Self::new(kind, false, StairsDirection::Level)
    }

    /// Creates a walkable stairs tile leading in the provided direction.
    #[must_use]
    pub const fn staircase(direction: StairsDirection) -> Self {
        Self::new(TileKind::Grass, true, direction)
    }

    /// Material occupying the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Whether the tile carries stairs.
    #[must_use]
    pub const fn has_stairs(&self) -> bool {
        self.has_stairs
    }

    /// Stored stairs direction, regardless of [`Tile::has_stairs`].
    #[must_use]
    pub const fn stairs_direction(&self) -> StairsDirection {
        self.stairs_direction
    }

    /// Effective stairs direction; [`StairsDirection::Level`] when the tile has no stairs.
    #[must_use]
    pub const fn stairs(&self) -> StairsDirection {
        if self.has_stairs {
            self.stairs_direction
        } else {
            StairsDirection::Level
        }
    }

    /// Reports whether the player may stand on the tile.
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        self.kind.is_walkable()
    }
}

/// Index of a floor within the building; floor zero is ground level.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FloorIndex(u32);

impl FloorIndex {
    /// Ground level.
    pub const GROUND: Self = Self(0);

    /// Creates a new floor index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric floor index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Floor index as a container offset.
    #[must_use]
    pub fn as_usize(&self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }

    /// Floor reached by following stairs in the provided direction.
    ///
    /// Returns `None` when the result would lie below ground level.
    #[must_use]
    pub fn step(self, direction: StairsDirection) -> Option<Self> {
        self.0
            .checked_add_signed(i32::from(direction.sign()))
            .map(Self)
    }
}

/// Location of a single tile expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index (the grid `x`).
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index (the grid `y`).
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Tile containing the continuous grid point, flooring both axes.
    ///
    /// Returns `None` when either axis floors to a negative index or is not finite.
    #[must_use]
    pub fn containing(x: f32, y: f32) -> Option<Self> {
        Some(Self::new(floor_index(x)?, floor_index(y)?))
    }

    /// Centre of the tile in continuous grid units.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.column as f32 + 0.5, self.row as f32 + 0.5)
    }
}

fn floor_index(value: f32) -> Option<u32> {
    if !value.is_finite() {
        return None;
    }
    let floored = value.floor();
    if floored < 0.0 || floored > u32::MAX as f32 {
        return None;
    }
    Some(floored as u32)
}

/// Continuous grid position with sub-tile precision on a specific floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPosition {
    /// Column axis; the integer part selects the tile.
    pub x: f32,
    /// Row axis; the integer part selects the tile.
    pub y: f32,
    /// Floor the position lies on.
    pub floor: FloorIndex,
}

impl GridPosition {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: f32, y: f32, floor: FloorIndex) -> Self {
        Self { x, y, floor }
    }

    /// Position centred within the provided tile.
    #[must_use]
    pub fn centered_in(tile: TileCoord, floor: FloorIndex) -> Self {
        let (x, y) = tile.center();
        Self::new(x, y, floor)
    }

    /// Tile containing the position, if it lies at non-negative indices.
    #[must_use]
    pub fn tile(&self) -> Option<TileCoord> {
        TileCoord::containing(self.x, self.y)
    }

    /// Same horizontal location on another floor.
    #[must_use]
    pub const fn on_floor(self, floor: FloorIndex) -> Self {
        Self::new(self.x, self.y, floor)
    }

    /// Position displaced by the movement vector scaled by `speed`.
    #[must_use]
    pub fn stepped(self, vector: MoveVector, speed: f32) -> Self {
        Self::new(
            self.x + f32::from(vector.dx()) * speed,
            self.y + f32::from(vector.dy()) * speed,
            self.floor,
        )
    }
}

/// Cardinal directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Reports whether the direction moves along the row axis.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// Per-axis unit movement requested for a single step.
///
/// Each component is `-1`, `0` or `1`. Both components may be set, in which
/// case both axes advance by the full step speed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveVector {
    dx: i8,
    dy: i8,
}

impl MoveVector {
    /// No movement.
    pub const ZERO: Self = Self { dx: 0, dy: 0 };

    /// Combines optional horizontal and vertical directions into a vector.
    ///
    /// Directions on the wrong axis are ignored.
    #[must_use]
    pub const fn from_axes(horizontal: Option<Direction>, vertical: Option<Direction>) -> Self {
        let dx = match horizontal {
            Some(Direction::East) => 1,
            Some(Direction::West) => -1,
            _ => 0,
        };
        let dy = match vertical {
            Some(Direction::South) => 1,
            Some(Direction::North) => -1,
            _ => 0,
        };
        Self { dx, dy }
    }

    /// Vector for a single cardinal direction.
    #[must_use]
    pub const fn from_direction(direction: Direction) -> Self {
        if direction.is_vertical() {
            Self::from_axes(None, Some(direction))
        } else {
            Self::from_axes(Some(direction), None)
        }
    }

    /// Column-axis component.
    #[must_use]
    pub const fn dx(&self) -> i8 {
        self.dx
    }

    /// Row-axis component.
    #[must_use]
    pub const fn dy(&self) -> i8 {
        self.dy
    }

    /// Reports whether the vector requests no movement.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Facing implied by the vector; the vertical axis wins when both are set.
    #[must_use]
    pub const fn facing(&self) -> Option<Direction> {
        match (self.dx, self.dy) {
            (_, dy) if dy < 0 => Some(Direction::North),
            (_, dy) if dy > 0 => Some(Direction::South),
            (dx, _) if dx > 0 => Some(Direction::East),
            (dx, _) if dx < 0 => Some(Direction::West),
            _ => None,
        }
    }
}

impl From<Option<Direction>> for MoveVector {
    fn from(direction: Option<Direction>) -> Self {
        direction.map_or(Self::ZERO, Self::from_direction)
    }
}

/// Normalized per-step input snapshot consumed by the navigation system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputIntent {
    /// Single cardinal direction requested this step, if any.
    pub move_dir: Option<Direction>,
    /// Whether the player requested a stairs interaction.
    pub interact: bool,
}

impl InputIntent {
    /// Intent that requests nothing.
    pub const IDLE: Self = Self {
        move_dir: None,
        interact: false,
    };

    /// Intent that moves in the provided direction.
    #[must_use]
    pub const fn moving(direction: Direction) -> Self {
        Self {
            move_dir: Some(direction),
            interact: false,
        }
    }

    /// Intent that only requests a stairs interaction.
    #[must_use]
    pub const fn interacting() -> Self {
        Self {
            move_dir: None,
            interact: true,
        }
    }
}

/// Raw held-key snapshot gathered by an input collector.
///
/// Opposing keys resolve with fixed priority: up beats down and left beats
/// right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HeldKeys {
    /// Up (`w` / arrow up) is held.
    pub up: bool,
    /// Down (`s` / arrow down) is held.
    pub down: bool,
    /// Left (`a` / arrow left) is held.
    pub left: bool,
    /// Right (`d` / arrow right) is held.
    pub right: bool,
    /// Interact (`e` / space) is held.
    pub interact: bool,
}

impl HeldKeys {
    fn vertical(&self) -> Option<Direction> {
        if self.up {
            Some(Direction::North)
        } else if self.down {
            Some(Direction::South)
        } else {
            None
        }
    }

    fn horizontal(&self) -> Option<Direction> {
        if self.left {
            Some(Direction::West)
        } else if self.right {
            Some(Direction::East)
        } else {
            None
        }
    }

    /// Movement on both axes, allowing diagonal steps.
    #[must_use]
    pub fn move_vector(&self) -> MoveVector {
        MoveVector::from_axes(self.horizontal(), self.vertical())
    }

    /// Normalizes the keys into a single-direction intent.
    ///
    /// The vertical axis wins when keys on both axes are held.
    #[must_use]
    pub fn to_intent(&self) -> InputIntent {
        InputIntent {
            move_dir: self.vertical().or_else(|| self.horizontal()),
            interact: self.interact,
        }
    }
}

/// Authoritative player state owned by the navigation system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerState {
    /// Committed grid position.
    pub position: GridPosition,
    /// Direction the player faces.
    pub facing: Direction,
    /// Whether the last step committed a move.
    pub is_moving: bool,
    /// Steps remaining before another stairs interaction is accepted.
    pub interaction_cooldown: u32,
}

impl PlayerState {
    /// Creates an idle player facing south at the provided position.
    #[must_use]
    pub const fn at(position: GridPosition) -> Self {
        Self {
            position,
            facing: Direction::South,
            is_moving: false,
            interaction_cooldown: 0,
        }
    }
}

/// Outcome of a single navigation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MovementState {
    /// No movement was requested.
    #[default]
    Idle,
    /// The requested move was committed.
    Moving,
    /// The requested move was rejected; the position is unchanged.
    Blocked,
}
