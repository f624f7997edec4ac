#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player navigation state machine.
//!
//! The navigator is the sole writer of [`PlayerState`]. Each simulation step
//! consumes one input snapshot, resolves a stairs interaction first and then
//! attempts the requested move against the collision checker.

use isonav_core::{
    Command, Event, FloorIndex, GridPosition, HeldKeys, InputIntent, MoveVector, MovementState,
    NavigationConfig, PlayerState, ScreenPoint, TileGeometry,
};
use isonav_world::{self as world, query, World};
use tracing::{debug, trace, warn};

/// Owns the player's authoritative state and advances it one step at a time.
#[derive(Clone, Debug)]
pub struct PlayerNavigator {
    state: PlayerState,
    movement: MovementState,
    speed: f32,
    footprint: f32,
    cooldown_window: u32,
}

impl PlayerNavigator {
    /// Spawns the player on the first walkable tile of the configured floor.
    ///
    /// The spawn floor becomes the world's active floor. A spawn floor that
    /// does not exist falls back to the ground floor.
    pub fn spawn(world: &mut World, config: &NavigationConfig) -> Self {
        let mut floor = config.spawn_floor;
        if !world.change_floor(floor) {
            warn!(
                floor = floor.get(),
                "spawn floor does not exist; spawning on the ground floor"
            );
            floor = FloorIndex::GROUND;
            let _ = world.change_floor(floor);
        }
        Self::at(query::find_first_walkable_tile(world, floor), config)
    }

    /// Places an idle player at the provided position.
    #[must_use]
    pub fn at(position: GridPosition, config: &NavigationConfig) -> Self {
        Self {
            state: PlayerState::at(position),
            movement: MovementState::Idle,
            speed: config.player_speed,
            footprint: config.footprint,
            cooldown_window: config.interaction_cooldown,
        }
    }

    /// Current player state.
    #[must_use]
    pub const fn state(&self) -> PlayerState {
        self.state
    }

    /// Outcome of the most recent step.
    #[must_use]
    pub const fn movement(&self) -> MovementState {
        self.movement
    }

    /// Advances one step using a normalized single-direction intent.
    pub fn step(
        &mut self,
        world: &mut World,
        intent: InputIntent,
        out_events: &mut Vec<Event>,
    ) -> MovementState {
        self.advance(
            world,
            intent.interact,
            MoveVector::from(intent.move_dir),
            out_events,
        )
    }

    /// Advances one step using raw held keys, allowing diagonal movement.
    pub fn step_held(
        &mut self,
        world: &mut World,
        keys: HeldKeys,
        out_events: &mut Vec<Event>,
    ) -> MovementState {
        self.advance(world, keys.interact, keys.move_vector(), out_events)
    }

    /// Screen position of the player sprite, lifted by its floor offset.
    #[must_use]
    pub fn screen_position(&self, geometry: &TileGeometry) -> ScreenPoint {
        let position = self.state.position;
        geometry.lifted(position.x, position.y, position.floor)
    }

    fn advance(
        &mut self,
        world: &mut World,
        interact: bool,
        vector: MoveVector,
        out_events: &mut Vec<Event>,
    ) -> MovementState {
        self.state.interaction_cooldown = self.state.interaction_cooldown.saturating_sub(1);

        if interact && self.state.interaction_cooldown == 0 {
            self.use_stairs(world, out_events);
        }

        self.movement = if vector.is_zero() {
            MovementState::Idle
        } else {
            self.try_move(world, vector, out_events)
        };
        self.state.is_moving = self.movement == MovementState::Moving;
        self.movement
    }

    fn use_stairs(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        let position = self.state.position;
        let direction = query::check_for_stairs(world, position.x, position.y, position.floor);
        if direction.is_level() {
            return;
        }
        let Some(target) = position.floor.step(direction) else {
            return;
        };

        let first_new = out_events.len();
        world::apply(world, Command::ChangeFloor { target }, out_events);
        let changed = out_events[first_new..]
            .iter()
            .any(|event| matches!(event, Event::FloorChanged { to, .. } if *to == target));
        if !changed {
            return;
        }

        self.state.position = position.on_floor(target);
        self.state.interaction_cooldown = self.cooldown_window;
        debug!(
            from = position.floor.get(),
            to = target.get(),
            "player changed floor"
        );
        out_events.push(Event::PlayerChangedFloor {
            from: position.floor,
            to: target,
        });
    }

    fn try_move(
        &mut self,
        world: &World,
        vector: MoveVector,
        out_events: &mut Vec<Event>,
    ) -> MovementState {
        let from = self.state.position;
        let candidate = from.stepped(vector, self.speed);
        if !query::is_walkable(world, candidate.x, candidate.y, candidate.floor, self.footprint) {
            trace!(x = from.x, y = from.y, floor = from.floor.get(), "move blocked");
            out_events.push(Event::PlayerBlocked {
                at: from,
                attempted: vector,
            });
            return MovementState::Blocked;
        }

        self.state.position = candidate;
        if let Some(facing) = vector.facing() {
            self.state.facing = facing;
        }
        out_events.push(Event::PlayerMoved {
            from,
            to: candidate,
        });
        MovementState::Moving
    }
}
