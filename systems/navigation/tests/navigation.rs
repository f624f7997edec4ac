use isonav_core::{
    Direction, Event, FloorIndex, GridPosition, HeldKeys, InputIntent, MoveVector, MovementState,
    NavigationConfig, TileCoord,
};
use isonav_system_navigation::PlayerNavigator;
use isonav_world::{query, Floor, World, DEMO_GROUND_FLOOR};

const EPSILON: f32 = 1e-5;

fn assert_close(actual: GridPosition, x: f32, y: f32, floor: FloorIndex) {
    assert!(
        (actual.x - x).abs() < EPSILON && (actual.y - y).abs() < EPSILON,
        "expected ({x}, {y}) but player stands at ({}, {})",
        actual.x,
        actual.y
    );
    assert_eq!(actual.floor, floor, "player is on the wrong floor");
}

fn building_with_stairs_at(tile: TileCoord) -> World {
    let rows = DEMO_GROUND_FLOOR.map(|row| row.replace('^', "."));
    let ground = Floor::from_layout(&rows).expect("valid layout");
    let mut world = World::from_floors(vec![ground]).expect("valid world");
    let upper = world.append_floor(None);
    assert!(world.set_stairs(FloorIndex::GROUND, upper, tile));
    world
}

#[test]
fn moving_east_onto_grass_commits_one_step() {
    let mut world = World::demo().expect("demo world");
    let config = NavigationConfig::default();
    let mut navigator =
        PlayerNavigator::at(GridPosition::new(5.5, 5.5, FloorIndex::GROUND), &config);
    let mut events = Vec::new();

    let state = navigator.step(&mut world, InputIntent::moving(Direction::East), &mut events);

    assert_eq!(state, MovementState::Moving);
    assert_close(navigator.state().position, 5.6, 5.5, FloorIndex::GROUND);
    assert_eq!(navigator.state().facing, Direction::East);
    assert!(navigator.state().is_moving);
    assert!(matches!(events.as_slice(), [Event::PlayerMoved { .. }]));
}

#[test]
fn moving_into_a_wall_is_blocked_and_keeps_position() {
    let mut world = World::demo().expect("demo world");
    let config = NavigationConfig::default();
    let start = GridPosition::new(3.5, 5.5, FloorIndex::GROUND);
    let mut navigator = PlayerNavigator::at(start, &config);
    let mut events = Vec::new();

    let candidate_walkable = query::is_walkable(&world, 3.4, 5.5, FloorIndex::GROUND, 0.5);
    let state = navigator.step(&mut world, InputIntent::moving(Direction::West), &mut events);

    assert!(!candidate_walkable, "the wall column must reject the candidate");
    assert_eq!(state, MovementState::Blocked);
    assert_eq!(navigator.state().position, start);
    assert!(!navigator.state().is_moving);
    assert_eq!(
        events,
        vec![Event::PlayerBlocked {
            at: start,
            attempted: MoveVector::from_direction(Direction::West),
        }]
    );
}

#[test]
fn interacting_on_stairs_changes_floor_and_starts_cooldown() {
    let mut world = building_with_stairs_at(TileCoord::new(4, 10));
    let config = NavigationConfig::default();
    let mut navigator =
        PlayerNavigator::at(GridPosition::new(4.5, 10.5, FloorIndex::GROUND), &config);
    let mut events = Vec::new();

    let _ = navigator.step(&mut world, InputIntent::interacting(), &mut events);

    assert_eq!(navigator.state().position.floor, FloorIndex::new(1));
    assert_eq!(navigator.state().interaction_cooldown, config.interaction_cooldown);
    assert_eq!(query::active_floor(&world), FloorIndex::new(1));
    assert_eq!(
        events,
        vec![
            Event::FloorChanged {
                from: FloorIndex::GROUND,
                to: FloorIndex::new(1),
            },
            Event::PlayerChangedFloor {
                from: FloorIndex::GROUND,
                to: FloorIndex::new(1),
            },
        ]
    );

    events.clear();
    let _ = navigator.step(&mut world, InputIntent::interacting(), &mut events);
    assert_eq!(
        navigator.state().position.floor,
        FloorIndex::new(1),
        "interaction during cooldown must be ignored"
    );
    assert!(events.is_empty());
}

#[test]
fn stairs_can_be_used_again_once_the_cooldown_expires() {
    let mut world = building_with_stairs_at(TileCoord::new(4, 10));
    let config = NavigationConfig::default();
    let mut navigator =
        PlayerNavigator::at(GridPosition::new(4.5, 10.5, FloorIndex::GROUND), &config);
    let mut events = Vec::new();

    let _ = navigator.step(&mut world, InputIntent::interacting(), &mut events);
    for _ in 1..config.interaction_cooldown {
        let _ = navigator.step(&mut world, InputIntent::IDLE, &mut events);
    }
    assert_eq!(navigator.state().interaction_cooldown, 1);

    let _ = navigator.step(&mut world, InputIntent::interacting(), &mut events);
    assert_eq!(navigator.state().position.floor, FloorIndex::GROUND);
    assert_eq!(query::active_floor(&world), FloorIndex::GROUND);
}

#[test]
fn interacting_away_from_stairs_does_nothing() {
    let mut world = building_with_stairs_at(TileCoord::new(4, 10));
    let config = NavigationConfig::default();
    let mut navigator =
        PlayerNavigator::at(GridPosition::new(7.5, 7.5, FloorIndex::GROUND), &config);
    let mut events = Vec::new();

    let _ = navigator.step(&mut world, InputIntent::interacting(), &mut events);

    assert_eq!(navigator.state().position.floor, FloorIndex::GROUND);
    assert_eq!(navigator.state().interaction_cooldown, 0);
    assert!(events.is_empty());
}

#[test]
fn floor_change_resolves_before_movement_in_the_same_step() {
    let mut world = building_with_stairs_at(TileCoord::new(10, 7));
    let config = NavigationConfig::default();
    let mut navigator =
        PlayerNavigator::at(GridPosition::new(10.7, 7.5, FloorIndex::GROUND), &config);
    let mut events = Vec::new();

    assert!(
        query::is_walkable(&world, 10.8, 7.5, FloorIndex::GROUND, config.footprint),
        "the move alone would succeed on the ground floor"
    );

    let state = navigator.step(
        &mut world,
        InputIntent {
            move_dir: Some(Direction::East),
            interact: true,
        },
        &mut events,
    );

    assert_eq!(state, MovementState::Blocked, "upper floor walls block the move");
    assert_close(navigator.state().position, 10.7, 7.5, FloorIndex::new(1));
    assert!(matches!(
        events.as_slice(),
        [
            Event::FloorChanged { .. },
            Event::PlayerChangedFloor { .. },
            Event::PlayerBlocked { .. }
        ]
    ));
}

#[test]
fn diagonal_keys_move_both_axes_at_full_speed() {
    let mut world = World::demo().expect("demo world");
    let config = NavigationConfig::default();
    let mut navigator =
        PlayerNavigator::at(GridPosition::new(10.5, 7.5, FloorIndex::GROUND), &config);
    let mut events = Vec::new();
    let keys = HeldKeys {
        down: true,
        right: true,
        ..HeldKeys::default()
    };

    let state = navigator.step_held(&mut world, keys, &mut events);

    assert_eq!(state, MovementState::Moving);
    assert_close(navigator.state().position, 10.6, 7.6, FloorIndex::GROUND);
    assert_eq!(navigator.state().facing, Direction::South, "vertical axis wins");
}

#[test]
fn spawn_lands_on_the_first_walkable_tile_of_the_spawn_floor() {
    let mut world = World::demo().expect("demo world");
    let config = NavigationConfig {
        spawn_floor: FloorIndex::new(1),
        ..NavigationConfig::default()
    };

    let navigator = PlayerNavigator::spawn(&mut world, &config);

    assert_eq!(
        navigator.state().position,
        GridPosition::new(5.5, 5.5, FloorIndex::new(1))
    );
    assert_eq!(navigator.state().facing, Direction::South);
    assert_eq!(query::active_floor(&world), FloorIndex::new(1));
}

#[test]
fn interacting_never_strands_the_player_between_floors() {
    let rows = DEMO_GROUND_FLOOR.map(|row| row.replace('^', "."));
    let ground = Floor::from_layout(&rows).expect("valid layout");
    let mut world = World::from_floors(vec![ground]).expect("valid world");
    let _ = world.append_floor(None);
    let top = world.append_floor(None);
    assert!(
        !world.set_stairs(FloorIndex::GROUND, top, TileCoord::new(4, 10)),
        "stairs must connect adjacent floors"
    );

    let config = NavigationConfig::default();
    let mut navigator =
        PlayerNavigator::at(GridPosition::new(4.5, 10.5, FloorIndex::GROUND), &config);
    let mut events = Vec::new();
    let _ = navigator.step(&mut world, InputIntent::interacting(), &mut events);

    assert_eq!(navigator.state().position.floor, FloorIndex::GROUND);
    assert!(events.is_empty());
}
