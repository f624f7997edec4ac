use isonav_core::{
    Command, Event, FloorIndex, GridPosition, StairsDirection, Tile, TileCoord, TileKind,
};
use isonav_world::{
    self as world, query, Floor, LayerVisibility, MapDocument, MapError, World, DEMO_GROUND_FLOOR,
};

fn ground_without_stairs() -> Floor {
    let rows = DEMO_GROUND_FLOOR.map(|row| row.replace('^', "."));
    Floor::from_layout(&rows).expect("demo ground layout is valid")
}

fn single_floor_world() -> World {
    World::from_floors(vec![ground_without_stairs()]).expect("single floor world is valid")
}

#[test]
fn first_walkable_tile_on_demo_ground_is_centred_in_the_top_left_interior() {
    let world = World::demo().expect("demo world");
    let position = query::find_first_walkable_tile(&world, FloorIndex::GROUND);
    assert_eq!(position, GridPosition::new(1.5, 1.5, FloorIndex::GROUND));

    let water = query::tile_at(&world, FloorIndex::GROUND, TileCoord::new(4, 10))
        .expect("tile inside the grid");
    assert_eq!(water.kind(), TileKind::Water, "expected the water block at rows 9-11");
}

#[test]
fn placing_stairs_on_an_appended_floor_rewrites_both_tiles() {
    let mut world = single_floor_world();
    let upper = world.append_floor(None);
    assert_eq!(upper, FloorIndex::new(1));
    assert_eq!(
        query::tile_at(&world, upper, TileCoord::new(4, 10)),
        Ok(Tile::WALL),
        "appended floors default to walls"
    );

    assert!(world.set_stairs(FloorIndex::GROUND, upper, TileCoord::new(4, 10)));

    assert_eq!(
        query::tile_at(&world, FloorIndex::GROUND, TileCoord::new(4, 10)),
        Ok(Tile::new(TileKind::Grass, true, StairsDirection::Up))
    );
    assert_eq!(
        query::tile_at(&world, upper, TileCoord::new(4, 10)),
        Ok(Tile::new(TileKind::Grass, true, StairsDirection::Down))
    );
}

#[test]
fn out_of_bounds_stairs_leave_the_map_untouched() {
    let mut world = single_floor_world();
    let _ = world.append_floor(None);
    let before = world.to_document();

    assert!(!world.set_stairs(FloorIndex::GROUND, FloorIndex::new(2), TileCoord::new(4, 10)));
    assert!(!world.set_stairs(FloorIndex::GROUND, FloorIndex::new(1), TileCoord::new(20, 10)));
    assert!(!world.set_stairs(FloorIndex::GROUND, FloorIndex::new(1), TileCoord::new(4, 20)));

    assert_eq!(world.to_document(), before, "rejected stairs must not mutate floors");
}

#[test]
fn appending_a_floor_leaves_existing_floors_alone() {
    let mut world = World::demo().expect("demo world");
    let ground_before = query::floor(&world, FloorIndex::GROUND).cloned();

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::AppendFloor {
            fill: TileKind::Grass,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::FloorAppended {
            floor: FloorIndex::new(2)
        }]
    );
    assert_eq!(query::floor_count(&world), 3);
    assert_eq!(query::floor(&world, FloorIndex::GROUND).cloned(), ground_before);
    assert!(query::is_walkable(&world, 10.5, 10.5, FloorIndex::new(2), 0.5));
}

#[test]
fn changing_floor_updates_visibility() {
    let mut world = World::demo().expect("demo world");
    let _ = world.append_floor(None);

    assert!(world.change_floor(FloorIndex::new(1)));
    assert_eq!(query::active_floor(&world), FloorIndex::new(1));

    let layers: Vec<_> = query::floor_visibility(&world).iter().collect();
    assert_eq!(
        layers,
        vec![
            (FloorIndex::GROUND, LayerVisibility::Dimmed),
            (FloorIndex::new(1), LayerVisibility::Visible),
            (FloorIndex::new(2), LayerVisibility::Hidden),
        ]
    );

    assert!(!world.change_floor(FloorIndex::new(3)), "floor three does not exist");
    assert_eq!(query::active_floor(&world), FloorIndex::new(1));
}

#[test]
fn json_documents_load_and_validate() {
    let json = r#"{
        "floors": [
            [[[1, false, 0], [1, false, 0], [1, false, 0]],
             [[1, false, 0], [0, true, 1], [1, false, 0]],
             [[1, false, 0], [1, false, 0], [1, false, 0]]],
            [[[1, false, 0], [1, false, 0], [1, false, 0]],
             [[1, false, 0], [0, true, -1], [1, false, 0]],
             [[1, false, 0], [1, false, 0], [1, false, 0]]]
        ]
    }"#;
    let world = World::from_json(json).expect("paired stairs load");
    assert_eq!(
        query::check_for_stairs(&world, 1.5, 1.5, FloorIndex::new(1)),
        StairsDirection::Down
    );

    let reloaded = World::from_json(&world.to_document().to_json().expect("serializes"))
        .expect("dumped document reloads");
    assert_eq!(reloaded.to_document(), world.to_document());
}

#[test]
fn stairs_pointing_below_ground_are_rejected() {
    let document = MapDocument::from_json(r#"{ "floors": [[[[0, true, -1]]]] }"#)
        .expect("structurally valid");
    assert!(matches!(
        World::from_document(&document),
        Err(MapError::UnpairedStairs {
            floor: 0,
            column: 0,
            row: 0
        })
    ));
}

#[test]
fn stairs_answered_by_the_same_direction_are_rejected() {
    let ground = Floor::from_layout(&["^"]).expect("valid");
    let upper = Floor::from_layout(&["^"]).expect("valid");
    assert!(matches!(
        World::from_floors(vec![ground, upper]),
        Err(MapError::UnpairedStairs { floor: 0, .. })
    ));
}

#[test]
fn stairs_skipping_a_floor_fail_to_load() {
    let ground = Floor::from_layout(&["###", "#^#", "###"]).expect("valid");
    let middle = Floor::from_layout(&["###", "###", "###"]).expect("valid");
    let top = Floor::from_layout(&["###", "#v#", "###"]).expect("valid");

    assert!(matches!(
        World::from_floors(vec![ground, middle, top]),
        Err(MapError::UnpairedStairs {
            floor: 0,
            column: 1,
            row: 1
        })
    ));
}
