#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for isometric navigation adapters.
//!
//! Scenes are derived from read-only world and player snapshots. Nothing in
//! this crate feeds back into navigation.

use anyhow::Result as AnyResult;
use glam::Vec2;
use isonav_core::{
    Direction, FloorIndex, HeldKeys, PlayerState, ScreenPoint, StairsDirection, TileCoord,
    TileGeometry, TileKind,
};
use isonav_world::{query, LayerVisibility, World};
use std::{error::Error, fmt};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Returns the same color with the provided alpha.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Packs the RGB channels back into `0xRRGGBB`.
    #[must_use]
    pub fn to_hex(self) -> u32 {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.red) << 16) | (channel(self.green) << 8) | channel(self.blue)
    }
}

/// Fill color of each tile kind.
#[must_use]
pub const fn tile_color(kind: TileKind) -> Color {
    match kind {
        TileKind::Grass => Color::from_hex(0x40_80_40),
        TileKind::Wall => Color::from_hex(0x80_80_80),
        TileKind::Water => Color::from_hex(0x40_40_c0),
    }
}

/// Overlay color marking stairs, or `None` for level tiles.
#[must_use]
pub const fn stairs_color(direction: StairsDirection) -> Option<Color> {
    match direction {
        StairsDirection::Up => Some(Color::from_hex(0xcc_cc_00)),
        StairsDirection::Down => Some(Color::from_hex(0xcc_88_00)),
        StairsDirection::Level => None,
    }
}

const PLAYER_TINTS: [u32; 5] = [0xff_00_00, 0xff_aa_00, 0xff_ff_00, 0x00_ff_00, 0x00_ff_ff];

/// Player tint for the provided floor; the palette repeats every five floors.
#[must_use]
pub fn player_tint(floor: FloorIndex) -> Color {
    let index = floor.as_usize() % PLAYER_TINTS.len();
    Color::from_hex(PLAYER_TINTS[index])
}

/// Adapter-independent presentation settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneOptions {
    viewport: Vec2,
    dimmed_alpha: f32,
}

impl SceneOptions {
    /// Viewport used by the reference presentation.
    pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);
    /// Opacity applied to floors below the active floor.
    pub const DEFAULT_DIMMED_ALPHA: f32 = 0.5;

    /// Creates validated scene options.
    pub fn new(viewport: Vec2, dimmed_alpha: f32) -> Result<Self, RenderingError> {
        let positive = |value: f32| value.is_finite() && value > 0.0;
        if !(positive(viewport.x) && positive(viewport.y)) {
            return Err(RenderingError::InvalidViewport {
                width: viewport.x,
                height: viewport.y,
            });
        }
        if !(0.0..=1.0).contains(&dimmed_alpha) {
            return Err(RenderingError::InvalidAlpha {
                alpha: dimmed_alpha,
            });
        }
        Ok(Self {
            viewport,
            dimmed_alpha,
        })
    }

    /// Size of the viewport in pixels.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Opacity of dimmed floors.
    #[must_use]
    pub const fn dimmed_alpha(&self) -> f32 {
        self.dimmed_alpha
    }
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            viewport: Self::DEFAULT_VIEWPORT,
            dimmed_alpha: Self::DEFAULT_DIMMED_ALPHA,
        }
    }
}

/// A single tile queued for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Floor the tile belongs to.
    pub floor: FloorIndex,
    /// Grid location of the tile.
    pub tile: TileCoord,
    /// Material of the tile.
    pub kind: TileKind,
    /// Effective stairs direction of the tile.
    pub stairs: StairsDirection,
    /// Screen position of the tile's top corner, lifted by its floor offset.
    pub position: Vec2,
    /// Fill color with the floor's opacity applied.
    pub color: Color,
    /// Stairs overlay color with the floor's opacity applied.
    pub stairs_color: Option<Color>,
    /// Visibility of the owning floor.
    pub visibility: LayerVisibility,
}

/// Player sprite placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Screen position of the player, lifted by its floor offset.
    pub position: Vec2,
    /// Floor the player stands on.
    pub floor: FloorIndex,
    /// Direction the sprite faces.
    pub facing: Direction,
    /// Whether the walking animation should play.
    pub is_moving: bool,
    /// Tint assigned to the player's floor.
    pub tint: Color,
}

/// Translation applied to every scene element so the player stays centred.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    /// Offset added to scene positions to obtain viewport positions.
    pub offset: Vec2,
}

impl Camera {
    /// Camera that centres `target` within the viewport.
    #[must_use]
    pub fn centered_on(target: Vec2, viewport: Vec2) -> Self {
        Self {
            offset: viewport / 2.0 - target,
        }
    }

    /// Converts a scene position into viewport pixels.
    #[must_use]
    pub fn to_viewport(&self, scene_position: Vec2) -> Vec2 {
        scene_position + self.offset
    }

    /// Converts viewport pixels back into a scene position.
    #[must_use]
    pub fn to_scene(&self, viewport_position: Vec2) -> Vec2 {
        viewport_position - self.offset
    }
}

/// Scene description combining the tile draw list, the player and the camera.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tiles of every drawn floor, ordered back to front.
    pub tiles: Vec<TilePresentation>,
    /// Player sprite placement.
    pub player: PlayerPresentation,
    /// Camera following the player.
    pub camera: Camera,
    /// Floor currently marked active by the world.
    pub active_floor: FloorIndex,
    /// Tile dimensions used for every projection in the scene.
    pub geometry: TileGeometry,
    /// Presentation settings the scene was captured with.
    pub options: SceneOptions,
}

impl Scene {
    /// Captures a scene from the current world and player snapshots.
    ///
    /// Floors above the active floor are omitted, floors below it are dimmed
    /// and plain grass on upper floors is treated as empty space.
    #[must_use]
    pub fn capture(
        world: &World,
        player: &PlayerState,
        geometry: TileGeometry,
        options: SceneOptions,
    ) -> Self {
        let visibility = query::floor_visibility(world);
        let mut tiles = Vec::new();

        for (floor_index, floor) in query::floors(world) {
            let Some(layer) = visibility.of(floor_index) else {
                continue;
            };
            if !layer.is_drawn() {
                continue;
            }
            let alpha = match layer {
                LayerVisibility::Dimmed => options.dimmed_alpha(),
                _ => 1.0,
            };

            for (coord, tile) in floor.iter() {
                if floor_index != FloorIndex::GROUND
                    && tile.kind() == TileKind::Grass
                    && !tile.has_stairs()
                {
                    continue;
                }
                let screen =
                    geometry.lifted(coord.column() as f32, coord.row() as f32, floor_index);
                tiles.push(TilePresentation {
                    floor: floor_index,
                    tile: coord,
                    kind: tile.kind(),
                    stairs: tile.stairs(),
                    position: to_vec2(screen),
                    color: tile_color(tile.kind()).with_alpha(alpha),
                    stairs_color: stairs_color(tile.stairs()).map(|color| color.with_alpha(alpha)),
                    visibility: layer,
                });
            }
        }

        tiles.sort_by_key(|tile| (tile.floor, tile.tile.column() + tile.tile.row()));

        let position = player.position;
        let player_screen = to_vec2(geometry.lifted(position.x, position.y, position.floor));
        Self {
            tiles,
            player: PlayerPresentation {
                position: player_screen,
                floor: position.floor,
                facing: player.facing,
                is_moving: player.is_moving,
                tint: player_tint(position.floor),
            },
            camera: Camera::centered_on(player_screen, options.viewport()),
            active_floor: visibility.active(),
            geometry,
            options,
        }
    }

    /// Resolves the tile under a viewport position on the active floor.
    ///
    /// Returns `None` when the position falls outside the floor.
    #[must_use]
    pub fn pick_tile(&self, world: &World, pointer: Vec2) -> Option<TileCoord> {
        let scene_position = self.camera.to_scene(pointer);
        let cell = self.geometry.unlifted(
            ScreenPoint::new(scene_position.x, scene_position.y),
            self.active_floor,
        );
        let tile = cell.to_tile()?;
        query::tile_at(world, self.active_floor, tile).ok().map(|_| tile)
    }

    /// Tiles drawn for the provided floor.
    pub fn tiles_on(&self, floor: FloorIndex) -> impl Iterator<Item = &TilePresentation> {
        self.tiles.iter().filter(move |tile| tile.floor == floor)
    }
}

fn to_vec2(point: ScreenPoint) -> Vec2 {
    Vec2::new(point.x, point.y)
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Movement and interaction keys held during the frame.
    pub keys: HeldKeys,
    /// Viewport position of a pointer press registered during the frame.
    pub pointer: Option<Vec2>,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting navigation scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives per-frame input captured by
    /// the adapter and may replace the scene before it is presented. Returning
    /// `false` stops the backend.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> bool;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The viewport must have a positive finite size.
    InvalidViewport {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
    /// Opacity must lie within `0.0..=1.0`.
    InvalidAlpha {
        /// Provided opacity.
        alpha: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(f, "viewport must be positive (received {width}x{height})")
            }
            Self::InvalidAlpha { alpha } => {
                write!(f, "dimmed alpha must lie within 0.0..=1.0 (received {alpha})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use isonav_core::GridPosition;

    fn demo_scene(player: GridPosition) -> (World, Scene) {
        let mut world = World::demo().expect("demo world");
        assert!(world.change_floor(player.floor));
        let scene = Scene::capture(
            &world,
            &PlayerState::at(player),
            TileGeometry::DEFAULT,
            SceneOptions::default(),
        );
        (world, scene)
    }

    #[test]
    fn scene_options_reject_degenerate_values() {
        assert!(matches!(
            SceneOptions::new(Vec2::new(0.0, 600.0), 0.5),
            Err(RenderingError::InvalidViewport { .. })
        ));
        assert_eq!(
            SceneOptions::new(Vec2::new(800.0, 600.0), 1.5),
            Err(RenderingError::InvalidAlpha { alpha: 1.5 })
        );
        assert_eq!(
            SceneOptions::new(SceneOptions::DEFAULT_VIEWPORT, 0.5),
            Ok(SceneOptions::default())
        );
    }

    #[test]
    fn colors_round_trip_through_hex() {
        assert_eq!(tile_color(TileKind::Water).to_hex(), 0x40_40_c0);
        assert_eq!(player_tint(FloorIndex::new(6)).to_hex(), 0xff_aa_00);
        assert_eq!(stairs_color(StairsDirection::Level), None);
    }

    #[test]
    fn ground_floor_scene_hides_upper_floors() {
        let (_, scene) = demo_scene(GridPosition::new(1.5, 1.5, FloorIndex::GROUND));

        assert_eq!(scene.tiles.len(), 400);
        assert_eq!(scene.tiles_on(FloorIndex::new(1)).count(), 0);
        assert!(scene
            .tiles
            .iter()
            .all(|tile| tile.visibility == LayerVisibility::Visible && tile.color.alpha == 1.0));
    }

    #[test]
    fn upper_floor_scene_dims_ground_and_skips_open_floor() {
        let (_, scene) = demo_scene(GridPosition::new(7.5, 7.5, FloorIndex::new(1)));

        let ground: Vec<_> = scene.tiles_on(FloorIndex::GROUND).collect();
        assert_eq!(ground.len(), 400);
        assert!(ground.iter().all(|tile| tile.color.alpha == 0.5));

        // 6x8 room on the upper floor; only its stairs tile is drawn.
        let upper: Vec<_> = scene.tiles_on(FloorIndex::new(1)).collect();
        assert_eq!(upper.len(), 400 - 48 + 1);
        let stairs = upper
            .iter()
            .find(|tile| tile.tile == TileCoord::new(7, 7))
            .expect("stairs tile is drawn");
        assert_eq!(stairs.stairs, StairsDirection::Down);
        assert_eq!(stairs.position, Vec2::new(0.0, 224.0 - 37.0));
        assert_eq!(scene.player.tint, player_tint(FloorIndex::new(1)));
    }

    #[test]
    fn tiles_are_ordered_by_floor_then_depth() {
        let (_, scene) = demo_scene(GridPosition::new(7.5, 7.5, FloorIndex::new(1)));
        let keys: Vec<_> = scene
            .tiles
            .iter()
            .map(|tile| (tile.floor, tile.tile.column() + tile.tile.row()))
            .collect();
        assert!(keys.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn camera_centres_the_player() {
        let (_, scene) = demo_scene(GridPosition::new(5.5, 5.5, FloorIndex::GROUND));
        assert_eq!(scene.player.position, Vec2::new(0.0, 176.0));
        assert_eq!(scene.camera.offset, Vec2::new(400.0, 300.0 - 176.0));
        assert_eq!(
            scene.camera.to_viewport(scene.player.position),
            Vec2::new(400.0, 300.0)
        );
    }

    #[test]
    fn pointer_picks_the_tile_under_the_player() {
        let (world, scene) = demo_scene(GridPosition::new(5.5, 5.5, FloorIndex::GROUND));
        assert_eq!(
            scene.pick_tile(&world, Vec2::new(400.0, 300.0)),
            Some(TileCoord::new(5, 5))
        );
        assert_eq!(scene.pick_tile(&world, Vec2::new(-4000.0, 300.0)), None);
    }

    #[test]
    fn picking_on_an_upper_floor_undoes_the_lift() {
        let (world, scene) = demo_scene(GridPosition::new(7.5, 7.5, FloorIndex::new(1)));
        assert_eq!(
            scene.pick_tile(&world, Vec2::new(400.0, 300.0)),
            Some(TileCoord::new(7, 7))
        );
    }
}
