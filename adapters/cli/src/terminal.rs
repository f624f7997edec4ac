//! Text backend that replays scripted frames and prints the active floor.

use std::io::Write;

use anyhow::Result as AnyResult;
use isonav_core::{ScreenPoint, StairsDirection, TileKind};
use isonav_rendering::{FrameInput, Presentation, RenderingBackend, Scene, TilePresentation};
use isonav_world::LayerVisibility;

const PLAYER_GLYPH: char = '@';

/// Rendering backend that writes ASCII frames to a writer.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W> {
    writer: W,
    frames: Vec<FrameInput>,
    show_frames: bool,
}

impl<W: Write> TerminalBackend<W> {
    /// Creates a backend that replays `frames` in order.
    pub(crate) fn new(writer: W, frames: Vec<FrameInput>, show_frames: bool) -> Self {
        Self {
            writer,
            frames,
            show_frames,
        }
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> bool,
    {
        let Presentation {
            window_title,
            mut scene,
            ..
        } = presentation;
        writeln!(self.writer, "== {window_title} ==")?;
        if self.show_frames {
            write_frame(&mut self.writer, 0, &scene)?;
        }

        for (index, input) in self.frames.into_iter().enumerate() {
            if !update_scene(input, &mut scene) {
                break;
            }
            if self.show_frames {
                write_frame(&mut self.writer, index + 1, &scene)?;
            }
        }

        self.writer.flush()?;
        Ok(())
    }
}

fn write_frame<W: Write>(writer: &mut W, frame: usize, scene: &Scene) -> AnyResult<()> {
    writeln!(
        writer,
        "-- frame {frame} (floor {}) --",
        scene.active_floor.get()
    )?;
    for line in render_ascii(scene) {
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

/// Flattens the scene into rows of glyphs, later floors drawn over earlier ones.
pub(crate) fn render_ascii(scene: &Scene) -> Vec<String> {
    let (columns, rows) = scene.tiles.iter().fold((0, 0), |(columns, rows), tile| {
        (
            columns.max(tile.tile.column() as usize + 1),
            rows.max(tile.tile.row() as usize + 1),
        )
    });
    let mut grid = vec![vec![' '; columns]; rows];

    for tile in &scene.tiles {
        if let Some(cell) = cell_mut(&mut grid, tile.tile.column(), tile.tile.row()) {
            *cell = glyph(tile);
        }
    }

    let player = scene.player.position;
    let standing = scene
        .geometry
        .unlifted(ScreenPoint::new(player.x, player.y), scene.player.floor)
        .to_tile();
    if let Some(tile) = standing {
        if let Some(cell) = cell_mut(&mut grid, tile.column(), tile.row()) {
            *cell = PLAYER_GLYPH;
        }
    }

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

fn cell_mut(grid: &mut [Vec<char>], column: u32, row: u32) -> Option<&mut char> {
    grid.get_mut(row as usize)?.get_mut(column as usize)
}

fn glyph(tile: &TilePresentation) -> char {
    let dimmed = tile.visibility == LayerVisibility::Dimmed;
    match (tile.stairs, tile.kind, dimmed) {
        (StairsDirection::Up, _, _) => '^',
        (StairsDirection::Down, _, _) => 'v',
        (StairsDirection::Level, TileKind::Grass, false) => '.',
        (StairsDirection::Level, TileKind::Grass, true) => ',',
        (StairsDirection::Level, TileKind::Wall, false) => '#',
        (StairsDirection::Level, TileKind::Wall, true) => '+',
        (StairsDirection::Level, TileKind::Water, false) => '~',
        (StairsDirection::Level, TileKind::Water, true) => '-',
    }
}
