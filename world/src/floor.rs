//! Dense rectangular tile grid for a single floor.

use isonav_core::{StairsDirection, Tile, TileCoord, TileKind};
use thiserror::Error;

/// One rectangular layer of tiles stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Floor {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl Floor {
    /// Creates a floor where every tile shares the provided value.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, tile: Tile) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            tiles: vec![tile; capacity],
        }
    }

    /// Creates a floor from rows of tiles indexed `[y][x]`.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, FloorError> {
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(FloorError::Empty);
        }

        let mut tiles = Vec::with_capacity(expected * rows.len());
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(FloorError::RaggedRow {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
            tiles.extend_from_slice(cells);
        }

        Ok(Self {
            columns: u32::try_from(expected).map_err(|_| FloorError::TooLarge)?,
            rows: u32::try_from(rows.len()).map_err(|_| FloorError::TooLarge)?,
            tiles,
        })
    }

    /// Parses a compact text layout, one string per row.
    ///
    /// Glyphs: `.` grass, `#` wall, `~` water, `^` grass with stairs up and
    /// `v` grass with stairs down.
    pub fn from_layout<S>(lines: &[S]) -> Result<Self, FloorError>
    where
        S: AsRef<str>,
    {
        let rows = lines
            .iter()
            .map(|line| line.as_ref().chars().map(tile_from_glyph).collect())
            .collect::<Result<Vec<Vec<Tile>>, FloorError>>()?;
        Self::from_rows(rows)
    }

    /// Number of tile columns (the grid width).
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows (the grid height).
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the coordinate lies within the floor.
    #[must_use]
    pub const fn contains(&self, tile: TileCoord) -> bool {
        tile.column() < self.columns && tile.row() < self.rows
    }

    /// Tile stored at the coordinate, if it lies within the floor.
    #[must_use]
    pub fn tile(&self, tile: TileCoord) -> Option<Tile> {
        self.index(tile)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Iterator over the rows of the floor, top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Tile]> {
        let width = usize::try_from(self.columns).unwrap_or(0).max(1);
        self.tiles.chunks(width)
    }

    /// Iterator over every tile alongside its coordinate in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, Tile)> + '_ {
        self.rows_iter().zip(0u32..).flat_map(|(cells, row)| {
            cells
                .iter()
                .zip(0u32..)
                .map(move |(tile, column)| (TileCoord::new(column, row), *tile))
        })
    }

    /// Renders the floor back into the compact text layout.
    #[must_use]
    pub fn to_layout(&self) -> Vec<String> {
        self.rows_iter()
            .map(|cells| cells.iter().map(glyph_for).collect())
            .collect()
    }

    pub(crate) fn set(&mut self, tile: TileCoord, value: Tile) -> bool {
        match self.index(tile).and_then(|index| self.tiles.get_mut(index)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if !self.contains(tile) {
            return None;
        }
        let row = usize::try_from(tile.row()).ok()?;
        let column = usize::try_from(tile.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Errors raised while constructing a [`Floor`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FloorError {
    /// The floor contains no tiles.
    #[error("floor has no tiles")]
    Empty,
    /// A row differs in length from the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// The floor dimensions do not fit the coordinate space.
    #[error("floor dimensions exceed the supported coordinate range")]
    TooLarge,
    /// A layout contained an unrecognised glyph.
    #[error("unknown layout glyph {glyph:?}")]
    UnknownGlyph {
        /// Glyph that failed to parse.
        glyph: char,
    },
}

fn tile_from_glyph(glyph: char) -> Result<Tile, FloorError> {
    match glyph {
        '.' => Ok(Tile::GRASS),
        '#' => Ok(Tile::WALL),
        '~' => Ok(Tile::WATER),
        '^' => Ok(Tile::staircase(StairsDirection::Up)),
        'v' => Ok(Tile::staircase(StairsDirection::Down)),
        other => Err(FloorError::UnknownGlyph { glyph: other }),
    }
}

fn glyph_for(tile: &Tile) -> char {
    match (tile.kind(), tile.stairs()) {
        (_, StairsDirection::Up) => '^',
        (_, StairsDirection::Down) => 'v',
        (TileKind::Grass, StairsDirection::Level) => '.',
        (TileKind::Wall, StairsDirection::Level) => '#',
        (TileKind::Water, StairsDirection::Level) => '~',
    }
}
