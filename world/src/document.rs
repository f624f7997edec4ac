//! Structured map documents loaded at startup.
//!
//! A document stores floors × rows × columns of `[type, hasStairs,
//! stairsDirection]` triples, where `type` is `0` grass, `1` wall or `2`
//! water.

use isonav_core::{StairsDirection, Tile, TileKind};
use serde::{Deserialize, Serialize};

use crate::{Floor, MapError};

/// Serialized form of a complete world map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDocument {
    /// Floors in ascending order, each stored as rows of tile triples.
    pub floors: Vec<Vec<Vec<TileRecord>>>,
}

/// Positional tile triple as it appears in map documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord(pub u8, pub bool, pub StairsDirection);

impl TileRecord {
    /// Converts the triple into a tagged tile record.
    pub fn to_tile(self) -> Result<Tile, MapError> {
        let TileRecord(code, has_stairs, stairs_direction) = self;
        let kind = TileKind::from_code(code).ok_or(MapError::UnknownTileCode { code })?;
        Ok(Tile::new(kind, has_stairs, stairs_direction))
    }
}

impl From<Tile> for TileRecord {
    fn from(tile: Tile) -> Self {
        Self(tile.kind().code(), tile.has_stairs(), tile.stairs_direction())
    }
}

impl MapDocument {
    /// Parses a JSON document.
    pub fn from_json(text: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serializes the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Captures the provided floors as a document.
    #[must_use]
    pub fn capture<'a, I>(floors: I) -> Self
    where
        I: IntoIterator<Item = &'a Floor>,
    {
        let floors = floors
            .into_iter()
            .map(|floor| {
                floor
                    .rows_iter()
                    .map(|cells| cells.iter().copied().map(TileRecord::from).collect())
                    .collect()
            })
            .collect();
        Self { floors }
    }

    /// Converts every floor of the document into a tile grid.
    ///
    /// Only per-floor shape is checked here; cross-floor invariants are
    /// validated when the floors are assembled into a world.
    pub fn to_floors(&self) -> Result<Vec<Floor>, MapError> {
        self.floors
            .iter()
            .enumerate()
            .map(|(index, rows)| {
                let tiles = rows
                    .iter()
                    .map(|row| row.iter().map(|record| record.to_tile()).collect())
                    .collect::<Result<Vec<Vec<Tile>>, MapError>>()?;
                Floor::from_rows(tiles).map_err(|source| MapError::Floor {
                    floor: index,
                    source,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FloorError;

    #[test]
    fn triples_decode_into_tagged_tiles() {
        let json = r#"{ "floors": [[[[1, false, 0], [0, true, 1], [2, false, 0]]]] }"#;
        let document = MapDocument::from_json(json).expect("valid document");

        let floors = document.to_floors().expect("valid floors");
        assert_eq!(floors.len(), 1);
        let tiles: Vec<Tile> = floors[0].iter().map(|(_, tile)| tile).collect();
        assert_eq!(
            tiles,
            vec![
                Tile::WALL,
                Tile::staircase(StairsDirection::Up),
                Tile::WATER
            ]
        );
    }

    #[test]
    fn unknown_tile_codes_are_rejected() {
        let document = MapDocument::from_json(r#"{ "floors": [[[[7, false, 0]]]] }"#)
            .expect("structurally valid document");
        assert!(matches!(
            document.to_floors(),
            Err(MapError::UnknownTileCode { code: 7 })
        ));
    }

    #[test]
    fn out_of_range_stairs_direction_fails_to_parse() {
        let result = MapDocument::from_json(r#"{ "floors": [[[[0, true, 3]]]] }"#);
        assert!(matches!(result, Err(MapError::Json(_))));
    }

    #[test]
    fn ragged_floor_reports_its_index() {
        let document = MapDocument::from_json(
            r#"{ "floors": [[[[0, false, 0]]], [[[0, false, 0], [0, false, 0]], [[0, false, 0]]]] }"#,
        )
        .expect("structurally valid document");
        assert!(matches!(
            document.to_floors(),
            Err(MapError::Floor {
                floor: 1,
                source: FloorError::RaggedRow { row: 1, .. }
            })
        ));
    }

    #[test]
    fn captured_document_uses_positional_triples() {
        let floor = Floor::from_layout(&["#^"]).expect("valid layout");
        let json = MapDocument::capture([&floor]).to_json().expect("serializes");
        let compact: String = json.split_whitespace().collect();
        assert_eq!(compact, r#"{"floors":[[[[1,false,0],[0,true,1]]]]}"#);
    }
}
