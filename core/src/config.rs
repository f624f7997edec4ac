//! Tunable navigation parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    FloorIndex, TileGeometry, DEFAULT_FOOTPRINT, DEFAULT_INTERACTION_COOLDOWN,
    DEFAULT_PLAYER_SPEED,
};

/// Parameters that shape player movement and projection.
///
/// Every field falls back to its default when omitted from a configuration
/// document.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Tile dimensions used by the projection.
    pub geometry: TileGeometry,
    /// Grid units travelled along each requested axis per step.
    pub player_speed: f32,
    /// Side length of the player's collision square in grid units.
    pub footprint: f32,
    /// Steps that must elapse between stairs interactions.
    pub interaction_cooldown: u32,
    /// Floor the player spawns on.
    pub spawn_floor: FloorIndex,
}

impl NavigationConfig {
    /// Rejects values that would make movement or projection meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("player_speed", self.player_speed)?;
        ensure_positive("footprint", self.footprint)?;
        ensure_positive("geometry.tile_width", self.geometry.tile_width)?;
        ensure_positive("geometry.tile_height", self.geometry.tile_height)?;
        ensure_non_negative("geometry.tile_depth", self.geometry.tile_depth)?;
        ensure_non_negative("geometry.floor_gap", self.geometry.floor_gap)?;
        Ok(())
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            geometry: TileGeometry::DEFAULT,
            player_speed: DEFAULT_PLAYER_SPEED,
            footprint: DEFAULT_FOOTPRINT,
            interaction_cooldown: DEFAULT_INTERACTION_COOLDOWN,
            spawn_floor: FloorIndex::GROUND,
        }
    }
}

/// Errors raised while validating a [`NavigationConfig`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The field must be finite and strictly positive.
    #[error("{field} must be a positive finite number (received {value})")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// The field must be finite and zero or greater.
    #[error("{field} must be a non-negative finite number (received {value})")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
}

fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
