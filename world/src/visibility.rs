//! Floor visibility bookkeeping maintained alongside floor changes.

use isonav_core::FloorIndex;

/// Presentation state of a single floor relative to the active floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerVisibility {
    /// The active floor, drawn at full opacity.
    Visible,
    /// A floor below the active floor, drawn translucently.
    Dimmed,
    /// A floor above the active floor, not drawn.
    Hidden,
}

impl LayerVisibility {
    /// Reports whether the floor should be drawn at all.
    #[must_use]
    pub const fn is_drawn(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Tracks the active floor and the visibility it implies for every floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloorVisibility {
    active: FloorIndex,
    floor_count: usize,
}

impl FloorVisibility {
    pub(crate) const fn new(floor_count: usize) -> Self {
        Self {
            active: FloorIndex::GROUND,
            floor_count,
        }
    }

    /// Floor the player currently occupies.
    #[must_use]
    pub const fn active(&self) -> FloorIndex {
        self.active
    }

    /// Visibility of the provided floor, or `None` when it does not exist.
    #[must_use]
    pub fn of(&self, floor: FloorIndex) -> Option<LayerVisibility> {
        if floor.as_usize() >= self.floor_count {
            return None;
        }
        Some(match floor.cmp(&self.active) {
            std::cmp::Ordering::Less => LayerVisibility::Dimmed,
            std::cmp::Ordering::Equal => LayerVisibility::Visible,
            std::cmp::Ordering::Greater => LayerVisibility::Hidden,
        })
    }

    /// Visibility of every floor in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (FloorIndex, LayerVisibility)> + '_ {
        (0..self.floor_count)
            .filter_map(|index| u32::try_from(index).ok().map(FloorIndex::new))
            .filter_map(move |floor| self.of(floor).map(|visibility| (floor, visibility)))
    }

    pub(crate) fn activate(&mut self, floor: FloorIndex) {
        self.active = floor;
    }

    pub(crate) fn set_floor_count(&mut self, floor_count: usize) {
        self.floor_count = floor_count;
    }
}
