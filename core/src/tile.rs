use core::fmt;

use serde::{Deserialize, Serialize};

use crate::*;

/// Value of a freshly spawned tile in the common case.
pub const BASE_VALUE: u32 = 2;

/// Value of the less likely spawned tile.
pub const BONUS_VALUE: u32 = 4;

/// Largest tile a 4×4 board can hold. Tiles of this value no longer merge.
pub const MAX_TILE_VALUE: u32 = 1 << 17;

/// Stable logical identity of a tile, used by renderers to key one element through slides and
/// merges.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
    pub row: Coord,
    pub col: Coord,
}

impl Tile {
    pub const fn new(id: TileId, value: u32, (row, col): Coord2) -> Self {
        Self { id, value, row, col }
    }

    pub const fn position(self) -> Coord2 {
        (self.row, self.col)
    }

    /// Equal values fold together, except at [`MAX_TILE_VALUE`].
    pub const fn merges_with(self, other: Tile) -> bool {
        self.value == other.value && self.value < MAX_TILE_VALUE
    }

    /// Same tile, recorded at a new position.
    pub(crate) const fn placed_at(self, (row, col): Coord2) -> Self {
        Self { row, col, ..self }
    }
}

/// Tiles only ever hold powers of two from 2 up to [`MAX_TILE_VALUE`].
pub const fn is_valid_value(value: u32) -> bool {
    value >= BASE_VALUE && value <= MAX_TILE_VALUE && value.is_power_of_two()
}
