//! Terrain tile types and their effects

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};

/// Terrain type stored in each grid cell
///
/// The discriminants are the values used by the terrain text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum TileType {
    #[default]
    Grass = 0,
    Water = 1,
    Mountain = 2,
    Forest = 3,
}

impl TileType {
    pub const ALL: [TileType; 4] = [
        TileType::Grass,
        TileType::Water,
        TileType::Mountain,
        TileType::Forest,
    ];

    /// Convert a raw tile value, rejecting anything outside 0..=3
    pub fn from_value(value: i32) -> Result<Self> {
        match value {
            0 => Ok(TileType::Grass),
            1 => Ok(TileType::Water),
            2 => Ok(TileType::Mountain),
            3 => Ok(TileType::Forest),
            other => Err(GameError::InvalidTileType(other)),
        }
    }

    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Can entities walk onto this tile?
    pub fn is_passable(&self) -> bool {
        !matches!(self, TileType::Water)
    }
}

impl std::fmt::Display for TileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TileType::Grass => "grass",
            TileType::Water => "water",
            TileType::Mountain => "mountain",
            TileType::Forest => "forest",
        };
        f.write_str(name)
    }
}
