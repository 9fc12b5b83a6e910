//! Attack facing and pattern rotation
//!
//! Patterns are authored facing DOWN (+y). Each facing maps to a 2x2 integer
//! matrix applied to every offset; NONE is the identity.

use serde::{Deserialize, Serialize};

use crate::combat::weapons::TileOffset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AttackDirection {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

/// Row-major `[[a, b], [c, d]]`: `(dx, dy) -> (a*dx + b*dy, c*dx + d*dy)`
type Rotation = [[i32; 2]; 2];

const IDENTITY: Rotation = [[1, 0], [0, 1]];
/// (dx, -dy)
const FLIP_Y: Rotation = [[1, 0], [0, -1]];
/// (-dy, dx)
const TURN_LEFT: Rotation = [[0, -1], [1, 0]];
/// (dy, -dx)
const TURN_RIGHT: Rotation = [[0, 1], [-1, 0]];

impl AttackDirection {
    pub const CARDINALS: [AttackDirection; 4] = [
        AttackDirection::Up,
        AttackDirection::Down,
        AttackDirection::Left,
        AttackDirection::Right,
    ];

    fn matrix(self) -> Rotation {
        match self {
            AttackDirection::Up => FLIP_Y,
            AttackDirection::Down | AttackDirection::None => IDENTITY,
            AttackDirection::Left => TURN_LEFT,
            AttackDirection::Right => TURN_RIGHT,
        }
    }

    /// Rotate a DOWN-facing offset into this facing
    pub fn rotate(self, offset: TileOffset) -> TileOffset {
        let [[a, b], [c, d]] = self.matrix();
        TileOffset::new(a * offset.dx + b * offset.dy, c * offset.dx + d * offset.dy)
    }

    /// True for the four facings that can start a swing
    pub fn is_cardinal(self) -> bool {
        self != AttackDirection::None
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "up" | "u" | "north" => Some(AttackDirection::Up),
            "down" | "d" | "south" => Some(AttackDirection::Down),
            "left" | "l" | "west" => Some(AttackDirection::Left),
            "right" | "r" | "east" => Some(AttackDirection::Right),
            "none" => Some(AttackDirection::None),
            _ => None,
        }
    }
}
