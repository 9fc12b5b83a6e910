//! Commands accepted from front ends
//!
//! Every input a collaborator can give the simulation is a [`Command`];
//! [`crate::simulation::Simulation::execute`] applies it and reports what
//! happened. Commands aimed at a disposed player are ignored, not errors.

use serde::{Deserialize, Serialize};

use crate::combat::{AttackDirection, WeaponKind};
use crate::core::types::EntityId;
use crate::entity::EntityKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Step one tile; exactly one of `dx`, `dy` must be non-zero
    Move { dx: i32, dy: i32 },
    /// Queue a swing for the next tick
    Attack(AttackDirection),
    ChangeTile { x: i32, y: i32, tile: i32 },
    ResetPlayer,
    Populate {
        count: usize,
        kind: EntityKind,
        size: u32,
        health: i32,
    },
    Equip(WeaponKind),
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CommandOutcome {
    Applied,
    /// Terrain or grid edge refused the move
    Blocked,
    /// Not applicable right now (disposed player, diagonal move, busy weapon)
    Ignored,
    Spawned(Vec<EntityId>),
}

impl Command {
    /// Parse a console line such as `move 1 0`, `attack left` or `populate 5 enemy`
    ///
    /// `populate` takes optional size and health after the kind; the caller
    /// fills in defaults for the ones left out.
    pub fn parse(line: &str, default_size: u32, default_health: i32) -> Option<Command> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (head, args) = parts.split_first()?;

        match head.to_ascii_lowercase().as_str() {
            "move" | "m" => {
                let dx = args.first()?.parse().ok()?;
                let dy = args.get(1)?.parse().ok()?;
                Some(Command::Move { dx, dy })
            }
            "up" | "w" => Some(Command::Move { dx: 0, dy: -1 }),
            "down" | "s" => Some(Command::Move { dx: 0, dy: 1 }),
            "left" | "a" => Some(Command::Move { dx: -1, dy: 0 }),
            "right" | "d" => Some(Command::Move { dx: 1, dy: 0 }),
            "attack" | "hit" => Some(Command::Attack(AttackDirection::parse(args.first()?)?)),
            "tile" | "set" => Some(Command::ChangeTile {
                x: args.first()?.parse().ok()?,
                y: args.get(1)?.parse().ok()?,
                tile: args.get(2)?.parse().ok()?,
            }),
            "reset" => Some(Command::ResetPlayer),
            "populate" | "spawn" => {
                let count = args.first()?.parse().ok()?;
                let kind = EntityKind::parse(args.get(1)?)?;
                let size = match args.get(2) {
                    Some(s) => s.parse().ok()?,
                    None => default_size,
                };
                let health = match args.get(3) {
                    Some(s) => s.parse().ok()?,
                    None => default_health,
                };
                Some(Command::Populate {
                    count,
                    kind,
                    size,
                    health,
                })
            }
            "equip" => Some(Command::Equip(WeaponKind::parse(args.first()?)?)),
            _ => None,
        }
    }
}
