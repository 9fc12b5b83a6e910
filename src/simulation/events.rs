use serde::Serialize;

use crate::combat::{AttackDirection, WeaponKind};
use crate::core::types::{EntityId, Tick};
use crate::entity::EntityKind;

/// Events generated during a simulation tick
///
/// Returned by [`crate::simulation::Simulation::tick`] in the order they
/// happened, for logs and front ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event")]
pub enum SimulationEvent {
    /// A swing went live this tick
    SwingStarted {
        weapon: WeaponKind,
        direction: AttackDirection,
    },
    /// A weapon cell connected
    EntityDamaged {
        target: EntityId,
        attacker: EntityId,
        damage: i32,
        remaining: i32,
    },
    EntityKilled {
        target: EntityId,
        kind: EntityKind,
        attacker: EntityId,
    },
    ExperienceGained {
        amount: u32,
        total: u32,
    },
    LevelUp {
        level: u32,
        health: i32,
    },
    /// Enemy contact damage on the player
    PlayerHit {
        by: EntityId,
        damage: i32,
        remaining: i32,
    },
    PlayerDied {
        by: EntityId,
    },
    CoinsCollected {
        pickup: EntityId,
        amount: u32,
        total: u32,
    },
    Healed {
        pickup: EntityId,
        amount: i32,
        health: i32,
    },
    /// Disposed entities dropped at the end of a tick
    CleanedUp {
        tick: Tick,
        removed: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_tag() {
        let event = SimulationEvent::LevelUp { level: 3, health: 140 };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"LevelUp\""));
        assert!(json.contains("\"level\":3"));
    }
}
