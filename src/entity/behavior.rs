//! Behavior strategies selected by entity kind
//!
//! Every kind shares the one [`Entity`] representation; what differs is the
//! strategy: how it acts on its own each tick and what happens when the player
//! touches it.

use crate::ai::Pursuit;
use crate::core::config::SimulationConfig;
use crate::core::types::Vec2;
use crate::entity::kind::{Entity, EntityKind};
use crate::terrain::TileGrid;

/// What an autonomous entity sees of the player this tick
#[derive(Debug, Clone, Copy)]
pub struct TargetView {
    pub position: Vec2,
    /// Player can currently take contact damage
    pub vulnerable: bool,
}

/// Contact damage an entity wants to deal to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactHit {
    pub damage: i32,
}

/// Effect on the player of touching an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEffect {
    None,
    Coins(u32),
    Heal(i32),
}

pub trait Behavior: Sync {
    /// Per-tick autonomous step; may request contact damage on the player
    fn update(
        &self,
        _entity: &mut Entity,
        _target: &TargetView,
        _grid: &TileGrid,
        _config: &SimulationConfig,
    ) -> Option<ContactHit> {
        None
    }

    /// Effect of the player touching this entity
    fn on_contact(&self, _entity: &Entity, _config: &SimulationConfig) -> ContactEffect {
        ContactEffect::None
    }
}

/// Does nothing on its own and nothing on contact
pub struct Inert;

impl Behavior for Inert {}

/// Coins and hearts: consumed by the player on contact
pub struct Pickup;

impl Behavior for Pickup {
    fn on_contact(&self, entity: &Entity, config: &SimulationConfig) -> ContactEffect {
        match entity.kind {
            EntityKind::Item => ContactEffect::Coins(config.coin_value),
            EntityKind::Health => ContactEffect::Heal(config.health_pickup_amount),
            _ => ContactEffect::None,
        }
    }
}

static INERT: Inert = Inert;
static PICKUP: Pickup = Pickup;
static PURSUIT: Pursuit = Pursuit;

/// Strategy for a kind
pub fn behavior_for(kind: EntityKind) -> &'static dyn Behavior {
    match kind {
        EntityKind::Enemy => &PURSUIT,
        EntityKind::Item | EntityKind::Health => &PICKUP,
        EntityKind::Player | EntityKind::Npc => &INERT,
    }
}
