//! Player-only state kept beside the player entity

use serde::{Deserialize, Serialize};

use crate::combat::{Weapon, WeaponKind, WeaponSlot};
use crate::progression::Progress;

/// Everything about the player that other entity kinds do not have
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub progress: Progress,
    pub coins: u32,
    /// Weapons the player may equip, in pickup order
    pub inventory: Vec<WeaponKind>,
    pub weapon: WeaponSlot,
    /// Frames of remaining immunity to contact damage
    pub invincibility: u32,
}

impl PlayerState {
    /// Starting loadout: every weapon carried, sword in hand
    pub fn new() -> Self {
        Self {
            progress: Progress::default(),
            coins: 0,
            inventory: WeaponKind::ALL.to_vec(),
            weapon: WeaponSlot::Armed(Weapon::sword()),
            invincibility: 0,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0
    }

    pub fn tick_invincibility(&mut self) {
        self.invincibility = self.invincibility.saturating_sub(1);
    }

    pub fn carries(&self, kind: WeaponKind) -> bool {
        self.inventory.contains(&kind)
    }

    /// Swing in progress with the equipped weapon
    pub fn is_attacking(&self) -> bool {
        self.weapon.weapon().map_or(false, |w| w.is_swinging())
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}
