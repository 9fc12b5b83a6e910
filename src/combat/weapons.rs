//! Weapons and their attack patterns
//!
//! A weapon is damage plus a set of tile offsets it strikes, authored facing
//! DOWN. Timers are frame counts owned by the weapon itself:
//! `attack_timer > 0` means a swing is live, `cooldown_timer > 0` blocks a new one.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::constants::ATTACK_DURATION_FRAMES;
use crate::core::error::{GameError, Result};

/// Weapon family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Short three-tile arc
    Sword,
    /// Wide, heavy, slow to recover
    Hammer,
    /// Long thin line
    Pike,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [WeaponKind::Sword, WeaponKind::Hammer, WeaponKind::Pike];

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sword" => Some(WeaponKind::Sword),
            "hammer" => Some(WeaponKind::Hammer),
            "pike" => Some(WeaponKind::Pike),
            _ => None,
        }
    }
}

impl std::fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WeaponKind::Sword => "Sword",
            WeaponKind::Hammer => "Hammer",
            WeaponKind::Pike => "Pike",
        };
        f.write_str(name)
    }
}

/// Tile-unit offset relative to the wielder's tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileOffset {
    pub dx: i32,
    pub dy: i32,
}

impl TileOffset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// Ordered cells a swing covers, in the DOWN orientation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackPattern(Vec<TileOffset>);

impl AttackPattern {
    pub fn from_cells(cells: &[(i32, i32)]) -> Self {
        Self(cells.iter().map(|&(dx, dy)| TileOffset::new(dx, dy)).collect())
    }

    pub fn cells(&self) -> &[TileOffset] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

const SWORD_PATTERN: [(i32, i32); 5] = [(0, 0), (0, 1), (0, 2), (-1, 1), (1, 1)];
const HAMMER_PATTERN: [(i32, i32); 10] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (-1, 1),
    (-1, 2),
    (-1, 3),
    (1, 1),
    (1, 2),
    (1, 3),
];
const PIKE_PATTERN: [(i32, i32); 6] = [(0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5)];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub kind: WeaponKind,
    pub damage: u32,
    pub attack_pattern: AttackPattern,
    /// Frames a swing stays live
    pub attack_duration: u32,
    /// Frames before another swing may start
    pub attack_cooldown: u32,
    pub attack_timer: u32,
    pub cooldown_timer: u32,
}

impl Weapon {
    /// Validating constructor; timers start at zero (idle, ready)
    pub fn new(
        kind: WeaponKind,
        damage: u32,
        attack_pattern: AttackPattern,
        attack_duration: u32,
        attack_cooldown: u32,
    ) -> Result<Self> {
        if attack_pattern.is_empty() {
            return Err(GameError::InvalidConfiguration(format!(
                "{} has an empty attack pattern",
                kind
            )));
        }
        if attack_duration == 0 {
            return Err(GameError::InvalidConfiguration(format!(
                "{} attack duration must be positive",
                kind
            )));
        }
        Ok(Self {
            name: kind.to_string(),
            kind,
            damage,
            attack_pattern,
            attack_duration,
            attack_cooldown,
            attack_timer: 0,
            cooldown_timer: 0,
        })
    }

    pub fn sword() -> Self {
        Self::builtin(WeaponKind::Sword, 10, &SWORD_PATTERN, 5)
    }

    pub fn hammer() -> Self {
        Self::builtin(WeaponKind::Hammer, 45, &HAMMER_PATTERN, 45)
    }

    pub fn pike() -> Self {
        Self::builtin(WeaponKind::Pike, 15, &PIKE_PATTERN, 45)
    }

    pub fn of_kind(kind: WeaponKind) -> Self {
        match kind {
            WeaponKind::Sword => Self::sword(),
            WeaponKind::Hammer => Self::hammer(),
            WeaponKind::Pike => Self::pike(),
        }
    }

    // Built-in tables are non-empty and use a positive duration
    fn builtin(kind: WeaponKind, damage: u32, cells: &[(i32, i32)], cooldown: u32) -> Self {
        Self {
            name: kind.to_string(),
            kind,
            damage,
            attack_pattern: AttackPattern::from_cells(cells),
            attack_duration: ATTACK_DURATION_FRAMES,
            attack_cooldown: cooldown,
            attack_timer: 0,
            cooldown_timer: 0,
        }
    }

    pub fn is_swinging(&self) -> bool {
        self.attack_timer > 0
    }

    pub fn is_idle(&self) -> bool {
        self.attack_timer == 0
    }

    pub fn ready(&self) -> bool {
        self.cooldown_timer == 0
    }

    /// Start (or restart) a swing; caller checks `ready()` first
    pub fn begin_swing(&mut self) {
        self.attack_timer = self.attack_duration;
        self.cooldown_timer = self.attack_cooldown;
    }

    /// One frame passes
    pub fn tick(&mut self) {
        self.attack_timer = self.attack_timer.saturating_sub(1);
        self.cooldown_timer = self.cooldown_timer.saturating_sub(1);
    }

    /// Back to idle and ready, as when freshly drawn
    pub fn reset_timers(&mut self) {
        self.attack_timer = 0;
        self.cooldown_timer = 0;
    }
}

/// Weapon slot on a wielder; there is no "maybe has a weapon" attribute
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum WeaponSlot {
    #[default]
    Empty,
    Armed(Weapon),
}

impl WeaponSlot {
    pub fn weapon(&self) -> Option<&Weapon> {
        match self {
            WeaponSlot::Armed(weapon) => Some(weapon),
            WeaponSlot::Empty => None,
        }
    }

    pub fn weapon_mut(&mut self) -> Option<&mut Weapon> {
        match self {
            WeaponSlot::Armed(weapon) => Some(weapon),
            WeaponSlot::Empty => None,
        }
    }

    pub fn kind(&self) -> Option<WeaponKind> {
        self.weapon().map(|w| w.kind)
    }
}

/// Weapon templates by kind
pub struct WeaponCatalog {
    weapons: AHashMap<WeaponKind, Weapon>,
}

impl WeaponCatalog {
    pub fn new() -> Self {
        Self {
            weapons: AHashMap::new(),
        }
    }

    /// Sword, hammer and pike with their standard stats
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for kind in WeaponKind::ALL {
            catalog.register(Weapon::of_kind(kind));
        }
        catalog
    }

    pub fn register(&mut self, weapon: Weapon) {
        self.weapons.insert(weapon.kind, weapon);
    }

    pub fn get(&self, kind: WeaponKind) -> Option<&Weapon> {
        self.weapons.get(&kind)
    }

    /// Fresh copy of a template with idle timers
    pub fn instantiate(&self, kind: WeaponKind) -> Option<Weapon> {
        self.get(kind).map(|w| {
            let mut weapon = w.clone();
            weapon.reset_timers();
            weapon
        })
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}
