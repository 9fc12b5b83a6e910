//! Melee combat - weapons, facing, and swing resolution

pub mod direction;
pub mod resolver;
pub mod weapons;

pub use direction::AttackDirection;
pub use resolver::CombatResolver;
pub use weapons::{AttackPattern, TileOffset, Weapon, WeaponCatalog, WeaponKind, WeaponSlot};
