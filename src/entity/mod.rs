//! Entities - one representation for every kind, composed with a behavior
//! strategy, stored in an arena registry

pub mod behavior;
pub mod kind;
pub mod registry;

pub use behavior::{behavior_for, Behavior, ContactEffect, ContactHit, TargetView};
pub use kind::{Entity, EntityKind, Liveness};
pub use registry::{level_for_distance, EntityRegistry};
