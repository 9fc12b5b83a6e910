//! Enemy AI
//!
//! Behaviors are strategies chosen by entity kind (see
//! [`crate::entity::behavior_for`]); the controller drives them once per tick.

pub mod pursuit;

pub use pursuit::{can_enter, AiController, Pursuit};
