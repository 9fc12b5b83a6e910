//! Simulation - the clock, the command surface and read-only views

pub mod command;
pub mod events;
pub mod player;
pub mod snapshot;
pub mod tick;

pub use command::{Command, CommandOutcome};
pub use events::SimulationEvent;
pub use player::PlayerState;
pub use snapshot::{EntitySnapshot, PlayerStats};
pub use tick::Simulation;
