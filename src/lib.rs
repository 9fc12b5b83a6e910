//! Tileblade - Tile-Grid Action RPG Frame Simulation

pub mod ai;
pub mod combat;
pub mod core;
pub mod entity;
pub mod progression;
pub mod simulation;
pub mod terrain;
