//! Experience and leveling
//!
//! Experience accrues on the player's [`Progress`]; the level itself lives on
//! the player entity so combat can read it as a damage multiplier. An award
//! can raise the level by at most one step, however large it is.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::entity::Entity;

/// Experience required to reach each next level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTable {
    /// `thresholds[0]` is the requirement for level 2
    thresholds: Vec<u32>,
}

impl LevelTable {
    pub fn new(thresholds: Vec<u32>) -> Self {
        Self { thresholds }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.level_thresholds.clone())
    }

    /// Requirement for reaching `level`; `None` past the cap or below 2
    pub fn threshold_for(&self, level: u32) -> Option<u32> {
        if level < 2 {
            return None;
        }
        self.thresholds.get((level - 2) as usize).copied()
    }

    /// Highest reachable level
    pub fn max_level(&self) -> u32 {
        self.thresholds.len() as u32 + 1
    }
}

/// Accumulated experience toward the next level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub experience: u32,
}

/// Result of one experience award
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    Accumulated { experience: u32 },
    LeveledUp { level: u32, experience: u32 },
}

impl AwardOutcome {
    pub fn leveled_up(&self) -> bool {
        matches!(self, AwardOutcome::LeveledUp { .. })
    }
}

pub struct ProgressionSystem {
    table: LevelTable,
    health_bonus: i32,
}

impl ProgressionSystem {
    pub fn new(table: LevelTable, health_bonus: i32) -> Self {
        Self { table, health_bonus }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(LevelTable::from_config(config), config.level_up_health_bonus)
    }

    pub fn table(&self) -> &LevelTable {
        &self.table
    }

    /// Add experience, leveling up once if the next threshold is met
    ///
    /// On a level-up the threshold is deducted and the remainder carries over,
    /// even when it would already cover the following level.
    pub fn award_experience(
        &self,
        player: &mut Entity,
        progress: &mut Progress,
        amount: u32,
    ) -> AwardOutcome {
        let total = progress.experience.saturating_add(amount);

        match self.table.threshold_for(player.level + 1) {
            Some(threshold) if total >= threshold => {
                player.level += 1;
                player.health += self.health_bonus;
                progress.experience = total - threshold;
                tracing::info!(
                    "{} reached level {} ({} xp carried over)",
                    player.name,
                    player.level,
                    progress.experience
                );
                AwardOutcome::LeveledUp {
                    level: player.level,
                    experience: progress.experience,
                }
            }
            _ => {
                progress.experience = total;
                AwardOutcome::Accumulated { experience: total }
            }
        }
    }
}
