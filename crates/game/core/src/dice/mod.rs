//! Randomness & skill-check engine.
//!
//! Pure functions over an injected [`crate::env::RngOracle`]: primitive dice,
//! ability modifiers, d20 skill checks with outcome bands, and damage rolls.
//! Nothing here touches game state.

mod check;
mod damage;
mod roll;
mod stats;

pub use check::{CheckOutcome, RollMode, SkillCheckRequest, SkillCheckResult, classify, skill_check};
pub use damage::{DamageRoll, mitigate, percent_of, roll_damage};
pub use roll::{roll_die, roll_stat, roll_stats, stat_modifier};
pub use stats::{Skill, SkillLevels, Stat, Stats};
