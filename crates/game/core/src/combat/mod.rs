//! Combat resolution system.
//!
//! Pure functions over the injected random source: enemy turns against the
//! player, damage applied to enemies (with death, loot and gold), cooldown
//! ticking, and the player's own attack. Applying the player's HP loss is
//! left to the engine.
//!
//! # Core Functions
//!
//! - `process_enemy_turn`: ability selection and the player's defensive check
//! - `damage_enemy`: resistance, armor floor, death rewards, combat end
//! - `tick_cooldowns`: once per combat round
//! - `resolve_player_attack`: attack DC from armor, offensive check, damage

mod damage;
mod enemy;
mod resolve;

pub use damage::{DamageType, Resistances, apply_damage};
pub use enemy::{AbilityState, EnemyInstance, scale, tier_multiplier};
pub use resolve::{
    AttackProfile, AttackReport, Combatant, DamageReport, EnemyDefeat, EnemyTurn, attack_dc,
    damage_enemy, process_enemy_turn, resolve_player_attack, tick_cooldowns,
};
