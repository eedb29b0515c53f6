//! Damage types and resistance profiles.

use strum::{Display, EnumString};

// ============================================================================
// Damage Type
// ============================================================================

/// Damage type for resistances and damage calculation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    /// Physical damage (melee, projectiles).
    #[default]
    Physical,
    /// Fire damage (burns, explosions).
    Fire,
    /// Cold damage (ice, frost).
    Cold,
    /// Lightning damage (electricity, storms).
    Lightning,
    /// Poison damage (toxins, venom).
    Poison,
    /// Arcane damage (pure magic).
    Arcane,
    /// True damage (ignores all resistances).
    True,
}

// ============================================================================
// Resistance Profile
// ============================================================================

/// Resistances, weaknesses and immunities of a damage target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Resistances {
    pub resist: Vec<DamageType>,
    pub weak: Vec<DamageType>,
    pub immune: Vec<DamageType>,
}

impl Resistances {
    pub const RESISTANT_PERCENT: u32 = 50;
    pub const WEAK_PERCENT: u32 = 150;

    /// Damage multiplier in percent for `damage_type`.
    ///
    /// Immunity wins, a type that is both resisted and a weakness cancels to
    /// normal, and true damage ignores the whole profile.
    pub fn percent_for(&self, damage_type: DamageType) -> u32 {
        if damage_type == DamageType::True {
            return 100;
        }
        if self.immune.contains(&damage_type) {
            return 0;
        }
        match (
            self.resist.contains(&damage_type),
            self.weak.contains(&damage_type),
        ) {
            (true, false) => Self::RESISTANT_PERCENT,
            (false, true) => Self::WEAK_PERCENT,
            _ => 100,
        }
    }
}

/// Apply damage to current HP.
///
/// Returns the new HP value, clamped to 0.
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resistance_percent_precedence() {
        let profile = Resistances {
            resist: vec![DamageType::Fire, DamageType::Cold],
            weak: vec![DamageType::Cold, DamageType::Lightning],
            immune: vec![DamageType::Poison],
        };
        assert_eq!(profile.percent_for(DamageType::Fire), 50);
        assert_eq!(profile.percent_for(DamageType::Cold), 100);
        assert_eq!(profile.percent_for(DamageType::Lightning), 150);
        assert_eq!(profile.percent_for(DamageType::Poison), 0);
        assert_eq!(profile.percent_for(DamageType::Physical), 100);
        assert_eq!(profile.percent_for(DamageType::True), 100);
    }
}
