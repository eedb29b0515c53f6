//! Damage rolls.

use crate::env::RngOracle;

/// Lowest and highest variance percent applied to base damage.
pub const VARIANCE_MIN_PERCENT: u32 = 80;
pub const VARIANCE_MAX_PERCENT: u32 = 120;

/// Inputs of one damage roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRoll {
    pub base: u32,
    pub critical: bool,
    /// 100 = normal, 50 = resistant, 150 = weak, 0 = immune.
    pub resistance_percent: u32,
    /// Flat reduction applied last.
    pub armor: u32,
}

impl DamageRoll {
    pub const fn new(base: u32) -> Self {
        Self {
            base,
            critical: false,
            resistance_percent: 100,
            armor: 0,
        }
    }

    pub const fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    pub const fn resistance(mut self, percent: u32) -> Self {
        self.resistance_percent = percent;
        self
    }

    pub const fn armor(mut self, armor: u32) -> Self {
        self.armor = armor;
        self
    }
}

/// Roll damage.
///
/// ```text
/// varied   = round(base × uniform(80..=120) / 100)
/// doubled  = varied × 2          (critical only)
/// resisted = round(doubled × resistance / 100)
/// final    = max(resisted - armor, 1)   when resisted > 0, else 0
/// ```
///
/// Always consumes exactly one draw for the variance.
pub fn roll_damage(rng: &mut (impl RngOracle + ?Sized), roll: DamageRoll) -> u32 {
    let variance = rng.range(VARIANCE_MIN_PERCENT, VARIANCE_MAX_PERCENT);
    let mut damage = percent_of(roll.base, variance);
    if roll.critical {
        damage = damage.saturating_mul(2);
    }
    mitigate(damage, roll.resistance_percent, roll.armor)
}

/// Apply a resistance percent, then flat armor with a floor of 1 whenever any
/// damage gets through the resistance step.
pub fn mitigate(raw: u32, resistance_percent: u32, armor: u32) -> u32 {
    let resisted = percent_of(raw, resistance_percent);
    if resisted == 0 {
        return 0;
    }
    resisted.saturating_sub(armor).max(1)
}

/// `round(value × percent / 100)` with halves rounded up.
pub fn percent_of(value: u32, percent: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(percent);
    u32::try_from((scaled + 50) / 100).unwrap_or(u32::MAX)
}
