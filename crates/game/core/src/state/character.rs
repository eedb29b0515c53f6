use std::collections::BTreeMap;

use crate::dice::{SkillLevels, Stats, stat_modifier};
use crate::state::{CharacterId, DungeonId};

/// Persistent player character. Outlives runs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub stats: Stats,
    pub skills: SkillLevels,
    pub hp: u32,
    pub max_hp: u32,
    pub gold: u32,
    pub xp: u32,
    /// Completed runs per dungeon.
    #[cfg_attr(feature = "serde", serde(default))]
    pub completions: BTreeMap<DungeonId, u32>,
}

impl Character {
    /// Fresh character at full health.
    pub fn new(id: CharacterId, name: impl Into<String>, stats: Stats, gold: u32) -> Self {
        let max_hp = Self::starting_max_hp(&stats);
        Self {
            id,
            name: name.into(),
            stats,
            skills: SkillLevels::new(),
            hp: max_hp,
            max_hp,
            gold,
            xp: 0,
            completions: BTreeMap::new(),
        }
    }

    /// `10 + CON + 2 × max(0, modifier(CON))`.
    pub fn starting_max_hp(stats: &Stats) -> u32 {
        let bonus = stat_modifier(stats.constitution).max(0) as u32;
        10 + stats.constitution + 2 * bonus
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Subtracts HP, saturating at zero. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Restores HP up to the maximum. Returns the HP actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_hp.saturating_sub(self.hp));
        self.hp += gained;
        gained
    }

    pub fn completions_of(&self, dungeon: DungeonId) -> u32 {
        self.completions.get(&dungeon).copied().unwrap_or(0)
    }

    pub fn record_completion(&mut self, dungeon: DungeonId) {
        *self.completions.entry(dungeon).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_hp_adds_constitution_bonus() {
        assert_eq!(Character::starting_max_hp(&Stats::new(10, 10, 14, 10, 10, 10)), 28);
        assert_eq!(Character::starting_max_hp(&Stats::new(10, 10, 8, 10, 10, 10)), 18);
    }

    #[test]
    fn hp_saturates_at_both_ends() {
        let mut hero = Character::new(CharacterId(1), "Ada", Stats::default(), 0);
        assert_eq!(hero.max_hp, 20);
        assert_eq!(hero.take_damage(25), 20);
        assert_eq!(hero.hp, 0);
        assert!(!hero.is_alive());
        assert_eq!(hero.heal(50), 20);
        assert_eq!(hero.hp, 20);
    }
}
