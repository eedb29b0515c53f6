//! Ability scores, skills, and skill levels.

use std::collections::BTreeMap;

use strum::{Display, EnumIter, EnumString};

/// The six ability scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stat {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

/// Raw ability scores (3-18 when rolled).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub strength: u32,
    pub dexterity: u32,
    pub constitution: u32,
    pub intelligence: u32,
    pub wisdom: u32,
    pub charisma: u32,
}

impl Stats {
    pub const fn new(
        strength: u32,
        dexterity: u32,
        constitution: u32,
        intelligence: u32,
        wisdom: u32,
        charisma: u32,
    ) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }

    pub const fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Dexterity => self.dexterity,
            Stat::Constitution => self.constitution,
            Stat::Intelligence => self.intelligence,
            Stat::Wisdom => self.wisdom,
            Stat::Charisma => self.charisma,
        }
    }
}

impl Default for Stats {
    /// All scores at 10 (modifier +0).
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

/// Skills rolled with [`crate::dice::skill_check`].
///
/// Each skill is governed by one ability score whose modifier feeds the check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Skill {
    Melee,
    Ranged,
    /// Avoiding incoming attacks.
    Dodge,
    Athletics,
    Acrobatics,
    Stealth,
    Lockpicking,
    Perception,
    Survival,
    Arcana,
    Persuasion,
    Endurance,
}

impl Skill {
    pub const fn governing_stat(self) -> Stat {
        match self {
            Skill::Melee | Skill::Athletics => Stat::Strength,
            Skill::Ranged
            | Skill::Dodge
            | Skill::Acrobatics
            | Skill::Stealth
            | Skill::Lockpicking => Stat::Dexterity,
            Skill::Endurance => Stat::Constitution,
            Skill::Arcana => Stat::Intelligence,
            Skill::Perception | Skill::Survival => Stat::Wisdom,
            Skill::Persuasion => Stat::Charisma,
        }
    }
}

/// Trained skill levels (0-100). Untrained skills read as 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SkillLevels(BTreeMap<Skill, u32>);

impl SkillLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, skill: Skill, level: u32) -> Self {
        self.set(skill, level);
        self
    }

    pub fn set(&mut self, skill: Skill, level: u32) {
        self.0.insert(skill, level);
    }

    pub fn get(&self, skill: Skill) -> u32 {
        self.0.get(&skill).copied().unwrap_or(0)
    }

    /// Check bonus from training: one point per full ten levels.
    pub fn bonus(&self, skill: Skill) -> i32 {
        (self.get(skill) / 10) as i32
    }
}
