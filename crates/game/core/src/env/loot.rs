use strum::{Display, EnumString};

use crate::dice::Skill;
use crate::state::{DungeonId, ItemId};

pub trait LootOracle {
    /// Rules registered for a source, in declaration order.
    ///
    /// `source_id` is the enemy template id for enemy and boss sources and
    /// the dungeon id for chests and searches.
    fn loot_rules(&self, source: LootSource, source_id: u32) -> Vec<&LootRule>;
}

/// Where a drop comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LootSource {
    Enemy,
    Boss,
    Chest,
    Search,
}

impl LootSource {
    /// Weighted draws per resolution.
    pub const fn weighted_draws(self) -> usize {
        match self {
            Self::Chest | Self::Boss => 2,
            Self::Enemy | Self::Search => 1,
        }
    }
}

/// One loot table row.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootRule {
    pub source: LootSource,
    pub source_id: u32,
    pub item: ItemId,
    #[cfg_attr(feature = "serde", serde(default = "default_quantity"))]
    pub quantity: u32,
    pub mode: DropMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: Option<LootCondition>,
    /// Passive perception gate: visible iff perception level >= dc - 5.
    #[cfg_attr(feature = "serde", serde(default))]
    pub perception_dc: Option<u32>,
}

#[cfg(feature = "serde")]
fn default_quantity() -> u32 {
    1
}

impl LootRule {
    pub fn guaranteed(source: LootSource, source_id: u32, item: ItemId) -> Self {
        Self {
            source,
            source_id,
            item,
            quantity: 1,
            mode: DropMode::Guaranteed,
            condition: None,
            perception_dc: None,
        }
    }

    pub fn weighted(source: LootSource, source_id: u32, item: ItemId, weight: u32) -> Self {
        Self {
            mode: DropMode::Weighted(weight),
            ..Self::guaranteed(source, source_id, item)
        }
    }

    pub fn with_condition(mut self, condition: LootCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_perception(mut self, dc: u32) -> Self {
        self.perception_dc = Some(dc);
        self
    }
}

/// Whether a rule always fires or competes in the weighted pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DropMode {
    Guaranteed,
    Weighted(u32),
}

/// Eligibility predicate of a loot rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LootCondition {
    SkillAtLeast { skill: Skill, level: u32 },
    CompletionsAtLeast { dungeon: DungeonId, count: u32 },
    HasItem(ItemId),
    LacksItem(ItemId),
}
