use std::collections::BTreeMap;

use crate::dice::{Skill, SkillLevels};
use crate::env::{DropMode, LootCondition, LootOracle, LootRule, LootSource, RngOracle};
use crate::state::{DungeonId, Inventory, ItemId};

/// Passive perception margin: a gated drop is visible iff
/// `perception level >= dc - PERCEPTION_MARGIN`.
pub const PERCEPTION_MARGIN: u32 = 5;

/// Character facts loot conditions are evaluated against.
#[derive(Clone, Copy, Debug)]
pub struct LootContext<'a> {
    pub skills: &'a SkillLevels,
    pub completions: &'a BTreeMap<DungeonId, u32>,
    pub inventory: &'a Inventory,
}

impl<'a> LootContext<'a> {
    pub fn new(
        skills: &'a SkillLevels,
        completions: &'a BTreeMap<DungeonId, u32>,
        inventory: &'a Inventory,
    ) -> Self {
        Self {
            skills,
            completions,
            inventory,
        }
    }

    fn condition_met(&self, condition: Option<&LootCondition>) -> bool {
        match condition {
            None => true,
            Some(LootCondition::SkillAtLeast { skill, level }) => self.skills.get(*skill) >= *level,
            Some(LootCondition::CompletionsAtLeast { dungeon, count }) => {
                self.completions.get(dungeon).copied().unwrap_or(0) >= *count
            }
            Some(LootCondition::HasItem(item)) => self.inventory.has(*item),
            Some(LootCondition::LacksItem(item)) => !self.inventory.has(*item),
        }
    }

    fn visible(&self, perception_dc: Option<u32>) -> bool {
        perception_dc.is_none_or(|dc| self.skills.get(Skill::Perception) + PERCEPTION_MARGIN >= dc)
    }

    fn eligible(&self, rule: &LootRule) -> bool {
        self.condition_met(rule.condition.as_ref()) && self.visible(rule.perception_dc)
    }
}

/// One resolved drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootDrop {
    pub item: ItemId,
    pub quantity: u32,
    pub guaranteed: bool,
}

/// Resolve the drops of one source.
///
/// Every eligible guaranteed rule fires. Eligible weighted rules form a pool
/// drawn [`LootSource::weighted_draws`] times; an item never appears twice in
/// one call, so each draw excludes items already dropped.
pub fn resolve_loot<L>(
    rng: &mut (impl RngOracle + ?Sized),
    oracle: &L,
    source: LootSource,
    source_id: u32,
    context: &LootContext<'_>,
) -> Vec<LootDrop>
where
    L: LootOracle + ?Sized,
{
    let rules = oracle.loot_rules(source, source_id);
    let mut drops: Vec<LootDrop> = Vec::new();

    for rule in rules.iter().filter(|r| r.mode == DropMode::Guaranteed) {
        if context.eligible(rule) && !drops.iter().any(|d| d.item == rule.item) {
            drops.push(LootDrop {
                item: rule.item,
                quantity: rule.quantity.max(1),
                guaranteed: true,
            });
        }
    }

    let mut pool: Vec<(&LootRule, u32)> = rules
        .iter()
        .filter_map(|rule| match rule.mode {
            DropMode::Weighted(weight) if weight > 0 && context.eligible(rule) => Some((*rule, weight)),
            _ => None,
        })
        .collect();

    for _ in 0..source.weighted_draws() {
        pool.retain(|(rule, _)| !drops.iter().any(|d| d.item == rule.item));
        let weights: Vec<u32> = pool.iter().map(|(_, weight)| *weight).collect();
        let Some(index) = rng.weighted_index(&weights) else {
            break;
        };
        let (rule, _) = pool[index];
        drops.push(LootDrop {
            item: rule.item,
            quantity: rule.quantity.max(1),
            guaranteed: false,
        });
    }

    drops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, SequenceRng};

    struct Table(Vec<LootRule>);

    impl LootOracle for Table {
        fn loot_rules(&self, source: LootSource, source_id: u32) -> Vec<&LootRule> {
            self.0
                .iter()
                .filter(|r| r.source == source && r.source_id == source_id)
                .collect()
        }
    }

    fn context_parts() -> (SkillLevels, BTreeMap<DungeonId, u32>, Inventory) {
        (SkillLevels::new(), BTreeMap::new(), Inventory::new())
    }

    #[test]
    fn guaranteed_rule_with_met_condition_always_drops() {
        let table = Table(vec![
            LootRule::guaranteed(LootSource::Enemy, 1, ItemId(10)).with_condition(
                LootCondition::SkillAtLeast {
                    skill: Skill::Survival,
                    level: 5,
                },
            ),
            LootRule::weighted(LootSource::Enemy, 1, ItemId(11), 1),
        ]);
        let (skills, completions, inventory) = context_parts();
        let skills = skills.with(Skill::Survival, 5);
        let context = LootContext::new(&skills, &completions, &inventory);

        for seed in 0..20 {
            let drops = resolve_loot(&mut PcgRng::seeded(seed), &table, LootSource::Enemy, 1, &context);
            assert!(drops.iter().any(|d| d.item == ItemId(10) && d.guaranteed));
        }
    }

    #[test]
    fn unmet_condition_blocks_guaranteed_rule() {
        let table = Table(vec![
            LootRule::guaranteed(LootSource::Boss, 2, ItemId(1))
                .with_condition(LootCondition::CompletionsAtLeast { dungeon: DungeonId(1), count: 1 }),
            LootRule::guaranteed(LootSource::Boss, 2, ItemId(2)).with_condition(LootCondition::LacksItem(ItemId(9))),
        ]);
        let (skills, completions, mut inventory) = context_parts();
        inventory.add(ItemId(9), 1);
        let context = LootContext::new(&skills, &completions, &inventory);

        let drops = resolve_loot(&mut SequenceRng::default(), &table, LootSource::Boss, 2, &context);
        assert!(drops.is_empty());
    }

    #[test]
    fn chest_draws_at_most_two_distinct_weighted_items() {
        let table = Table(vec![
            LootRule::weighted(LootSource::Chest, 1, ItemId(1), 5),
            LootRule::weighted(LootSource::Chest, 1, ItemId(1), 5),
            LootRule::weighted(LootSource::Chest, 1, ItemId(2), 1),
            LootRule::weighted(LootSource::Chest, 1, ItemId(3), 1),
        ]);
        let (skills, completions, inventory) = context_parts();
        let context = LootContext::new(&skills, &completions, &inventory);

        for seed in 0..200 {
            let drops = resolve_loot(&mut PcgRng::seeded(seed), &table, LootSource::Chest, 1, &context);
            assert_eq!(drops.len(), 2);
            assert_ne!(drops[0].item, drops[1].item);
        }
    }

    #[test]
    fn single_candidate_chest_yields_one_item() {
        let table = Table(vec![LootRule::weighted(LootSource::Chest, 1, ItemId(1), 3)]);
        let (skills, completions, inventory) = context_parts();
        let context = LootContext::new(&skills, &completions, &inventory);

        let drops = resolve_loot(&mut SequenceRng::new([0, 0]), &table, LootSource::Chest, 1, &context);
        assert_eq!(drops, vec![LootDrop { item: ItemId(1), quantity: 1, guaranteed: false }]);
    }

    #[test]
    fn perception_gate_is_passive_dc_minus_five() {
        let table = Table(vec![
            LootRule::guaranteed(LootSource::Search, 1, ItemId(5)).with_perception(15),
        ]);
        let (skills, completions, inventory) = context_parts();

        let low = skills.clone().with(Skill::Perception, 9);
        let context = LootContext::new(&low, &completions, &inventory);
        assert!(resolve_loot(&mut SequenceRng::default(), &table, LootSource::Search, 1, &context).is_empty());

        let enough = skills.with(Skill::Perception, 10);
        let context = LootContext::new(&enough, &completions, &inventory);
        assert_eq!(
            resolve_loot(&mut SequenceRng::default(), &table, LootSource::Search, 1, &context).len(),
            1
        );
    }
}
