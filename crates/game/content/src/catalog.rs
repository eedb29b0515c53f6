//! In-memory content tables backing every content oracle.

use std::collections::BTreeMap;

use game_core::combat::DamageType;
use game_core::env::{AbilityDefinition, DropMode, GoldRange};
use game_core::{
    DungeonDefinition, DungeonId, DungeonOracle, EnemyOracle, EnemyTemplate, EnemyTemplateId,
    ItemDefinition, ItemId, ItemOracle, LootOracle, LootRule, LootSource, SpawnRule,
};
use tracing::warn;

/// A content defect repaired (or a row dropped) by [`ContentCatalog::sanitize`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentIssue {
    #[error("{0} has zero hp; raised to 1")]
    ZeroHp(EnemyTemplateId),

    #[error("{0} has a malformed ability; ability list cleared")]
    MalformedAbilities(EnemyTemplateId),

    #[error("{0} lists true damage in its resistances; resistances cleared")]
    MalformedResistances(EnemyTemplateId),

    #[error("{0} has an inverted gold range; bounds swapped")]
    InvertedGold(String),

    #[error("{0} has no floors; set to 1")]
    ZeroFloors(DungeonId),

    #[error("{0} has an inverted DC range; bounds swapped")]
    InvertedDcRange(DungeonId),

    #[error("{0} has an unusable scaling factor; reset to 1.0")]
    BadScaling(DungeonId),

    #[error("spawn rule for unknown {0}; dropped")]
    UnknownSpawnDungeon(DungeonId),

    #[error("spawn rule in {dungeon} names unknown {enemy}; dropped")]
    UnknownSpawnEnemy {
        dungeon: DungeonId,
        enemy: EnemyTemplateId,
    },

    #[error("{origin} loot rule {source_id} names unknown {item}; dropped")]
    UnknownLootItem {
        origin: LootSource,
        source_id: u32,
        item: ItemId,
    },

    #[error("{origin} loot rule {source_id} for {item} has zero weight; dropped")]
    ZeroWeight {
        origin: LootSource,
        source_id: u32,
        item: ItemId,
    },
}

/// Every content table, keyed by id.
///
/// Built programmatically with the `with_*` builders or loaded through
/// [`crate::ContentFactory`].
#[derive(Clone, Debug, Default)]
pub struct ContentCatalog {
    items: BTreeMap<ItemId, ItemDefinition>,
    enemies: BTreeMap<EnemyTemplateId, EnemyTemplate>,
    dungeons: BTreeMap<DungeonId, DungeonDefinition>,
    spawns: BTreeMap<DungeonId, Vec<SpawnRule>>,
    loot: Vec<LootRule>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: ItemDefinition) -> Self {
        self.insert_item(item);
        self
    }

    pub fn with_enemy(mut self, enemy: EnemyTemplate) -> Self {
        self.insert_enemy(enemy);
        self
    }

    pub fn with_dungeon(mut self, dungeon: DungeonDefinition) -> Self {
        self.insert_dungeon(dungeon);
        self
    }

    pub fn with_spawn_rule(mut self, rule: SpawnRule) -> Self {
        self.insert_spawn_rule(rule);
        self
    }

    pub fn with_loot_rule(mut self, rule: LootRule) -> Self {
        self.insert_loot_rule(rule);
        self
    }

    /// Returns the definition this one replaced, if any.
    pub fn insert_item(&mut self, item: ItemDefinition) -> Option<ItemDefinition> {
        self.items.insert(item.id, item)
    }

    pub fn insert_enemy(&mut self, enemy: EnemyTemplate) -> Option<EnemyTemplate> {
        self.enemies.insert(enemy.id, enemy)
    }

    pub fn insert_dungeon(&mut self, dungeon: DungeonDefinition) -> Option<DungeonDefinition> {
        self.dungeons.insert(dungeon.id, dungeon)
    }

    pub fn insert_spawn_rule(&mut self, rule: SpawnRule) {
        self.spawns.entry(rule.dungeon).or_default().push(rule);
    }

    pub fn insert_loot_rule(&mut self, rule: LootRule) {
        self.loot.push(rule);
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    pub fn enemies(&self) -> impl Iterator<Item = &EnemyTemplate> {
        self.enemies.values()
    }

    pub fn dungeons(&self) -> impl Iterator<Item = &DungeonDefinition> {
        self.dungeons.values()
    }

    pub fn loot_rule_count(&self) -> usize {
        self.loot.len()
    }

    pub fn spawn_rule_count(&self) -> usize {
        self.spawns.values().map(Vec::len).sum()
    }

    /// Repairs malformed rows in place, degrading to safe defaults, and drops
    /// rules that reference missing content. Each repair is logged and
    /// returned.
    pub fn sanitize(&mut self) -> Vec<ContentIssue> {
        let mut issues = Vec::new();

        for enemy in self.enemies.values_mut() {
            sanitize_enemy(enemy, &mut issues);
        }
        for dungeon in self.dungeons.values_mut() {
            sanitize_dungeon(dungeon, &mut issues);
        }

        let dungeons = &self.dungeons;
        let enemies = &self.enemies;
        self.spawns.retain(|&dungeon, rules| {
            if !dungeons.contains_key(&dungeon) {
                issues.push(ContentIssue::UnknownSpawnDungeon(dungeon));
                return false;
            }
            rules.retain(|rule| {
                let known = enemies.contains_key(&rule.enemy);
                if !known {
                    issues.push(ContentIssue::UnknownSpawnEnemy {
                        dungeon,
                        enemy: rule.enemy,
                    });
                }
                known
            });
            true
        });

        let items = &self.items;
        self.loot.retain(|rule| {
            let issue = if !items.contains_key(&rule.item) {
                ContentIssue::UnknownLootItem {
                    origin: rule.source,
                    source_id: rule.source_id,
                    item: rule.item,
                }
            } else if rule.mode == DropMode::Weighted(0) {
                ContentIssue::ZeroWeight {
                    origin: rule.source,
                    source_id: rule.source_id,
                    item: rule.item,
                }
            } else {
                return true;
            };
            issues.push(issue);
            false
        });

        for issue in &issues {
            warn!(%issue, "content degraded");
        }
        issues
    }
}

fn sanitize_enemy(enemy: &mut EnemyTemplate, issues: &mut Vec<ContentIssue>) {
    if enemy.hp == 0 {
        enemy.hp = 1;
        issues.push(ContentIssue::ZeroHp(enemy.id));
    }
    if enemy.abilities.iter().any(is_malformed) {
        enemy.abilities.clear();
        issues.push(ContentIssue::MalformedAbilities(enemy.id));
    }
    let resistances = &enemy.resistances;
    if [&resistances.resist, &resistances.weak, &resistances.immune]
        .iter()
        .any(|list| list.contains(&DamageType::True))
    {
        enemy.resistances = Default::default();
        issues.push(ContentIssue::MalformedResistances(enemy.id));
    }
    if order_gold(&mut enemy.gold) {
        issues.push(ContentIssue::InvertedGold(enemy.id.to_string()));
    }
}

fn is_malformed(ability: &AbilityDefinition) -> bool {
    ability.dc == 0
        || ability.charges == Some(0)
        || ability.hp_threshold_percent.is_some_and(|percent| percent > 100)
        || ability.status.is_some_and(|status| status.chance_percent > 100)
}

fn sanitize_dungeon(dungeon: &mut DungeonDefinition, issues: &mut Vec<ContentIssue>) {
    if dungeon.floors == 0 {
        dungeon.floors = 1;
        issues.push(ContentIssue::ZeroFloors(dungeon.id));
    }
    if dungeon.dc_min > dungeon.dc_max {
        std::mem::swap(&mut dungeon.dc_min, &mut dungeon.dc_max);
        issues.push(ContentIssue::InvertedDcRange(dungeon.id));
    }
    if !(dungeon.scaling_factor.is_finite() && dungeon.scaling_factor > 0.0) {
        dungeon.scaling_factor = 1.0;
        issues.push(ContentIssue::BadScaling(dungeon.id));
    }
    if order_gold(&mut dungeon.chest_gold) {
        issues.push(ContentIssue::InvertedGold(dungeon.id.to_string()));
    }
}

/// Returns true when the bounds had to be swapped.
fn order_gold(range: &mut GoldRange) -> bool {
    if range.min > range.max {
        std::mem::swap(&mut range.min, &mut range.max);
        true
    } else {
        false
    }
}

impl ItemOracle for ContentCatalog {
    fn item(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.get(&id)
    }
}

impl EnemyOracle for ContentCatalog {
    fn enemy(&self, id: EnemyTemplateId) -> Option<&EnemyTemplate> {
        self.enemies.get(&id)
    }

    fn bosses(&self) -> Vec<&EnemyTemplate> {
        self.enemies.values().filter(|enemy| enemy.boss).collect()
    }
}

impl DungeonOracle for ContentCatalog {
    fn dungeon(&self, id: DungeonId) -> Option<&DungeonDefinition> {
        self.dungeons.get(&id)
    }

    fn spawn_rules(&self, dungeon: DungeonId) -> &[SpawnRule] {
        self.spawns.get(&dungeon).map(Vec::as_slice).unwrap_or_default()
    }
}

impl LootOracle for ContentCatalog {
    fn loot_rules(&self, source: LootSource, source_id: u32) -> Vec<&LootRule> {
        self.loot
            .iter()
            .filter(|rule| rule.source == source && rule.source_id == source_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use game_core::env::{ItemKind, StatusInfliction};
    use game_core::state::StatusEffectKind;

    use super::*;

    fn catalog() -> ContentCatalog {
        let mut king = EnemyTemplate::new(EnemyTemplateId(9), "Rat King", 30, 5);
        king.boss = true;
        ContentCatalog::new()
            .with_item(ItemDefinition::new(ItemId(1), "Garnet", ItemKind::Trinket))
            .with_enemy(EnemyTemplate::new(EnemyTemplateId(1), "Rat", 4, 2))
            .with_enemy(king)
            .with_dungeon(DungeonDefinition::new(DungeonId(1), "Crypt", 2, 1))
            .with_spawn_rule(SpawnRule::new(DungeonId(1), EnemyTemplateId(1), 5))
            .with_loot_rule(LootRule::guaranteed(LootSource::Enemy, 1, ItemId(1)))
            .with_loot_rule(LootRule::weighted(LootSource::Chest, 1, ItemId(1), 2))
    }

    #[test]
    fn oracles_answer_from_the_tables() {
        let catalog = catalog();
        assert_eq!(catalog.item(ItemId(1)).map(|i| i.name.as_str()), Some("Garnet"));
        assert!(catalog.item(ItemId(2)).is_none());
        assert_eq!(catalog.bosses().len(), 1);
        assert_eq!(catalog.spawn_rules(DungeonId(1)).len(), 1);
        assert!(catalog.spawn_rules(DungeonId(7)).is_empty());
        assert_eq!(catalog.loot_rules(LootSource::Enemy, 1).len(), 1);
        assert_eq!(catalog.loot_rules(LootSource::Chest, 1).len(), 1);
        assert!(catalog.loot_rules(LootSource::Boss, 1).is_empty());
    }

    #[test]
    fn clean_content_passes_untouched() {
        let mut catalog = catalog();
        assert!(catalog.sanitize().is_empty());
        assert_eq!(catalog.spawn_rule_count(), 1);
        assert_eq!(catalog.loot_rule_count(), 2);
    }

    #[test]
    fn malformed_enemy_fields_degrade_to_defaults() {
        let mut broken = EnemyTemplate::new(EnemyTemplateId(3), "Wisp", 0, 1);
        let mut ability = AbilityDefinition::new("Flare", 12);
        ability.status = Some(StatusInfliction {
            kind: StatusEffectKind::Burning,
            chance_percent: 140,
            duration: 2,
            magnitude: 1,
        });
        broken.abilities = vec![AbilityDefinition::new("Glow", 10), ability];
        broken.resistances.immune = vec![DamageType::True];
        broken.gold = GoldRange::new(9, 3);
        let mut catalog = catalog().with_enemy(broken);

        let issues = catalog.sanitize();

        let id = EnemyTemplateId(3);
        assert_eq!(
            issues,
            vec![
                ContentIssue::ZeroHp(id),
                ContentIssue::MalformedAbilities(id),
                ContentIssue::MalformedResistances(id),
                ContentIssue::InvertedGold(id.to_string()),
            ]
        );
        let wisp = catalog.enemy(id).unwrap();
        assert_eq!(wisp.hp, 1);
        assert!(wisp.abilities.is_empty());
        assert!(wisp.resistances.immune.is_empty());
        assert_eq!(wisp.gold, GoldRange::new(3, 9));
    }

    #[test]
    fn dangling_rules_are_dropped() {
        let mut dungeon = DungeonDefinition::new(DungeonId(2), "Mire", 0, 1);
        dungeon.dc_min = 16;
        dungeon.dc_max = 12;
        let mut catalog = catalog()
            .with_dungeon(dungeon)
            .with_spawn_rule(SpawnRule::new(DungeonId(1), EnemyTemplateId(42), 1))
            .with_spawn_rule(SpawnRule::new(DungeonId(5), EnemyTemplateId(1), 1))
            .with_loot_rule(LootRule::guaranteed(LootSource::Search, 1, ItemId(77)))
            .with_loot_rule(LootRule::weighted(LootSource::Search, 1, ItemId(1), 0));

        let issues = catalog.sanitize();

        assert!(issues.contains(&ContentIssue::ZeroFloors(DungeonId(2))));
        assert!(issues.contains(&ContentIssue::InvertedDcRange(DungeonId(2))));
        assert!(issues.contains(&ContentIssue::UnknownSpawnDungeon(DungeonId(5))));
        assert!(issues.contains(&ContentIssue::UnknownSpawnEnemy {
            dungeon: DungeonId(1),
            enemy: EnemyTemplateId(42),
        }));
        assert_eq!(catalog.spawn_rule_count(), 1);
        assert_eq!(catalog.loot_rule_count(), 2);
        assert!(catalog.loot_rules(LootSource::Search, 1).is_empty());
        assert_eq!(catalog.dungeon(DungeonId(2)).unwrap().dc_range(), (12, 16));
    }
}
