//! Enemy turns, damage to enemies, and the player's attack.

use crate::combat::{DamageType, EnemyInstance, apply_damage};
use crate::dice::{
    CheckOutcome, DamageRoll, Skill, SkillCheckRequest, SkillCheckResult, SkillLevels, Stats,
    mitigate, roll_damage, skill_check, stat_modifier,
};
use crate::env::{ItemDefinition, ItemKind, LootOracle, LootSource, RngOracle};
use crate::loot::{LootContext, LootDrop, resolve_loot};
use crate::state::{EnemyId, EnemyTemplateId, RoomState, StatusEffect, StatusEffects};

/// The player as seen by an attacker or by its own attack.
#[derive(Clone, Copy, Debug)]
pub struct Combatant<'a> {
    pub stats: &'a Stats,
    pub skills: &'a SkillLevels,
    pub effects: &'a StatusEffects,
    /// Flat reduction from equipped armor.
    pub armor: u32,
    pub crit_range: u32,
}

impl Combatant<'_> {
    /// Check request with the player's crit range and active perks.
    pub fn check(&self, skill: Skill, dc: u32) -> SkillCheckRequest<'_> {
        SkillCheckRequest::new(skill, dc, self.stats, self.skills)
            .crit_range(self.crit_range)
            .perk_bonus(self.effects.perk_bonus(skill))
    }
}

/// One enemy action against the player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTurn {
    pub enemy: EnemyId,
    pub name: String,
    /// `None` for the basic attack.
    pub ability: Option<String>,
    pub defense: SkillCheckResult,
    pub damage: u32,
    pub damage_type: DamageType,
    /// Effect to attach to the player.
    pub inflicted: Option<StatusEffect>,
}

/// Resolve one enemy's turn against `player`.
///
/// A ready special ability is picked uniformly; without one the enemy uses
/// its basic attack. The player defends with the ability's defense skill:
/// success or better takes nothing, partial takes half (at least 1), and a
/// failure takes the full roll (critical on a natural 1) plus the ability's
/// chance to inflict a status effect. The player's HP is left to the caller.
pub fn process_enemy_turn(
    rng: &mut (impl RngOracle + ?Sized),
    enemy: &mut EnemyInstance,
    player: &Combatant<'_>,
) -> EnemyTurn {
    let ready = enemy.ready_abilities();
    let chosen = if ready.is_empty() {
        None
    } else {
        Some(ready[rng.below(ready.len() as u32) as usize])
    };

    let (ability, base, damage_type, dc, defense, infliction) = match chosen {
        Some(index) => {
            let state = &mut enemy.abilities[index];
            state.consume();
            let def = &state.definition;
            (
                Some(def.name.clone()),
                def.damage.unwrap_or(enemy.damage),
                def.damage_type.unwrap_or(enemy.damage_type),
                def.dc,
                def.defense,
                def.status,
            )
        }
        None => (None, enemy.damage, enemy.damage_type, enemy.attack_dc, Skill::Dodge, None),
    };

    let check = skill_check(rng, player.check(defense, dc));
    let roll = DamageRoll::new(base).armor(player.armor);
    let (damage, inflicted) = match check.outcome {
        CheckOutcome::CriticalSuccess | CheckOutcome::Success => (0, None),
        CheckOutcome::Partial => {
            let full = roll_damage(rng, roll);
            (if full == 0 { 0 } else { (full / 2).max(1) }, None)
        }
        CheckOutcome::Failure | CheckOutcome::CriticalFailure => {
            let critical = check.outcome == CheckOutcome::CriticalFailure;
            let full = roll_damage(rng, roll.critical(critical));
            let inflicted = infliction.filter(|i| rng.chance(i.chance_percent)).map(|i| {
                StatusEffect::new(
                    i.kind,
                    i.duration,
                    i.magnitude,
                    ability.clone().unwrap_or_else(|| enemy.name.clone()),
                )
            });
            (full, inflicted)
        }
    };

    EnemyTurn {
        enemy: enemy.id,
        name: enemy.name.clone(),
        ability,
        defense: check,
        damage,
        damage_type,
        inflicted,
    }
}

/// Rewards of a kill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyDefeat {
    pub template: EnemyTemplateId,
    pub boss: bool,
    pub drops: Vec<LootDrop>,
    pub gold: u32,
    pub xp: u32,
}

/// Outcome of [`damage_enemy`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageReport {
    pub enemy: EnemyId,
    pub dealt: u32,
    pub remaining_hp: u32,
    pub defeat: Option<EnemyDefeat>,
    /// Every enemy in the room is dead.
    pub combat_over: bool,
}

/// Apply raw damage to an enemy.
///
/// Resistance percent first, then armor with a floor of 1 whenever any damage
/// gets through. On death the enemy's loot (boss or regular source) and gold
/// are rolled, and the room's combat ends iff nobody is left alive.
pub fn damage_enemy<L>(
    rng: &mut (impl RngOracle + ?Sized),
    loot: &L,
    loot_context: &LootContext<'_>,
    enemy: &mut EnemyInstance,
    room: &mut RoomState,
    raw: u32,
    damage_type: DamageType,
) -> DamageReport
where
    L: LootOracle + ?Sized,
{
    if !enemy.alive {
        return DamageReport {
            enemy: enemy.id,
            dealt: 0,
            remaining_hp: 0,
            defeat: None,
            combat_over: !room.in_combat,
        };
    }

    let dealt = if raw == 0 {
        0
    } else {
        mitigate(raw, enemy.resistances.percent_for(damage_type), enemy.armor)
    };
    enemy.hp = apply_damage(enemy.hp, dealt);

    let mut defeat = None;
    if enemy.hp == 0 {
        enemy.alive = false;
        room.mark_dead(enemy.id);
        let source = if enemy.boss {
            LootSource::Boss
        } else {
            LootSource::Enemy
        };
        let drops = resolve_loot(rng, loot, source, enemy.template.0, loot_context);
        let gold = rng.range(enemy.gold.min, enemy.gold.max.max(enemy.gold.min));
        defeat = Some(EnemyDefeat {
            template: enemy.template,
            boss: enemy.boss,
            drops,
            gold,
            xp: enemy.xp,
        });
    }

    DamageReport {
        enemy: enemy.id,
        dealt,
        remaining_hp: enemy.hp,
        defeat,
        combat_over: !room.in_combat,
    }
}

/// Decrement every positive ability cooldown once per combat round.
pub fn tick_cooldowns<'e>(enemies: impl IntoIterator<Item = &'e mut EnemyInstance>) {
    for enemy in enemies {
        enemy.tick_cooldowns();
    }
}

/// How the player attacks with the equipped weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackProfile {
    pub skill: Skill,
    pub damage_bonus: u32,
    pub crit_range: u32,
    pub damage_type: DamageType,
}

impl AttackProfile {
    pub const fn unarmed(crit_range: u32) -> Self {
        Self {
            skill: Skill::Melee,
            damage_bonus: 0,
            crit_range,
            damage_type: DamageType::Physical,
        }
    }

    /// Profile for `weapon`, or unarmed when it is not a weapon.
    pub fn for_weapon(weapon: Option<&ItemDefinition>, default_crit_range: u32) -> Self {
        match weapon.map(|def| &def.kind) {
            Some(ItemKind::Weapon {
                damage_bonus,
                skill,
                crit_range,
                damage_type,
            }) => Self {
                skill: if *skill == Skill::Ranged {
                    Skill::Ranged
                } else {
                    Skill::Melee
                },
                damage_bonus: *damage_bonus,
                crit_range: crit_range.unwrap_or(default_crit_range),
                damage_type: *damage_type,
            },
            _ => Self::unarmed(default_crit_range),
        }
    }

    /// `3 + max(0, modifier of the attack skill's stat) + weapon bonus`.
    pub fn base_damage(&self, stats: &Stats) -> u32 {
        let modifier = stat_modifier(stats.get(self.skill.governing_stat())).max(0) as u32;
        3 + modifier + self.damage_bonus
    }
}

/// DC of hitting a target: `8 + armor`.
pub const fn attack_dc(target_armor: u32) -> u32 {
    8 + target_armor
}

/// The player's attack on one enemy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackReport {
    pub target: EnemyId,
    pub target_name: String,
    pub check: SkillCheckResult,
    /// Damage before the target's resistances and armor.
    pub raw_damage: u32,
    pub damage: Option<DamageReport>,
}

/// Roll the player's attack against `enemy` and apply the damage.
///
/// A miss deals nothing; a partial hit deals half the raw roll.
pub fn resolve_player_attack<L>(
    rng: &mut (impl RngOracle + ?Sized),
    loot: &L,
    loot_context: &LootContext<'_>,
    attacker: &Combatant<'_>,
    profile: AttackProfile,
    enemy: &mut EnemyInstance,
    room: &mut RoomState,
) -> AttackReport
where
    L: LootOracle + ?Sized,
{
    let request = attacker
        .check(profile.skill, attack_dc(enemy.armor))
        .crit_range(profile.crit_range);
    let check = skill_check(rng, request);

    let (raw_damage, damage) = if check.passed {
        let critical = check.outcome == CheckOutcome::CriticalSuccess;
        let mut raw = roll_damage(rng, DamageRoll::new(profile.base_damage(attacker.stats)).critical(critical));
        if check.outcome == CheckOutcome::Partial {
            raw = (raw / 2).max(1);
        }
        let report = damage_enemy(rng, loot, loot_context, enemy, room, raw, profile.damage_type);
        (raw, Some(report))
    } else {
        (0, None)
    };

    AttackReport {
        target: enemy.id,
        target_name: enemy.name.clone(),
        check,
        raw_damage,
        damage,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::env::{AbilityDefinition, EnemyTemplate, GoldRange, LootRule, SequenceRng, StatusInfliction};
    use crate::state::{Inventory, ItemId, StatusEffectKind};

    struct NoLoot;

    impl LootOracle for NoLoot {
        fn loot_rules(&self, _: LootSource, _: u32) -> Vec<&LootRule> {
            Vec::new()
        }
    }

    fn d20(face: u32) -> u32 {
        face - 1
    }

    /// Variance draw that yields exactly 100%.
    const FLAT: u32 = 20;

    fn goblin(id: u16) -> EnemyInstance {
        let mut template = EnemyTemplate::new(EnemyTemplateId(1), "Goblin", 6, 10);
        template.armor = 4;
        template.gold = GoldRange::new(2, 2);
        template.xp = 5;
        EnemyInstance::spawn(EnemyId(id), &template, 1.0)
    }

    struct Player {
        stats: Stats,
        skills: SkillLevels,
        effects: StatusEffects,
    }

    impl Player {
        fn new() -> Self {
            Self {
                stats: Stats::default(),
                skills: SkillLevels::new(),
                effects: StatusEffects::new(),
            }
        }

        fn combatant(&self) -> Combatant<'_> {
            Combatant {
                stats: &self.stats,
                skills: &self.skills,
                effects: &self.effects,
                armor: 0,
                crit_range: 20,
            }
        }
    }

    #[test]
    fn successful_defense_takes_nothing() {
        let player = Player::new();
        let mut enemy = goblin(0);
        let mut rng = SequenceRng::new([d20(12)]);
        let turn = process_enemy_turn(&mut rng, &mut enemy, &player.combatant());
        assert_eq!(turn.defense.outcome, CheckOutcome::Success);
        assert_eq!(turn.damage, 0);
        assert_eq!(turn.ability, None);
    }

    #[test]
    fn partial_defense_halves_damage() {
        let player = Player::new();
        let mut enemy = goblin(0);
        // total 10 vs dc 12 -> partial
        let mut rng = SequenceRng::new([d20(10), FLAT]);
        let turn = process_enemy_turn(&mut rng, &mut enemy, &player.combatant());
        assert_eq!(turn.defense.outcome, CheckOutcome::Partial);
        assert_eq!(turn.damage, 5);
    }

    #[test]
    fn failed_defense_takes_full_damage_and_may_be_poisoned() {
        let player = Player::new();
        let mut enemy = goblin(0);
        let mut bite = AbilityDefinition::new("Venom Bite", 14);
        bite.damage = Some(4);
        bite.cooldown = 2;
        bite.status = Some(StatusInfliction {
            kind: StatusEffectKind::Poisoned,
            chance_percent: 50,
            duration: 3,
            magnitude: 2,
        });
        enemy.abilities = vec![crate::combat::AbilityState::new(bite)];

        // ability pick, d20 5, flat variance, d100 roll 1 (inflicts)
        let mut rng = SequenceRng::new([0, d20(5), FLAT, 0]);
        let turn = process_enemy_turn(&mut rng, &mut enemy, &player.combatant());

        assert_eq!(turn.ability.as_deref(), Some("Venom Bite"));
        assert_eq!(turn.defense.outcome, CheckOutcome::Failure);
        assert_eq!(turn.damage, 4);
        let poison = turn.inflicted.expect("poison applied");
        assert_eq!(poison.kind, StatusEffectKind::Poisoned);
        assert_eq!(enemy.abilities[0].cooldown_remaining, 2);
    }

    #[test]
    fn killing_the_last_enemy_ends_combat() {
        let mut first = goblin(0);
        let mut second = goblin(1);
        let mut room = RoomState::entered(vec![EnemyId(0), EnemyId(1)], None, Default::default());
        let (skills, completions, inventory) = (SkillLevels::new(), BTreeMap::new(), Inventory::new());
        let context = LootContext::new(&skills, &completions, &inventory);
        let mut rng = SequenceRng::default();

        let report = damage_enemy(&mut rng, &NoLoot, &context, &mut first, &mut room, 50, DamageType::Physical);
        let defeat = report.defeat.expect("first goblin dies");
        assert_eq!(defeat.gold, 2);
        assert_eq!(defeat.xp, 5);
        assert!(!report.combat_over);
        assert!(room.in_combat);

        let report = damage_enemy(&mut rng, &NoLoot, &context, &mut second, &mut room, 50, DamageType::Physical);
        assert!(report.combat_over);
        assert!(!room.in_combat);
    }

    #[test]
    fn armor_floor_keeps_one_damage() {
        let mut enemy = goblin(0);
        let mut room = RoomState::entered(vec![EnemyId(0)], None, Default::default());
        let (skills, completions, inventory) = (SkillLevels::new(), BTreeMap::new(), Inventory::new());
        let context = LootContext::new(&skills, &completions, &inventory);

        let report = damage_enemy(
            &mut SequenceRng::default(),
            &NoLoot,
            &context,
            &mut enemy,
            &mut room,
            2,
            DamageType::Physical,
        );
        assert_eq!(report.dealt, 1);
        assert_eq!(report.remaining_hp, 5);
    }

    #[test]
    fn strength_fourteen_attack_hits_armor_four_for_base_minus_armor() {
        let mut player = Player::new();
        player.stats = Stats::new(14, 10, 10, 10, 10, 10);
        player.skills = SkillLevels::new().with(Skill::Melee, 23);
        let mut enemy = goblin(0);
        enemy.hp = 30;
        enemy.max_hp = 30;
        let mut room = RoomState::entered(vec![EnemyId(0)], None, Default::default());
        let (skills, completions, inventory) = (SkillLevels::new(), BTreeMap::new(), Inventory::new());
        let context = LootContext::new(&skills, &completions, &inventory);

        let sword = ItemDefinition::new(
            ItemId(1),
            "Sword",
            ItemKind::Weapon {
                damage_bonus: 3,
                skill: Skill::Melee,
                crit_range: None,
                damage_type: DamageType::Physical,
            },
        );
        let profile = AttackProfile::for_weapon(Some(&sword), 20);
        let mut rng = SequenceRng::new([d20(15), FLAT]);

        let report = resolve_player_attack(
            &mut rng,
            &NoLoot,
            &context,
            &player.combatant(),
            profile,
            &mut enemy,
            &mut room,
        );

        assert_eq!(report.check.dc, 12);
        assert_eq!(report.check.total, 19);
        assert_eq!(report.check.outcome, CheckOutcome::Success);
        // base 3 + STR 2 + sword 3 = 8, minus armor 4
        assert_eq!(report.raw_damage, 8);
        assert_eq!(report.damage.expect("hit").dealt, 4);
    }
}
