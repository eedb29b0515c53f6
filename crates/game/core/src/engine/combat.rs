//! Player attacks, fleeing, and the enemy phase.

use crate::combat::{AttackProfile, EnemyDefeat, process_enemy_turn, resolve_player_attack, tick_cooldowns};
use crate::dice::{CheckOutcome, Skill, percent_of, skill_check};
use crate::engine::{Movement, Turn, TurnNote, add_effect, armor_of, combatant};
use crate::env::EquipSlot;
use crate::intent::Intent;
use crate::loot::{LootContext, LootDrop};
use crate::state::{EnemyId, GameState};

impl Turn<'_> {
    pub(super) fn attack(&mut self, target: Option<EnemyId>) {
        let content = self.env.content();
        let config = self.env.config();
        let GameState {
            character,
            run,
            floor,
            inventory,
        } = &mut *self.state;

        let enemy = target
            .filter(|&id| run.room_state.is_living(id))
            .and_then(|id| floor.enemy_mut(id))
            .filter(|enemy| enemy.alive);
        let Some(enemy) = enemy else {
            self.summary.intent = Intent::General;
            self.summary.note(TurnNote::NoTarget);
            return;
        };

        let weapon = inventory.equipped_in(content, EquipSlot::Weapon);
        let profile = AttackProfile::for_weapon(weapon, config.default_crit_range);
        let attacker = combatant(character, &run.effects, 0, profile.crit_range);
        let loot_context = LootContext::new(&character.skills, &character.completions, inventory);

        let report = resolve_player_attack(
            &mut *self.rng,
            content,
            &loot_context,
            &attacker,
            profile,
            enemy,
            &mut run.room_state,
        );
        let defeat = report.damage.as_ref().and_then(|damage| damage.defeat.clone());
        self.summary.attacks.push(report);

        if let Some(defeat) = defeat {
            self.record_defeat(defeat);
        }
    }

    /// Acrobatics against `10 + 2 × living enemies`. Any pass escapes to the
    /// previous room after opportunity hits; a failure keeps the fight on.
    pub(super) fn flee(&mut self) {
        let content = self.env.content();
        let config = self.env.config();
        let GameState {
            character,
            run,
            floor,
            inventory,
        } = &mut *self.state;

        if !run.room_state.in_combat {
            self.summary.note(TurnNote::NotInCombat);
            return;
        }

        let living = run.room_state.living.clone();
        let dc = 10 + 2 * living.len() as u32;
        let player = combatant(
            character,
            &run.effects,
            armor_of(inventory, content),
            config.default_crit_range,
        );
        let check = skill_check(&mut *self.rng, player.check(Skill::Acrobatics, dc));
        let percent = match check.outcome {
            CheckOutcome::CriticalSuccess => Some(0),
            CheckOutcome::Success => Some(config.flee_opportunity_percent),
            CheckOutcome::Partial => Some(config.flee_partial_opportunity_percent),
            CheckOutcome::Failure | CheckOutcome::CriticalFailure => None,
        };
        self.summary.skill_checks.push(check);
        let Some(percent) = percent else {
            return;
        };

        let opportunity: u32 = living
            .iter()
            .filter_map(|&id| floor.enemy(id))
            .map(|enemy| percent_of(enemy.damage, percent))
            .sum();
        self.summary.opportunity_damage = character.take_damage(opportunity);
        self.summary.lose_hp(self.summary.opportunity_damage);
        self.summary.fled = true;
        if !character.is_alive() {
            return;
        }

        let from = run.room;
        let to = run.room_state.previous_room.or_else(|| {
            floor
                .accessible_neighbours(from)
                .iter()
                .map(|room| room.number)
                .min()
        });
        if let Some(to) = to.filter(|&to| to != from) {
            self.summary.movement = Some(Movement {
                from,
                to,
                opened: Vec::new(),
                new_floor: None,
            });
            self.enter_room(to, Some(from));
        } else {
            // nowhere to run: the enemies lose track of the player
            run.room_state.in_combat = false;
        }
    }

    /// Every living enemy of the room acts once, after cooldowns tick.
    pub(super) fn enemy_phase(&mut self) {
        let content = self.env.content();
        let config = self.env.config();
        let GameState {
            character,
            run,
            floor,
            inventory,
        } = &mut *self.state;

        run.room_state.round += 1;
        let living = run.room_state.living.clone();
        tick_cooldowns(
            floor
                .enemies
                .iter_mut()
                .filter(|enemy| living.contains(&enemy.id)),
        );

        let armor = armor_of(inventory, content);
        for id in living {
            let Some(enemy) = floor.enemy_mut(id).filter(|enemy| enemy.alive) else {
                continue;
            };
            let player = combatant(character, &run.effects, armor, config.default_crit_range);
            let turn = process_enemy_turn(&mut *self.rng, enemy, &player);
            let lost = character.take_damage(turn.damage);
            self.summary.lose_hp(lost);
            if let Some(effect) = turn.inflicted.clone() {
                add_effect(&mut run.effects, &mut self.summary, effect);
            }
            self.summary.enemy_turns.push(turn);
        }
    }

    /// Credits XP, gold and drops of a kill, and flags completion when the
    /// kill satisfies the dungeon's predicate.
    pub(super) fn record_defeat(&mut self, defeat: EnemyDefeat) {
        let GameState { character, run, .. } = &mut *self.state;
        character.xp = character.xp.saturating_add(defeat.xp);
        run.stats.kills += 1;
        self.summary.xp_gained += defeat.xp;
        self.gain_gold(defeat.gold);
        for drop in defeat.drops {
            self.gain_drop(drop);
        }
        if self.dungeon.completion.is_satisfied_by(defeat.template, defeat.boss) {
            self.summary.completed = true;
        }
    }

    pub(super) fn gain_gold(&mut self, gold: u32) {
        let GameState { character, run, .. } = &mut *self.state;
        character.gold = character.gold.saturating_add(gold);
        run.stats.gold_earned = run.stats.gold_earned.saturating_add(gold);
        self.summary.gold_gained += gold;
    }

    pub(super) fn gain_drop(&mut self, drop: LootDrop) {
        let GameState { run, inventory, .. } = &mut *self.state;
        inventory.add(drop.item, drop.quantity);
        run.record_acquired(drop.item, drop.quantity);
        self.summary.loot.push(drop);
    }
}
