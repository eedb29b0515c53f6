use std::collections::BTreeMap;

use crate::engine::{Turn, TurnError, TurnNote, TurnSummary};
use crate::env::{Env, ItemDefinition, RngOracle};
use crate::floor::Room;
use crate::intent::{self, Intent, IntentContext};
use crate::state::{
    ContextEntry, EnemyId, GameState, ItemId, RoomFlags, RunStatus, StatusEffectKind,
};

impl<'t> Turn<'t> {
    pub(super) fn begin(
        state: &'t mut GameState,
        env: Env<'t>,
        rng: &'t mut dyn RngOracle,
        action: &str,
    ) -> Result<Self, TurnError> {
        let dungeon = env.dungeon(state.run.dungeon)?;
        let summary = TurnSummary::new(state.run.stats.turns + 1, action, state.character.hp);
        Ok(Self {
            state,
            env,
            dungeon,
            rng,
            summary,
            entered_boss: false,
        })
    }

    pub(super) fn resolve(mut self) -> Result<TurnSummary, TurnError> {
        self.tick_effects();

        // a lethal tick ends the turn before the action
        if self.state.character.is_alive() {
            let intent = self.classify();
            self.summary.intent = intent.clone();
            self.dispatch(intent)?;
        }

        if self.enemies_act() {
            self.enemy_phase();
        }

        let status = if !self.state.character.is_alive() {
            self.apply_death();
            RunStatus::Dead
        } else if self.summary.completed {
            self.apply_completion();
            RunStatus::Completed
        } else {
            RunStatus::Active
        };
        Ok(self.finish(status))
    }

    fn tick_effects(&mut self) {
        let GameState { character, run, .. } = &mut *self.state;
        let tick = run.effects.tick();
        character.heal(tick.healing);
        let lost = character.take_damage(tick.damage);
        self.summary.lose_hp(lost);
        if tick.expired.contains(&StatusEffectKind::Illuminated) {
            run.room_state.flags.remove(RoomFlags::LIT_TORCH);
        }
        self.summary.effects_removed.extend(tick.expired.iter().copied());
        self.summary.status_tick = tick;
    }

    fn classify(&self) -> Intent {
        let content = self.env.content();
        let GameState {
            run,
            floor,
            inventory,
            ..
        } = &*self.state;

        let enemies: Vec<(EnemyId, &str)> = run
            .room_state
            .living
            .iter()
            .filter_map(|&id| floor.enemy(id).filter(|enemy| enemy.alive))
            .map(|enemy| (enemy.id, enemy.name.as_str()))
            .collect();
        let items: Vec<(ItemId, &str)> = inventory
            .entries()
            .iter()
            .filter_map(|entry| content.item(entry.item))
            .map(|def| (def.id, def.name.as_str()))
            .collect();

        let ctx = IntentContext {
            in_combat: run.room_state.in_combat,
            current_room: run.room,
            previous_room: run.room_state.previous_room,
            rest_available: floor.room(run.room).is_some_and(Room::rest_available),
            enemies: &enemies,
            items: &items,
        };
        intent::classify(&self.summary.action, &ctx)
    }

    fn dispatch(&mut self, intent: Intent) -> Result<(), TurnError> {
        match intent {
            Intent::Attack { target } => self.attack(target),
            Intent::UseItem { item } => self.use_item(item)?,
            Intent::Move { room } => self.move_to(room)?,
            Intent::Search => self.search(),
            Intent::OpenChest => self.open_chest(),
            Intent::Rest => self.rest(),
            Intent::RestFailed => self.summary.note(TurnNote::RestUnavailable),
            Intent::Flee => self.flee(),
            Intent::Unequip { item } => self.unequip(item),
            Intent::SkillCheck { skill, room } => self.skill_check(skill, room),
            Intent::General => {}
        }
        Ok(())
    }

    fn enemies_act(&self) -> bool {
        self.state.run.room_state.in_combat
            && self.state.character.is_alive()
            && !self.summary.fled
            && !self.entered_boss
            && !self.summary.completed
    }

    /// Drops half of the run's loot (rounded up, picked at random), every
    /// quest item, and a share of the carried gold.
    fn apply_death(&mut self) {
        let content = self.env.content();
        let config = self.env.config();
        let GameState {
            character,
            run,
            inventory,
            ..
        } = &mut *self.state;
        self.summary.died = true;

        let is_quest = |item: ItemId| content.item(item).is_some_and(ItemDefinition::is_quest);

        let mut units: Vec<ItemId> = Vec::new();
        for acquired in run.acquired.iter().filter(|a| !is_quest(a.item)) {
            let held = acquired.quantity.min(inventory.quantity(acquired.item));
            units.extend(std::iter::repeat_n(acquired.item, held as usize));
        }

        let mut lost: BTreeMap<ItemId, u32> = BTreeMap::new();
        for _ in 0..units.len().div_ceil(2) {
            let index = self.rng.below(units.len() as u32) as usize;
            *lost.entry(units.swap_remove(index)).or_default() += 1;
        }
        for entry in inventory.entries().iter().filter(|e| is_quest(e.item)) {
            *lost.entry(entry.item).or_default() += entry.quantity;
        }
        for (item, quantity) in lost {
            let removed = inventory.remove(item, quantity);
            if removed > 0 {
                self.summary.items_lost.push((item, removed));
            }
        }

        let penalty = u64::from(character.gold) * u64::from(config.death_gold_penalty_percent) / 100;
        let penalty = u32::try_from(penalty).unwrap_or(character.gold).min(character.gold);
        character.gold -= penalty;
        self.summary.gold_lost += penalty;
    }

    fn apply_completion(&mut self) {
        let bonus = self.env.config().completion_bonus_for(self.dungeon.tier);
        let GameState { character, run, .. } = &mut *self.state;
        character.gold = character.gold.saturating_add(bonus);
        character.hp = character.max_hp;
        character.record_completion(self.dungeon.id);
        run.stats.gold_earned = run.stats.gold_earned.saturating_add(bonus);
        self.summary.completion_bonus = bonus;
        self.summary.gold_gained += bonus;
    }

    fn finish(self, status: RunStatus) -> TurnSummary {
        let Self {
            state, env, mut summary, ..
        } = self;
        let GameState { character, run, .. } = state;

        summary.hp_after = character.hp;
        summary.status = status;

        let stats = &mut run.stats;
        stats.damage_dealt = stats.damage_dealt.saturating_add(summary.damage_dealt());
        stats.damage_taken = stats.damage_taken.saturating_add(summary.hp_lost);
        stats.turns += 1;

        let entry = ContextEntry {
            turn: summary.turn,
            floor: run.floor,
            room: run.room,
            intent: summary.intent.kind(),
            summary: summary.compact(),
        };
        run.context.push(entry, env.config().context_window);
        run.release(status);
        summary
    }
}
