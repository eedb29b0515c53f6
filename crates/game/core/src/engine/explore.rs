//! Searching, chests, resting and free-form skill checks.

use crate::dice::{Skill, SkillCheckResult, percent_of, skill_check};
use crate::engine::{Turn, TurnNote, armor_of, combatant};
use crate::env::{ItemKind, LootSource};
use crate::floor::RestSpot;
use crate::loot::{LootContext, resolve_loot};
use crate::state::{GameState, ItemId, RoomNumber};

/// Extra DC for forcing a lock with brute strength.
const FORCE_LOCK_PENALTY: u32 = 4;

impl Turn<'_> {
    /// Roll `skill` for the player against `dc`, recording the result.
    fn roll_check(&mut self, skill: Skill, dc: u32) -> SkillCheckResult {
        let content = self.env.content();
        let config = self.env.config();
        let GameState {
            character,
            run,
            inventory,
            ..
        } = &*self.state;
        let player = combatant(
            character,
            &run.effects,
            armor_of(inventory, content),
            config.default_crit_range,
        );
        let check = skill_check(&mut *self.rng, player.check(skill, dc));
        self.summary.skill_checks.push(check.clone());
        check
    }

    /// Draw loot from `source`, keyed by the dungeon.
    fn draw_loot(&mut self, source: LootSource) {
        let content = self.env.content();
        let GameState {
            character,
            inventory,
            ..
        } = &*self.state;
        let context = LootContext::new(&character.skills, &character.completions, inventory);
        let drops = resolve_loot(&mut *self.rng, content, source, self.dungeon.id.0, &context);
        for drop in drops {
            self.gain_drop(drop);
        }
    }

    /// One perception search per room. A pass turns up the dungeon's search
    /// loot.
    pub(super) fn search(&mut self) {
        let GameState { run, floor, .. } = &mut *self.state;
        if run.room_state.in_combat {
            self.summary.note(TurnNote::CombatActive);
            return;
        }
        let Some(room) = floor.room_mut(run.room) else {
            return;
        };
        if room.searched {
            self.summary.note(TurnNote::AlreadySearched);
            return;
        }
        room.searched = true;

        let dc = self.dungeon.dc_range().0 + self.env.config().search_dc_offset;
        if self.roll_check(Skill::Perception, dc).passed {
            self.draw_loot(LootSource::Search);
        }
    }

    pub(super) fn open_chest(&mut self) {
        let GameState { run, floor, .. } = &*self.state;
        if run.room_state.in_combat {
            self.summary.note(TurnNote::CombatActive);
            return;
        }
        let number = run.room;
        let Some(chest) = floor.room(number).and_then(|room| room.chest) else {
            self.summary.note(TurnNote::NoChest);
            return;
        };
        if chest.opened {
            self.summary.note(TurnNote::ChestAlreadyOpened);
            return;
        }
        if chest.locked && !self.roll_check(Skill::Lockpicking, chest.lock_dc).passed {
            self.summary.note(TurnNote::ChestLocked);
            return;
        }

        if let Some(chest) = self.state.floor.room_mut(number).and_then(|room| room.chest.as_mut()) {
            chest.locked = false;
            chest.opened = true;
        }
        self.draw_loot(LootSource::Chest);
        let range = self.dungeon.chest_gold;
        let gold = self.rng.range(range.min, range.max.max(range.min));
        self.gain_gold(gold);
    }

    pub(super) fn rest(&mut self) {
        let percent = self.env.config().rest_heal_percent;
        let GameState { character, run, floor, .. } = &mut *self.state;
        let Some(room) = floor
            .room_mut(run.room)
            .filter(|room| room.rest_available() && !run.room_state.in_combat)
        else {
            self.summary.note(TurnNote::RestUnavailable);
            return;
        };
        room.rest = Some(RestSpot { used: true });
        character.heal(percent_of(character.max_hp, percent));
    }

    /// Free-form check. Lockpicking and athletics aimed at a locked
    /// neighbour try to open it; anything else rolls against the dungeon's
    /// base DC.
    pub(super) fn skill_check(&mut self, skill: Skill, room: Option<RoomNumber>) {
        if matches!(skill, Skill::Lockpicking | Skill::Athletics) {
            let locked = self.state.floor.locked_neighbours(self.state.run.room);
            let target = match room {
                Some(room) => locked.iter().copied().find(|&n| n == room),
                None => locked.first().copied(),
            };
            match target {
                Some(target) => return self.force_lock(skill, target),
                None if skill == Skill::Lockpicking => self.summary.note(TurnNote::NoLockedRoom),
                None => {}
            }
        }
        self.roll_check(skill, self.dungeon.base_dc());
    }

    /// Pick (consuming a lockpick on a pass) or force the lock of `target`.
    fn force_lock(&mut self, skill: Skill, target: RoomNumber) {
        let Some(lock) = self.state.floor.room(target).and_then(|room| room.lock) else {
            return;
        };
        let pick = self.lockpick();
        let dc = match skill {
            Skill::Lockpicking if pick.is_none() => {
                self.summary.note(TurnNote::NoLockpick);
                return;
            }
            Skill::Lockpicking => lock.dc,
            _ => lock.dc + FORCE_LOCK_PENALTY,
        };

        if !self.roll_check(skill, dc).passed {
            return;
        }
        self.state.floor.unlock_room(target);
        if skill == Skill::Lockpicking
            && let Some(pick) = pick
        {
            let used = self.state.inventory.remove(pick, 1);
            self.summary.items_used.push((pick, used));
        }
    }

    /// First carried lockpick.
    pub(super) fn lockpick(&self) -> Option<ItemId> {
        let content = self.env.content();
        self.state
            .inventory
            .entries()
            .iter()
            .find(|entry| {
                content
                    .item(entry.item)
                    .is_some_and(|def| matches!(def.kind, ItemKind::Lockpick))
            })
            .map(|entry| entry.item)
    }
}
