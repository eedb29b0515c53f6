//! Structured outcome of one turn.
//!
//! The summary is the single source of truth handed to narration: every
//! roll, hit, drop and state flag of the turn is recorded here and nothing
//! downstream recomputes or amends it.

use std::fmt::Write as _;

use crate::combat::{AttackReport, EnemyTurn};
use crate::dice::SkillCheckResult;
use crate::floor::TrapState;
use crate::intent::Intent;
use crate::loot::LootDrop;
use crate::state::{ItemId, RoomNumber, RunStatus, StatusEffectKind, StatusTick};

/// Non-fatal reasons an intent resolved to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TurnNote {
    /// Attack named nobody alive in the room.
    NoTarget,
    NotInCombat,
    /// Exploration attempted mid-fight.
    CombatActive,
    AlreadySearched,
    NoChest,
    ChestAlreadyOpened,
    ChestLocked,
    ItemMissing,
    NoLockpick,
    NoLockedRoom,
    RestUnavailable,
    NothingEquipped,
    /// Item has no use here.
    NoEffect,
    /// The status list was full; a new effect was dropped.
    EffectDropped,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Movement {
    pub from: RoomNumber,
    pub to: RoomNumber,
    /// Rooms opened by clearing the room left behind.
    pub opened: Vec<RoomNumber>,
    /// Set when the move went down to a freshly generated floor.
    pub new_floor: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapReport {
    pub name: String,
    pub check: SkillCheckResult,
    pub state: TrapState,
    pub damage: u32,
    pub inflicted: Option<StatusEffectKind>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnSummary {
    /// 1-based index of the turn within the run.
    pub turn: u32,
    pub action: String,
    pub intent: Intent,
    pub status_tick: StatusTick,
    /// Every non-attack check rolled this turn, in order.
    pub skill_checks: Vec<SkillCheckResult>,
    pub attacks: Vec<AttackReport>,
    pub enemy_turns: Vec<EnemyTurn>,
    /// Parting blows taken while fleeing.
    pub opportunity_damage: u32,
    pub loot: Vec<LootDrop>,
    pub gold_gained: u32,
    pub gold_lost: u32,
    pub xp_gained: u32,
    pub hp_before: u32,
    pub hp_after: u32,
    /// HP actually removed this turn, after capping at zero.
    pub hp_lost: u32,
    pub effects_added: Vec<StatusEffectKind>,
    pub effects_removed: Vec<StatusEffectKind>,
    pub items_used: Vec<(ItemId, u32)>,
    pub equipment: Vec<(ItemId, bool)>,
    pub items_lost: Vec<(ItemId, u32)>,
    pub movement: Option<Movement>,
    pub trap: Option<TrapReport>,
    pub notes: Vec<TurnNote>,
    pub fled: bool,
    pub died: bool,
    pub completed: bool,
    pub completion_bonus: u32,
    pub status: RunStatus,
}

impl TurnSummary {
    pub fn new(turn: u32, action: impl Into<String>, hp_before: u32) -> Self {
        Self {
            turn,
            action: action.into(),
            intent: Intent::General,
            status_tick: StatusTick::default(),
            skill_checks: Vec::new(),
            attacks: Vec::new(),
            enemy_turns: Vec::new(),
            opportunity_damage: 0,
            loot: Vec::new(),
            gold_gained: 0,
            gold_lost: 0,
            xp_gained: 0,
            hp_before,
            hp_after: hp_before,
            hp_lost: 0,
            effects_added: Vec::new(),
            effects_removed: Vec::new(),
            items_used: Vec::new(),
            equipment: Vec::new(),
            items_lost: Vec::new(),
            movement: None,
            trap: None,
            notes: Vec::new(),
            fled: false,
            died: false,
            completed: false,
            completion_bonus: 0,
            status: RunStatus::Processing,
        }
    }

    pub fn note(&mut self, note: TurnNote) {
        self.notes.push(note);
    }

    pub fn damage_dealt(&self) -> u32 {
        self.attacks
            .iter()
            .filter_map(|attack| attack.damage.as_ref())
            .map(|damage| damage.dealt)
            .sum()
    }

    /// Records HP taken from the player by any source.
    pub(crate) fn lose_hp(&mut self, amount: u32) {
        self.hp_lost = self.hp_lost.saturating_add(amount);
    }

    pub fn kills(&self) -> usize {
        self.attacks
            .iter()
            .filter(|attack| attack.damage.as_ref().is_some_and(|d| d.defeat.is_some()))
            .count()
    }

    /// Compact `key=value` line for the narration context window.
    pub fn compact(&self) -> String {
        let mut line = format!("intent={}", self.intent.kind());
        for check in &self.skill_checks {
            let _ = write!(line, " check={}:{}", check.skill, check.outcome);
        }
        for attack in &self.attacks {
            let dealt = attack.damage.as_ref().map_or(0, |d| d.dealt);
            let _ = write!(line, " hit={}:{}:{}", attack.target_name, attack.check.outcome, dealt);
        }
        if !self.enemy_turns.is_empty() {
            let _ = write!(line, " enemy_dmg={}", self.enemy_turns.iter().map(|t| t.damage).sum::<u32>());
        }
        if let Some(trap) = &self.trap {
            let _ = write!(line, " trap={:?}:{}", trap.state, trap.damage);
        }
        if let Some(movement) = &self.movement {
            let _ = write!(line, " move={}->{}", movement.from, movement.to);
            if let Some(floor) = movement.new_floor {
                let _ = write!(line, " floor={floor}");
            }
        }
        if !self.loot.is_empty() {
            let items: Vec<String> = self
                .loot
                .iter()
                .map(|drop| format!("{}x{}", drop.item.0, drop.quantity))
                .collect();
            let _ = write!(line, " loot={}", items.join(","));
        }
        if self.gold_gained > 0 {
            let _ = write!(line, " gold=+{}", self.gold_gained);
        }
        if self.gold_lost > 0 {
            let _ = write!(line, " gold=-{}", self.gold_lost);
        }
        let _ = write!(line, " hp={}->{}", self.hp_before, self.hp_after);
        if self.fled {
            line.push_str(" fled");
        }
        if self.died {
            line.push_str(" died");
        }
        if self.completed {
            line.push_str(" completed");
        }
        line
    }
}
