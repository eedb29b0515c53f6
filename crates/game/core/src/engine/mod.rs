//! Per-turn action orchestration.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]: one call
//! to [`GameEngine::execute`] resolves exactly one player action. The turn
//! runs in fixed phases:
//!
//! 1. tick status effects
//! 2. classify the action text
//! 3. dispatch to the matching handler
//! 4. enemy phase (combat only; skipped after death, a flee, entering a boss
//!    room, or completing the dungeon)
//! 5. death penalty or completion reward
//! 6. narration context and lock release
//!
//! Any [`TurnError`] restores the state the engine was handed, so a rejected
//! action leaves no mechanical trace.

mod combat;
mod errors;
mod explore;
mod items;
mod movement;
mod summary;
mod turn;

pub use errors::TurnError;
pub use summary::{Movement, TrapReport, TurnNote, TurnSummary};

use crate::combat::Combatant;
use crate::env::{ContentOracle, DungeonDefinition, EquipSlot, Env, ItemKind, RngOracle};
use crate::state::{Character, GameState, Inventory, RunStatus, StatusEffect, StatusEffects};

/// Game engine resolving player actions against one run's state.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Resolve `action` as the next turn of the run.
    ///
    /// The run must already hold the turn lock (`processing`); the engine
    /// releases it to the turn's resulting status.
    ///
    /// # Errors
    ///
    /// Rejected movement and missing content abort the turn. The state is
    /// then exactly as it was before the call, including the lock.
    pub fn execute(
        &mut self,
        env: Env<'_>,
        rng: &mut dyn RngOracle,
        action: &str,
    ) -> Result<TurnSummary, TurnError> {
        let status = self.state.run.status;
        if status != RunStatus::Processing {
            return Err(TurnError::RunNotProcessing { status });
        }

        let snapshot = self.state.clone();
        let result = Turn::begin(self.state, env, rng, action).and_then(Turn::resolve);
        if result.is_err() {
            *self.state = snapshot;
        }
        result
    }
}

/// Working set of one turn.
struct Turn<'t> {
    state: &'t mut GameState,
    env: Env<'t>,
    dungeon: &'t DungeonDefinition,
    rng: &'t mut dyn RngOracle,
    summary: TurnSummary,
    /// Entered a boss room this turn; the boss waits a round.
    entered_boss: bool,
}

/// The player as an attacker or defender.
fn combatant<'c>(
    character: &'c Character,
    effects: &'c StatusEffects,
    armor: u32,
    crit_range: u32,
) -> Combatant<'c> {
    Combatant {
        stats: &character.stats,
        skills: &character.skills,
        effects,
        armor,
        crit_range,
    }
}

/// Flat damage reduction of the equipped armor.
fn armor_of(inventory: &Inventory, content: &dyn ContentOracle) -> u32 {
    match inventory.equipped_in(content, EquipSlot::Armor).map(|def| &def.kind) {
        Some(ItemKind::Armor { armor }) => *armor,
        _ => 0,
    }
}

/// Attach `effect`, recording it or noting that the list was full.
fn add_effect(effects: &mut StatusEffects, summary: &mut TurnSummary, effect: StatusEffect) {
    let kind = effect.kind;
    if effects.add(effect) {
        summary.effects_added.push(kind);
    } else {
        summary.note(TurnNote::EffectDropped);
    }
}
