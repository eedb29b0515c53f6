//! Run service: the request-level API around the rules engine.
//!
//! Every turn follows the same envelope:
//!
//! 1. take the persisted turn lock (`active -> processing` compare-and-set)
//! 2. load character, run, floor and inventory into a [`GameState`]
//! 3. let [`GameEngine`] resolve the action
//! 4. commit character, run, floor and the inventory diff in one batch
//!
//! When step 3 or 4 fails the lock is released back to `active` and nothing
//! of the turn is kept.

use std::sync::Arc;

use chrono::Utc;
use game_content::ContentCatalog;
use game_core::dice::roll_stats;
use game_core::state::ContextEntry;
use game_core::{
    Character, CharacterId, DungeonId, DungeonOracle, Env, GameConfig, GameEngine, GameError,
    GameState, Inventory, OracleError, Run, RunId, RunStatus, Stats, TurnSummary, generate_floor,
};
use tracing::{debug, error, info, warn};

use crate::api::{Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::repository::{GameStore, WriteBatch};
use crate::rng::{RngSource, Stream};

/// A character with its inventory and open run, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterSheet {
    pub character: Character,
    pub inventory: Inventory,
    pub run: Option<Run>,
}

/// Synchronous run service over a [`GameStore`].
///
/// The service holds no per-run state; it is `Send + Sync` whenever the store
/// is, and turns of distinct runs may be resolved from different threads.
pub struct RunService<S> {
    store: S,
    content: Arc<ContentCatalog>,
    rules: GameConfig,
    config: RuntimeConfig,
    rng: RngSource,
}

impl<S: GameStore> RunService<S> {
    pub fn builder() -> RunServiceBuilder<S> {
        RunServiceBuilder::new()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn content(&self) -> &ContentCatalog {
        &self.content
    }

    pub fn rules(&self) -> &GameConfig {
        &self.rules
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Create a character, rolling 3d6 stats when none are given.
    pub fn create_character(&self, name: &str, stats: Option<Stats>) -> Result<Character> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RuntimeError::EmptyName);
        }

        let id = self.store.next_character_id()?;
        let stats = match stats {
            Some(stats) => stats,
            None => roll_stats(&mut *self.rng.stream(Stream::Stats, id.0, 0)),
        };
        let character = Character::new(id, name, stats, self.rules.starting_gold);
        self.store
            .commit(WriteBatch::new().character(character.clone()))?;

        info!(character = %id, name, max_hp = character.max_hp, "character created");
        Ok(character)
    }

    pub fn sheet(&self, character: CharacterId) -> Result<CharacterSheet> {
        Ok(CharacterSheet {
            character: self.load_character(character)?,
            inventory: self.store.inventory(character)?,
            run: self.store.open_run(character)?,
        })
    }

    /// Start a run: pay the entry cost and stand in room 1 of floor 1.
    ///
    /// # Errors
    ///
    /// Unknown character or dungeon, an already open run, or too little gold.
    pub fn enter_dungeon(&self, character: CharacterId, dungeon: DungeonId) -> Result<Run> {
        let mut hero = self.load_character(character)?;
        if let Some(open) = self.store.open_run(character)? {
            return Err(RuntimeError::RunAlreadyOpen {
                character,
                run: open.id,
            });
        }
        let definition = self
            .content
            .dungeon(dungeon)
            .ok_or(OracleError::DungeonNotFound(dungeon))?;
        if hero.gold < definition.entry_cost {
            return Err(RuntimeError::InsufficientGold {
                dungeon,
                needed: definition.entry_cost,
                available: hero.gold,
            });
        }
        hero.gold -= definition.entry_cost;

        let id = self.store.next_run_id()?;
        let floor = generate_floor(
            &mut *self.rng.stream(Stream::Floor, id.0, 1),
            self.content.as_ref(),
            definition,
            1,
        );
        let run = Run::new(id, character, dungeon);
        self.store.commit(
            WriteBatch::new()
                .character(hero)
                .run(run.clone())
                .floor(id, floor),
        )?;

        info!(
            run = %id,
            character = %character,
            dungeon = %definition.name,
            entry_cost = definition.entry_cost,
            "run started"
        );
        Ok(run)
    }

    /// Resolve one player action against the character's open run.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::RunNotActive`] when another action is still being
    /// resolved. Rule rejections, content and storage failures leave the run
    /// `active` and every record as it was.
    pub fn process_action(&self, character: CharacterId, action: &str) -> Result<TurnSummary> {
        let run = self
            .store
            .open_run(character)?
            .ok_or(RuntimeError::NoActiveRun(character))?;

        if !self.store.try_begin_turn(run.id, action, now_millis())? {
            let status = self.store.run(run.id)?.map_or(run.status, |stored| stored.status);
            debug!(run = %run.id, %status, "turn lock refused");
            return Err(RuntimeError::RunNotActive {
                run: run.id,
                status,
            });
        }

        self.resolve_turn(character, run.id, action)
            .inspect_err(|failure| {
                warn!(
                    run = %run.id,
                    code = failure.error_code(),
                    severity = failure.severity().as_str(),
                    error = %failure,
                    "turn aborted"
                );
                self.unlock(run.id);
            })
    }

    /// Give up the open run. Terminal; nothing is lost or refunded.
    pub fn abandon_run(&self, character: CharacterId) -> Result<Run> {
        let run = self
            .store
            .open_run(character)?
            .ok_or(RuntimeError::NoActiveRun(character))?;
        if !self.store.try_begin_turn(run.id, "abandon", now_millis())? {
            return Err(RuntimeError::RunNotActive {
                run: run.id,
                status: run.status,
            });
        }

        let abandoned = self
            .close_run(character, run.id)
            .inspect_err(|_| self.unlock(run.id))?;
        info!(run = %abandoned.id, character = %character, "run abandoned");
        Ok(abandoned)
    }

    /// Unlock `processing` runs whose lease is older than the configured
    /// timeout, returning the ids put back to `active`.
    pub fn recover_stale_runs(&self, now_millis: i64) -> Result<Vec<RunId>> {
        let timeout = self.config.lease_timeout_millis();
        let mut recovered = Vec::new();
        for run in self.store.processing_runs()? {
            if run.lease_expired(now_millis, timeout) && self.store.release_turn(run.id)? {
                warn!(
                    run = %run.id,
                    action = run.pending_action.as_deref().unwrap_or_default(),
                    "recovered stale turn lock"
                );
                recovered.push(run.id);
            }
        }
        Ok(recovered)
    }

    /// Narration window of the character's open run, oldest first.
    pub fn context(&self, character: CharacterId) -> Result<Vec<ContextEntry>> {
        let run = self
            .store
            .open_run(character)?
            .ok_or(RuntimeError::NoActiveRun(character))?;
        Ok(run.context.entries().cloned().collect())
    }

    fn load_character(&self, id: CharacterId) -> Result<Character> {
        self.store
            .character(id)?
            .ok_or(RuntimeError::NoCharacter(id))
    }

    fn resolve_turn(
        &self,
        character: CharacterId,
        run: RunId,
        action: &str,
    ) -> Result<TurnSummary> {
        let hero = self.load_character(character)?;
        let record = self
            .store
            .run(run)?
            .ok_or(RuntimeError::NoActiveRun(character))?;
        let floor = self.store.floor(run)?.ok_or(RuntimeError::MissingFloor(run))?;
        let before = self.store.inventory(character)?;

        let turn = u64::from(record.stats.turns) + 1;
        let mut rng = self.rng.stream(Stream::Turn, run.0, turn);
        let mut state = GameState::new(hero, record, floor, before.clone());
        let env = Env::new(self.content.as_ref(), &self.rules);
        let summary = GameEngine::new(&mut state).execute(env, &mut *rng, action)?;

        let GameState {
            character: hero,
            run: record,
            floor,
            inventory,
        } = state;
        let delta = Inventory::diff(&before, &inventory);
        self.store.commit(
            WriteBatch::new()
                .character(hero)
                .run(record)
                .floor(run, floor)
                .inventory(character, delta),
        )?;

        info!(
            run = %run,
            turn = summary.turn,
            intent = %summary.intent.kind(),
            status = %summary.status,
            hp = summary.hp_after,
            "turn resolved"
        );
        Ok(summary)
    }

    /// Marks the locked run abandoned, starting from the stored record so
    /// turns committed before the lock was taken are kept.
    fn close_run(&self, character: CharacterId, run: RunId) -> Result<Run> {
        let mut abandoned = self
            .store
            .run(run)?
            .ok_or(RuntimeError::NoActiveRun(character))?;
        abandoned.release(RunStatus::Abandoned);
        self.store.commit(WriteBatch::new().run(abandoned.clone()))?;
        Ok(abandoned)
    }

    fn unlock(&self, run: RunId) {
        if let Err(failure) = self.store.release_turn(run) {
            error!(run = %run, error = %failure, "could not release turn lock");
        }
    }
}

/// Wall clock in unix millis, the unit of turn-lock leases.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Builder for [`RunService`].
pub struct RunServiceBuilder<S> {
    store: Option<S>,
    content: Option<Arc<ContentCatalog>>,
    rules: GameConfig,
    config: RuntimeConfig,
    rng: Option<RngSource>,
}

impl<S: GameStore> RunServiceBuilder<S> {
    fn new() -> Self {
        Self {
            store: None,
            content: None,
            rules: GameConfig::default(),
            config: RuntimeConfig::default(),
            rng: None,
        }
    }

    pub fn store(mut self, store: S) -> Self {
        self.store = Some(store);
        self
    }

    pub fn content(mut self, content: impl Into<Arc<ContentCatalog>>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn rules(mut self, rules: GameConfig) -> Self {
        self.rules = rules;
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the random source; defaults to the one `config` selects.
    pub fn rng(mut self, rng: RngSource) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn build(self) -> Result<RunService<S>> {
        let store = self.store.ok_or(RuntimeError::MissingStore)?;
        let content = self.content.ok_or(RuntimeError::MissingContent)?;
        let rng = self.rng.unwrap_or_else(|| self.config.rng_source());
        Ok(RunService {
            store,
            content,
            rules: self.rules,
            config: self.config,
            rng,
        })
    }
}
