//! Record tables shared by every store backend.

use std::collections::BTreeMap;

use game_core::{Character, CharacterId, FloorMap, Inventory, Run, RunId, RunStatus};
use serde::{Deserialize, Serialize};

use super::error::{RepositoryError, Result};
use super::traits::WriteBatch;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Tables {
    last_character: u64,
    last_run: u64,
    characters: BTreeMap<CharacterId, Character>,
    inventories: BTreeMap<CharacterId, Inventory>,
    runs: BTreeMap<RunId, Run>,
    floors: BTreeMap<RunId, FloorMap>,
}

impl Tables {
    pub(crate) fn next_character_id(&mut self) -> CharacterId {
        self.last_character += 1;
        CharacterId(self.last_character)
    }

    pub(crate) fn next_run_id(&mut self) -> RunId {
        self.last_run += 1;
        RunId(self.last_run)
    }

    pub(crate) fn character(&self, id: CharacterId) -> Option<Character> {
        self.characters.get(&id).cloned()
    }

    pub(crate) fn inventory(&self, character: CharacterId) -> Inventory {
        self.inventories.get(&character).cloned().unwrap_or_default()
    }

    pub(crate) fn run(&self, id: RunId) -> Option<Run> {
        self.runs.get(&id).cloned()
    }

    pub(crate) fn open_run(&self, character: CharacterId) -> Option<Run> {
        self.runs
            .values()
            .find(|run| run.character == character && run.status.is_open())
            .cloned()
    }

    pub(crate) fn floor(&self, run: RunId) -> Option<FloorMap> {
        self.floors.get(&run).cloned()
    }

    pub(crate) fn processing_runs(&self) -> Vec<Run> {
        self.runs
            .values()
            .filter(|run| run.status == RunStatus::Processing)
            .cloned()
            .collect()
    }

    pub(crate) fn try_begin_turn(&mut self, id: RunId, action: &str, now_millis: i64) -> bool {
        self.runs
            .get_mut(&id)
            .is_some_and(|run| run.begin_processing(action, now_millis))
    }

    pub(crate) fn release_turn(&mut self, id: RunId) -> bool {
        match self.runs.get_mut(&id) {
            Some(run) if run.status == RunStatus::Processing => {
                run.release(RunStatus::Active);
                true
            }
            _ => false,
        }
    }

    /// Validate the whole batch, then apply it.
    ///
    /// Nothing is touched unless every run write is legal, so a rejected
    /// batch leaves the tables as they were.
    pub(crate) fn apply(&mut self, batch: WriteBatch) -> Result<()> {
        for run in &batch.runs {
            if let Some(stored) = self.runs.get(&run.id)
                && stored.status.is_terminal()
            {
                return Err(RepositoryError::TerminalRun {
                    run: run.id,
                    status: stored.status,
                });
            }
            if run.status.is_open()
                && let Some(existing) = self.open_run(run.character)
                && existing.id != run.id
            {
                return Err(RepositoryError::OpenRunConflict {
                    run: run.id,
                    existing: existing.id,
                });
            }
        }

        for character in batch.characters {
            self.characters.insert(character.id, character);
        }
        for run in batch.runs {
            self.runs.insert(run.id, run);
        }
        for (run, floor) in batch.floors {
            self.floors.insert(run, floor);
        }
        for (character, delta) in batch.inventories {
            let inventory = self.inventories.entry(character).or_default();
            for (item, quantity) in delta.removed {
                inventory.remove(item, quantity);
            }
            for (item, quantity) in delta.added {
                inventory.add(item, quantity);
            }
            for (item, equipped) in delta.equipment {
                inventory.set_equipped(item, equipped);
            }
        }
        Ok(())
    }
}
