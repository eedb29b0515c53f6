//! In-memory store, used by tests and throwaway sessions.

use std::sync::RwLock;

use game_core::{Character, CharacterId, FloorMap, Inventory, Run, RunId};

use super::error::{RepositoryError, Result};
use super::tables::Tables;
use super::traits::{GameStore, WriteBatch};

/// In-memory implementation of [`GameStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn view<T>(&self, read: impl FnOnce(&Tables) -> T) -> Result<T> {
        let tables = self
            .tables
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(read(&tables))
    }

    fn update<T>(&self, write: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        write(&mut tables)
    }
}

impl GameStore for InMemoryStore {
    fn next_character_id(&self) -> Result<CharacterId> {
        self.update(|tables| Ok(tables.next_character_id()))
    }

    fn next_run_id(&self) -> Result<RunId> {
        self.update(|tables| Ok(tables.next_run_id()))
    }

    fn character(&self, id: CharacterId) -> Result<Option<Character>> {
        self.view(|tables| tables.character(id))
    }

    fn inventory(&self, character: CharacterId) -> Result<Inventory> {
        self.view(|tables| tables.inventory(character))
    }

    fn run(&self, id: RunId) -> Result<Option<Run>> {
        self.view(|tables| tables.run(id))
    }

    fn open_run(&self, character: CharacterId) -> Result<Option<Run>> {
        self.view(|tables| tables.open_run(character))
    }

    fn floor(&self, run: RunId) -> Result<Option<FloorMap>> {
        self.view(|tables| tables.floor(run))
    }

    fn processing_runs(&self) -> Result<Vec<Run>> {
        self.view(Tables::processing_runs)
    }

    fn try_begin_turn(&self, run: RunId, action: &str, now_millis: i64) -> Result<bool> {
        self.update(|tables| Ok(tables.try_begin_turn(run, action, now_millis)))
    }

    fn release_turn(&self, run: RunId) -> Result<bool> {
        self.update(|tables| Ok(tables.release_turn(run)))
    }

    fn commit(&self, batch: WriteBatch) -> Result<()> {
        self.update(|tables| tables.apply(batch))
    }
}
