//! File-backed store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use game_core::{Character, CharacterId, FloorMap, Inventory, Run, RunId};

use super::codec;
use super::error::{RepositoryError, Result};
use super::tables::Tables;
use super::traits::{GameStore, WriteBatch};

const STORE_FILE: &str = "store.json";
const RECORD_KIND: &str = "store";

/// File-based implementation of [`GameStore`].
///
/// All tables live in one versioned JSON document (`store.json`) that is
/// rewritten through a temp file and an atomic rename on every change, so a
/// crash leaves either the old or the new document and never a torn one.
/// Every change is applied to a copy first and only becomes visible once it
/// reached the disk, which makes [`GameStore::commit`] all-or-nothing and
/// keeps the turn lock across restarts.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    tables: RwLock<Tables>,
}

impl FileStore {
    /// Open the store in `base_dir`, creating the directory when needed.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        fs::create_dir_all(base_dir)?;
        let path = base_dir.join(STORE_FILE);

        let tables = if path.exists() {
            let bytes = fs::read(&path)?;
            let tables: Tables = codec::decode(RECORD_KIND, &bytes)?;
            tracing::debug!(path = %path.display(), "loaded store");
            tables
        } else {
            Tables::default()
        };

        Ok(Self {
            path,
            tables: RwLock::new(tables),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, tables: &Tables) -> Result<()> {
        let bytes = codec::encode(RECORD_KIND, tables)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &self.path)?;
        tracing::debug!(path = %self.path.display(), "saved store");
        Ok(())
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
        let mut next = tables.clone();
        let output = write(&mut next)?;
        if next != *tables {
            self.persist(&next)?;
            *tables = next;
        }
        Ok(output)
    }
}

impl GameStore for FileStore {
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

#[cfg(test)]
mod tests {
    use game_core::{DungeonId, Stats};

    use super::*;

    #[test]
    fn reopening_sees_committed_records() {
        let dir = tempfile::tempdir().unwrap();
        let character;
        {
            let store = FileStore::open(dir.path()).unwrap();
            character = store.next_character_id().unwrap();
            let run = store.next_run_id().unwrap();
            store
                .commit(
                    WriteBatch::new()
                        .character(Character::new(character, "Ayla", Stats::default(), 40))
                        .run(Run::new(run, character, DungeonId(1))),
                )
                .unwrap();
            assert!(store.try_begin_turn(run, "look around", 10).unwrap());
        }

        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.character(character).unwrap().unwrap().gold, 40);
        // the lock is persisted with the run
        assert_eq!(store.processing_runs().unwrap().len(), 1);
        assert_eq!(store.next_character_id().unwrap(), CharacterId(2));
    }

    #[test]
    fn corrupt_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STORE_FILE), b"{ not json").unwrap();
        assert!(matches!(
            FileStore::open(dir.path()),
            Err(RepositoryError::Serialization(_))
        ));
    }
}
