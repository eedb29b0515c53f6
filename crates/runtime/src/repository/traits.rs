//! Storage contract for the mutable records of the game.
//!
//! Content tables are static and live in the catalog; the store only holds
//! what changes during play: characters, their inventories, runs and the
//! floor map of each run.

use game_core::state::InventoryDelta;
use game_core::{Character, CharacterId, FloorMap, Inventory, Run, RunId};

use super::error::Result;

/// Everything one request persists, applied all-or-nothing.
#[derive(Clone, Debug, Default)]
pub struct WriteBatch {
    pub characters: Vec<Character>,
    pub runs: Vec<Run>,
    pub floors: Vec<(RunId, FloorMap)>,
    pub inventories: Vec<(CharacterId, InventoryDelta)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn character(mut self, character: Character) -> Self {
        self.characters.push(character);
        self
    }

    pub fn run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn floor(mut self, run: RunId, floor: FloorMap) -> Self {
        self.floors.push((run, floor));
        self
    }

    /// Queue inventory changes; empty deltas are skipped.
    pub fn inventory(mut self, character: CharacterId, delta: InventoryDelta) -> Self {
        if !delta.is_empty() {
            self.inventories.push((character, delta));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
            && self.runs.is_empty()
            && self.floors.is_empty()
            && self.inventories.is_empty()
    }
}

/// Persistent store for characters, runs, floors and inventories.
///
/// Implementations must be safe to share between threads: distinct runs are
/// processed concurrently and only ever contend on the store itself.
pub trait GameStore: Send + Sync {
    fn next_character_id(&self) -> Result<CharacterId>;

    fn next_run_id(&self) -> Result<RunId>;

    fn character(&self, id: CharacterId) -> Result<Option<Character>>;

    /// Inventory of a character; empty when nothing was ever stored.
    fn inventory(&self, character: CharacterId) -> Result<Inventory>;

    fn run(&self, id: RunId) -> Result<Option<Run>>;

    /// The active or processing run of a character, if any.
    fn open_run(&self, character: CharacterId) -> Result<Option<Run>>;

    fn floor(&self, run: RunId) -> Result<Option<FloorMap>>;

    /// Runs currently holding the turn lock.
    fn processing_runs(&self) -> Result<Vec<Run>>;

    /// Compare-and-set `active -> processing`.
    ///
    /// Returns false when the run is missing or not `active`; the stored
    /// record is untouched in that case.
    fn try_begin_turn(&self, run: RunId, action: &str, now_millis: i64) -> Result<bool>;

    /// Put a `processing` run back to `active`. Returns false when the run
    /// was not processing.
    fn release_turn(&self, run: RunId) -> Result<bool>;

    /// Apply every write of `batch` or none of them.
    fn commit(&self, batch: WriteBatch) -> Result<()>;
}
