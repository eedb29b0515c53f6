//! Traits describing read-only content.
//!
//! Oracles expose item, enemy, dungeon and loot tables addressed by stable
//! integer ids. The [`Env`] aggregate bundles them with the rule tunables so
//! the engine can reach everything it needs without coupling to a concrete
//! content store. Randomness is passed separately because it is the only
//! mutable collaborator.
mod dungeons;
mod enemies;
mod error;
mod items;
mod loot;
mod rng;

pub use dungeons::{CompletionPredicate, DungeonDefinition, DungeonOracle, SpawnRule, TrapDefinition};
pub use enemies::{AbilityDefinition, EnemyOracle, EnemyTemplate, GoldRange, StatusInfliction};
pub use error::OracleError;
pub use items::{ConsumableEffect, EquipSlot, ItemDefinition, ItemKind, ItemOracle};
pub use loot::{DropMode, LootCondition, LootOracle, LootRule, LootSource};
pub use rng::{PcgRng, RngOracle, SequenceRng, compute_seed};

use crate::config::GameConfig;
use crate::state::{DungeonId, EnemyTemplateId, ItemId};

/// Every content table the rules consult.
pub trait ContentOracle: ItemOracle + EnemyOracle + DungeonOracle + LootOracle {}

impl<T> ContentOracle for T where T: ItemOracle + EnemyOracle + DungeonOracle + LootOracle {}

/// Read-only environment for one turn.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    content: &'a dyn ContentOracle,
    config: &'a GameConfig,
}

impl<'a> Env<'a> {
    pub fn new(content: &'a dyn ContentOracle, config: &'a GameConfig) -> Self {
        Self { content, config }
    }

    pub fn content(&self) -> &'a dyn ContentOracle {
        self.content
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    /// Looks up an item definition.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ItemNotFound` if the id is unknown.
    pub fn item(&self, id: ItemId) -> Result<&'a ItemDefinition, OracleError> {
        self.content.item(id).ok_or(OracleError::ItemNotFound(id))
    }

    /// Looks up an enemy template.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::EnemyNotFound` if the id is unknown.
    pub fn enemy(&self, id: EnemyTemplateId) -> Result<&'a EnemyTemplate, OracleError> {
        self.content.enemy(id).ok_or(OracleError::EnemyNotFound(id))
    }

    /// Looks up a dungeon definition.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::DungeonNotFound` if the id is unknown.
    pub fn dungeon(&self, id: DungeonId) -> Result<&'a DungeonDefinition, OracleError> {
        self.content.dungeon(id).ok_or(OracleError::DungeonNotFound(id))
    }
}

impl core::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Env").field("config", self.config).finish_non_exhaustive()
    }
}
