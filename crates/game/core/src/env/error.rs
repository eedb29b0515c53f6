//! Oracle access errors.
//!
//! Errors related to content lookups by stable id.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{DungeonId, EnemyTemplateId, ItemId};

/// Errors that occur when a referenced content record is missing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// Dungeon definition was not found by id.
    #[error("dungeon definition {0} not found")]
    DungeonNotFound(DungeonId),

    /// Item definition was not found by id.
    #[error("item definition {0} not found")]
    ItemNotFound(ItemId),

    /// Enemy template was not found by id.
    #[error("enemy template {0} not found")]
    EnemyNotFound(EnemyTemplateId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            // An unknown dungeon is a bad request; missing referenced content
            // inside a run means the tables changed under it.
            DungeonNotFound(_) => ErrorSeverity::Validation,
            ItemNotFound(_) | EnemyNotFound(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            DungeonNotFound(_) => "ORACLE_DUNGEON_NOT_FOUND",
            ItemNotFound(_) => "ORACLE_ITEM_NOT_FOUND",
            EnemyNotFound(_) => "ORACLE_ENEMY_NOT_FOUND",
        }
    }
}
