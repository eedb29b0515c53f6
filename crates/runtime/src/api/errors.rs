//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule rejections, content lookups and repository failures so clients
//! can report them with a stable code and a severity.

use game_core::{
    CharacterId, DungeonId, ErrorSeverity, GameError, OracleError, RunId, RunStatus, TurnError,
};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{0} does not exist")]
    NoCharacter(CharacterId),

    #[error("{0} has no active run")]
    NoActiveRun(CharacterId),

    #[error("{character} is already in {run}")]
    RunAlreadyOpen { character: CharacterId, run: RunId },

    #[error("entering {dungeon} costs {needed} gold, {available} available")]
    InsufficientGold {
        dungeon: DungeonId,
        needed: u32,
        available: u32,
    },

    #[error("character name must not be empty")]
    EmptyName,

    /// Another request holds the turn lock.
    #[error("{run} is {status} and cannot take an action now")]
    RunNotActive { run: RunId, status: RunStatus },

    #[error("{0} has no floor map")]
    MissingFloor(RunId),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("run service requires a store before building")]
    MissingStore,

    #[error("run service requires a content catalog before building")]
    MissingContent,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        use RuntimeError::*;
        match self {
            NoCharacter(_)
            | NoActiveRun(_)
            | RunAlreadyOpen { .. }
            | InsufficientGold { .. }
            | EmptyName => ErrorSeverity::Validation,
            RunNotActive { .. } => ErrorSeverity::Recoverable,
            MissingFloor(_) | MissingStore | MissingContent => ErrorSeverity::Internal,
            Turn(error) => error.severity(),
            Oracle(error) => error.severity(),
            Repository(error) => error.severity(),
            Config(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use RuntimeError::*;
        match self {
            NoCharacter(_) => "RUNTIME_NO_CHARACTER",
            NoActiveRun(_) => "RUNTIME_NO_ACTIVE_RUN",
            RunAlreadyOpen { .. } => "RUNTIME_RUN_ALREADY_OPEN",
            InsufficientGold { .. } => "RUNTIME_INSUFFICIENT_GOLD",
            EmptyName => "RUNTIME_EMPTY_NAME",
            RunNotActive { .. } => "RUNTIME_RUN_NOT_ACTIVE",
            MissingFloor(_) => "RUNTIME_MISSING_FLOOR",
            Turn(error) => error.error_code(),
            Oracle(error) => error.error_code(),
            Repository(error) => error.error_code(),
            MissingStore => "RUNTIME_MISSING_STORE",
            MissingContent => "RUNTIME_MISSING_CONTENT",
            Config(_) => "RUNTIME_CONFIG",
        }
    }
}
