//! Error types raised by repository implementations.

use game_core::{ErrorSeverity, GameError, RunId, RunStatus};
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("record schema {found} is not supported (expected {expected})")]
    SchemaMismatch { found: u32, expected: u32 },

    /// Completed, dead and abandoned runs never change again.
    #[error("{run} is {status} and can no longer be written")]
    TerminalRun { run: RunId, status: RunStatus },

    #[error("{run} conflicts with the open {existing} of the same character")]
    OpenRunConflict { run: RunId, existing: RunId },
}

impl From<serde_json::Error> for RepositoryError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl GameError for RepositoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SchemaMismatch { .. } | Self::CorruptedData(_) => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LockPoisoned => "REPO_LOCK_POISONED",
            Self::Io(_) => "REPO_IO",
            Self::Serialization(_) => "REPO_SERIALIZATION",
            Self::CorruptedData(_) => "REPO_CORRUPTED_DATA",
            Self::SchemaMismatch { .. } => "REPO_SCHEMA_MISMATCH",
            Self::TerminalRun { .. } => "REPO_TERMINAL_RUN",
            Self::OpenRunConflict { .. } => "REPO_OPEN_RUN_CONFLICT",
        }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
