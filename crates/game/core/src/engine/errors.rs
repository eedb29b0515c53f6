//! Rejections raised while resolving a turn.
//!
//! Any error aborts the whole turn: the engine restores the state it was
//! handed, so no partial mechanical effect survives.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{RoomNumber, RunStatus};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    /// The caller did not take the turn lock first.
    #[error("run is {status}, expected processing")]
    RunNotProcessing { status: RunStatus },

    #[error("room {0} does not exist on this floor")]
    RoomNotFound(RoomNumber),

    #[error("room {to} is not connected to room {from}")]
    RoomNotConnected { from: RoomNumber, to: RoomNumber },

    #[error("room {0} is locked")]
    RoomLocked(RoomNumber),

    #[error("room {0} is not accessible yet")]
    RoomInaccessible(RoomNumber),

    #[error("cannot leave the room while enemies are fighting")]
    CombatActive,

    #[error("no accessible room to move to")]
    NoAccessibleRoom,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        use TurnError::*;
        match self {
            RunNotProcessing { .. } => ErrorSeverity::Recoverable,
            RoomNotFound(_)
            | RoomNotConnected { .. }
            | RoomLocked(_)
            | RoomInaccessible(_)
            | CombatActive
            | NoAccessibleRoom => ErrorSeverity::Validation,
            Oracle(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use TurnError::*;
        match self {
            RunNotProcessing { .. } => "TURN_RUN_NOT_PROCESSING",
            RoomNotFound(_) => "TURN_ROOM_NOT_FOUND",
            RoomNotConnected { .. } => "TURN_ROOM_NOT_CONNECTED",
            RoomLocked(_) => "TURN_ROOM_LOCKED",
            RoomInaccessible(_) => "TURN_ROOM_INACCESSIBLE",
            CombatActive => "TURN_COMBAT_ACTIVE",
            NoAccessibleRoom => "TURN_NO_ACCESSIBLE_ROOM",
            Oracle(error) => error.error_code(),
        }
    }
}
