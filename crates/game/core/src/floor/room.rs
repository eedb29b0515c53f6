use strum::{Display, EnumString};

use crate::env::TrapDefinition;
use crate::state::{EnemyId, RoomNumber};

/// Room archetype drawn by the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoomType {
    Standard,
    Treasure,
    Trap,
    Rest,
    Locked,
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chest {
    pub locked: bool,
    pub lock_dc: u32,
    pub opened: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrapState {
    Armed,
    /// Spotted on entry; harmless.
    Detected,
    /// Went off on entry.
    Triggered,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trap {
    pub definition: TrapDefinition,
    pub state: TrapState,
}

impl Trap {
    pub fn is_armed(&self) -> bool {
        self.state == TrapState::Armed
    }
}

/// Lock barring a `locked` room; opened by an explicit unlock action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lock {
    pub dc: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestSpot {
    pub used: bool,
}

/// One node of a floor graph.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub number: RoomNumber,
    pub kind: RoomType,
    pub accessible: bool,
    pub cleared: bool,
    pub visited: bool,
    /// Leads to the next floor.
    pub exit: bool,
    pub searched: bool,
    pub connections: Vec<RoomNumber>,
    pub chest: Option<Chest>,
    pub trap: Option<Trap>,
    pub lock: Option<Lock>,
    pub rest: Option<RestSpot>,
    /// Arena indices of the enemies generated into this room.
    pub enemies: Vec<EnemyId>,
}

impl Room {
    pub fn new(number: RoomNumber, kind: RoomType) -> Self {
        Self {
            number,
            kind,
            accessible: false,
            cleared: false,
            visited: false,
            exit: false,
            searched: false,
            connections: Vec::new(),
            chest: None,
            trap: None,
            lock: None,
            rest: None,
            enemies: Vec::new(),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some() && !self.accessible
    }

    pub fn connects_to(&self, other: RoomNumber) -> bool {
        self.connections.contains(&other)
    }

    pub fn rest_available(&self) -> bool {
        self.rest.is_some_and(|rest| !rest.used)
    }
}
