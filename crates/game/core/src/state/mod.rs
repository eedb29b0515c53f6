//! Authoritative run state representation.
//!
//! This module owns the records a turn reads and writes: the character, the
//! run, and the inventory. The floor map lives in [`crate::floor`]. Runtime
//! layers load and persist these records but mutate them exclusively through
//! the engine.
mod character;
mod common;
mod inventory;
mod narration;
mod room_state;
mod run;
mod status;

pub use character::Character;
pub use common::{
    CharacterId, DungeonId, ENTRANCE_ROOM, EnemyId, EnemyTemplateId, ItemId, RoomNumber, RunId,
};
pub use inventory::{Inventory, InventoryDelta, InventoryEntry};
pub use narration::{ContextEntry, NarrationContext};
pub use room_state::{RoomFlags, RoomState};
pub use run::{AcquiredItem, Run, RunStats, RunStatus};
pub use status::{StatusEffect, StatusEffectKind, StatusEffects, StatusTick};

use crate::floor::FloorMap;

/// Everything one turn may touch.
///
/// The runtime assembles it from storage, hands it to
/// [`crate::engine::GameEngine`], then diffs and persists the result in a
/// single transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub character: Character,
    pub run: Run,
    pub floor: FloorMap,
    pub inventory: Inventory,
}

impl GameState {
    pub fn new(character: Character, run: Run, floor: FloorMap, inventory: Inventory) -> Self {
        Self {
            character,
            run,
            floor,
            inventory,
        }
    }
}
