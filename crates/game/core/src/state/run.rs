//! Run record and its lifecycle status.

use strum::{Display, EnumString};

use crate::state::{
    CharacterId, DungeonId, ENTRANCE_ROOM, ItemId, NarrationContext, RoomNumber, RoomState, RunId,
    StatusEffects,
};

/// Lifecycle of a run.
///
/// ```text
/// active -> processing -> active | completed | dead
/// active -> abandoned
/// ```
///
/// The `active -> processing` transition is the per-turn lock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RunStatus {
    #[default]
    Active,
    Processing,
    Completed,
    Dead,
    Abandoned,
}

impl RunStatus {
    /// Terminal runs are immutable.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Dead | Self::Abandoned)
    }

    /// Counts toward the one-open-run-per-character invariant.
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Active | Self::Processing)
    }
}

/// Aggregate statistics of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunStats {
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub kills: u32,
    pub rooms_cleared: u32,
    pub floors_descended: u32,
    pub gold_earned: u32,
    pub turns: u32,
}

/// Item units picked up during the run; the pool death penalties draw from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcquiredItem {
    pub item: ItemId,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Run {
    pub id: RunId,
    pub character: CharacterId,
    pub dungeon: DungeonId,
    pub status: RunStatus,
    pub floor: u32,
    pub room: RoomNumber,
    pub room_state: RoomState,
    pub context: NarrationContext,
    pub stats: RunStats,
    pub effects: StatusEffects,
    pub acquired: Vec<AcquiredItem>,
    /// Action text being resolved while `processing`.
    pub pending_action: Option<String>,
    /// Lease start (unix millis) of the current `processing` lock.
    pub processing_since: Option<i64>,
}

impl Run {
    /// New run standing in the entrance of floor 1.
    pub fn new(id: RunId, character: CharacterId, dungeon: DungeonId) -> Self {
        Self {
            id,
            character,
            dungeon,
            status: RunStatus::Active,
            floor: 1,
            room: ENTRANCE_ROOM,
            room_state: RoomState::default(),
            context: NarrationContext::new(),
            stats: RunStats::default(),
            effects: StatusEffects::new(),
            acquired: Vec::new(),
            pending_action: None,
            processing_since: None,
        }
    }

    pub fn record_acquired(&mut self, item: ItemId, quantity: u32) {
        match self.acquired.iter_mut().find(|a| a.item == item) {
            Some(acquired) => acquired.quantity = acquired.quantity.saturating_add(quantity),
            None => self.acquired.push(AcquiredItem { item, quantity }),
        }
    }

    /// Takes the turn lock. Returns false unless the run was `active`.
    pub fn begin_processing(&mut self, action: impl Into<String>, now_millis: i64) -> bool {
        if self.status != RunStatus::Active {
            return false;
        }
        self.status = RunStatus::Processing;
        self.pending_action = Some(action.into());
        self.processing_since = Some(now_millis);
        true
    }

    /// Releases the turn lock with the run's new status.
    pub fn release(&mut self, status: RunStatus) {
        self.status = status;
        self.pending_action = None;
        self.processing_since = None;
    }

    /// Whether the `processing` lease started at least `timeout_millis` ago.
    pub fn lease_expired(&self, now_millis: i64, timeout_millis: i64) -> bool {
        self.status == RunStatus::Processing
            && self
                .processing_since
                .is_none_or(|since| now_millis.saturating_sub(since) >= timeout_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_only_taken_from_active() {
        let mut run = Run::new(RunId(1), CharacterId(1), DungeonId(1));
        assert!(run.begin_processing("look around", 1_000));
        assert!(!run.begin_processing("attack", 1_001));
        assert_eq!(run.pending_action.as_deref(), Some("look around"));

        run.release(RunStatus::Active);
        assert_eq!(run.pending_action, None);
        assert!(run.begin_processing("attack", 2_000));
    }

    #[test]
    fn lease_expiry_needs_processing_status() {
        let mut run = Run::new(RunId(1), CharacterId(1), DungeonId(1));
        assert!(!run.lease_expired(10_000, 1));
        run.begin_processing("go", 1_000);
        assert!(!run.lease_expired(1_500, 1_000));
        assert!(run.lease_expired(2_000, 1_000));
    }

    #[test]
    fn acquired_units_accumulate() {
        let mut run = Run::new(RunId(1), CharacterId(1), DungeonId(1));
        run.record_acquired(ItemId(4), 1);
        run.record_acquired(ItemId(4), 2);
        assert_eq!(run.acquired, vec![AcquiredItem { item: ItemId(4), quantity: 3 }]);
    }
}
