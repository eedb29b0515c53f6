//! Rolling narration context.
//!
//! A bounded window of compact turn summaries handed to the narration layer.
//! Oldest entries are evicted first; a floor transition empties the window so
//! a new floor is never narrated as continuous with the previous one.

use std::collections::VecDeque;

use crate::intent::IntentKind;
use crate::state::RoomNumber;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextEntry {
    pub turn: u32,
    pub floor: u32,
    pub room: RoomNumber,
    pub intent: IntentKind,
    /// Machine-readable one-liner of the turn's mechanics.
    pub summary: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NarrationContext {
    entries: VecDeque<ContextEntry>,
}

impl NarrationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, evicting the oldest beyond `capacity`.
    pub fn push(&mut self, entry: ContextEntry, capacity: usize) {
        self.entries.push_back(entry);
        while self.entries.len() > capacity.max(1) {
            self.entries.pop_front();
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
