use bitflags::bitflags;

use crate::state::{EnemyId, RoomNumber};

bitflags! {
    /// Ambient conditions of the player's surroundings.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RoomFlags: u8 {
        /// A torch is burning.
        const LIT_TORCH = 1 << 0;
        /// The room's trap has been sprung or spotted this visit.
        const TRAP_RESOLVED = 1 << 1;
    }
}

/// Mutable combat and ambient snapshot of the room the player occupies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomState {
    pub in_combat: bool,
    /// Enemy rounds resolved in the current fight.
    pub round: u32,
    pub living: Vec<EnemyId>,
    pub dead: Vec<EnemyId>,
    pub flags: RoomFlags,
    /// Room the player came from; flee target.
    pub previous_room: Option<RoomNumber>,
}

impl RoomState {
    /// State on entering a room holding `living` enemies.
    pub fn entered(living: Vec<EnemyId>, previous_room: Option<RoomNumber>, flags: RoomFlags) -> Self {
        Self {
            in_combat: !living.is_empty(),
            round: 0,
            living,
            dead: Vec::new(),
            flags: flags & RoomFlags::LIT_TORCH,
            previous_room,
        }
    }

    /// Moves `enemy` from the living to the dead list and ends combat when
    /// nobody is left. Returns whether combat ended.
    pub fn mark_dead(&mut self, enemy: EnemyId) -> bool {
        if let Some(index) = self.living.iter().position(|&id| id == enemy) {
            self.living.remove(index);
            self.dead.push(enemy);
        }
        if self.living.is_empty() {
            self.in_combat = false;
        }
        !self.in_combat
    }

    pub fn is_living(&self, enemy: EnemyId) -> bool {
        self.living.contains(&enemy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combat_ends_only_when_last_enemy_dies() {
        let mut state = RoomState::entered(vec![EnemyId(0), EnemyId(1)], Some(1), RoomFlags::empty());
        assert!(state.in_combat);
        assert!(!state.mark_dead(EnemyId(0)));
        assert!(state.in_combat);
        assert!(state.mark_dead(EnemyId(1)));
        assert!(!state.in_combat);
        assert_eq!(state.dead, vec![EnemyId(0), EnemyId(1)]);
    }

    #[test]
    fn only_the_torch_follows_the_player() {
        let state = RoomState::entered(Vec::new(), None, RoomFlags::all());
        assert_eq!(state.flags, RoomFlags::LIT_TORCH);
        assert!(!state.in_combat);
    }
}
