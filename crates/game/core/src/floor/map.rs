use std::collections::VecDeque;

use crate::combat::EnemyInstance;
use crate::floor::{Room, RoomType};
use crate::state::{ENTRANCE_ROOM, EnemyId, RoomNumber};

/// Room graph of one floor plus the arena of enemies living in it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorMap {
    pub floor: u32,
    pub final_floor: bool,
    /// Sorted by number; room `n` sits at index `n - 1`.
    pub rooms: Vec<Room>,
    pub enemies: Vec<EnemyInstance>,
}

impl FloorMap {
    pub fn room(&self, number: RoomNumber) -> Option<&Room> {
        let index = (number as usize).checked_sub(1)?;
        self.rooms.get(index).filter(|room| room.number == number)
    }

    pub fn room_mut(&mut self, number: RoomNumber) -> Option<&mut Room> {
        let index = (number as usize).checked_sub(1)?;
        self.rooms.get_mut(index).filter(|room| room.number == number)
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&EnemyInstance> {
        self.enemies.get(id.index())
    }

    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut EnemyInstance> {
        self.enemies.get_mut(id.index())
    }

    /// Living enemies of `room`, in generation order.
    pub fn living_enemies(&self, room: RoomNumber) -> Vec<EnemyId> {
        self.room(room)
            .map(|room| {
                room.enemies
                    .iter()
                    .copied()
                    .filter(|&id| self.enemy(id).is_some_and(|e| e.alive))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Marks `number` cleared and opens every connected room that is not
    /// locked. Returns the rooms that became accessible.
    pub fn clear_room(&mut self, number: RoomNumber) -> Vec<RoomNumber> {
        let opened = self.opened_by_clearing(number);
        if let Some(room) = self.room_mut(number) {
            room.cleared = true;
        }
        for &neighbour in &opened {
            if let Some(next) = self.room_mut(neighbour) {
                next.accessible = true;
            }
        }
        opened
    }

    /// Neighbours that clearing `number` would open: unlocked and not yet
    /// accessible.
    pub fn opened_by_clearing(&self, number: RoomNumber) -> Vec<RoomNumber> {
        self.room(number)
            .map(|room| {
                room.connections
                    .iter()
                    .copied()
                    .filter(|&n| {
                        self.room(n)
                            .is_some_and(|next| next.lock.is_none() && !next.accessible)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Opens a locked room. Returns false if it was not locked.
    pub fn unlock_room(&mut self, number: RoomNumber) -> bool {
        match self.room_mut(number) {
            Some(room) if room.is_locked() => {
                room.accessible = true;
                true
            }
            _ => false,
        }
    }

    /// Every room reachable from the entrance.
    pub fn is_connected(&self) -> bool {
        if self.rooms.is_empty() {
            return false;
        }
        let mut seen = vec![false; self.rooms.len()];
        let mut queue = VecDeque::from([ENTRANCE_ROOM]);
        seen[0] = true;
        while let Some(number) = queue.pop_front() {
            let Some(room) = self.room(number) else {
                continue;
            };
            for &next in &room.connections {
                let Some(index) = (next as usize).checked_sub(1) else {
                    continue;
                };
                if index < seen.len() && !seen[index] {
                    seen[index] = true;
                    queue.push_back(next);
                }
            }
        }
        seen.into_iter().all(|reached| reached)
    }

    pub fn exit_room(&self) -> Option<&Room> {
        self.rooms.iter().find(|room| room.exit)
    }

    pub fn boss_room(&self) -> Option<&Room> {
        self.rooms.iter().find(|room| room.kind == RoomType::Boss)
    }

    /// Connected rooms of `number` the player may enter.
    pub fn accessible_neighbours(&self, number: RoomNumber) -> Vec<&Room> {
        self.room(number)
            .map(|room| {
                room.connections
                    .iter()
                    .filter_map(|&n| self.room(n))
                    .filter(|next| next.accessible)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Connected rooms of `number` still behind a lock.
    pub fn locked_neighbours(&self, number: RoomNumber) -> Vec<RoomNumber> {
        self.room(number)
            .map(|room| {
                room.connections
                    .iter()
                    .copied()
                    .filter(|&n| self.room(n).is_some_and(Room::is_locked))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor::Lock;

    fn line(count: u32) -> FloorMap {
        let mut rooms: Vec<Room> = (1..=count).map(|n| Room::new(n, RoomType::Standard)).collect();
        for n in 1..count {
            rooms[n as usize - 1].connections.push(n + 1);
            rooms[n as usize].connections.push(n);
        }
        rooms[0].accessible = true;
        FloorMap {
            floor: 1,
            final_floor: false,
            rooms,
            enemies: Vec::new(),
        }
    }

    #[test]
    fn clearing_opens_unlocked_neighbours_only() {
        let mut map = line(4);
        // branch 2 <-> 4, and room 3 is locked
        map.rooms[1].connections.push(4);
        map.rooms[3].connections.push(2);
        map.rooms[2].kind = RoomType::Locked;
        map.rooms[2].lock = Some(Lock { dc: 14 });

        assert_eq!(map.clear_room(1), vec![2]);
        assert_eq!(map.clear_room(2), vec![4]);
        assert!(!map.room(3).unwrap().accessible);
        assert!(map.room(2).unwrap().cleared);
    }

    #[test]
    fn locked_room_opens_only_by_unlock() {
        let mut map = line(3);
        map.rooms[1].kind = RoomType::Locked;
        map.rooms[1].lock = Some(Lock { dc: 14 });
        map.clear_room(1);
        assert!(map.room(2).unwrap().is_locked());
        assert_eq!(map.locked_neighbours(1), vec![2]);
        assert!(map.unlock_room(2));
        assert!(map.room(2).unwrap().accessible);
        assert!(!map.unlock_room(2));
    }

    #[test]
    fn connectivity_detects_islands() {
        let mut map = line(3);
        assert!(map.is_connected());
        map.rooms[1].connections.retain(|&n| n != 3);
        map.rooms[2].connections.clear();
        assert!(!map.is_connected());
    }
}
