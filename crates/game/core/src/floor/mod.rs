//! Floor graphs: rooms, their contents, and procedural generation.

mod generator;
mod map;
mod room;

pub use generator::{depth_bonus, generate_floor};
pub use map::FloorMap;
pub use room::{Chest, Lock, RestSpot, Room, RoomType, Trap, TrapState};
