use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident($inner:ty), $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Persistent player character.
    CharacterId(u64),
    "character"
);
id_type!(
    /// One dungeon attempt.
    RunId(u64),
    "run"
);
id_type!(
    /// Dungeon definition in the content tables.
    DungeonId(u32),
    "dungeon"
);
id_type!(
    /// Item definition in the content tables.
    ItemId(u32),
    "item"
);
id_type!(
    /// Enemy template in the content tables.
    EnemyTemplateId(u32),
    "enemy-template"
);
id_type!(
    /// Index of an enemy instance inside its floor's enemy arena.
    ///
    /// Only meaningful together with the floor map that produced it.
    EnemyId(u16),
    "enemy"
);

impl EnemyId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// 1-based room ordinal within a floor.
pub type RoomNumber = u32;

/// Entrance room of every floor.
pub const ENTRANCE_ROOM: RoomNumber = 1;
