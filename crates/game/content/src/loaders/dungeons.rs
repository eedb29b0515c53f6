//! Dungeon and spawn table loader.

use std::path::Path;

use game_core::{DungeonDefinition, SpawnRule};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

/// Dungeons and the spawn rules that populate them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonFile {
    pub dungeons: Vec<DungeonDefinition>,
    #[serde(default)]
    pub spawns: Vec<SpawnRule>,
}

pub struct DungeonLoader;

impl DungeonLoader {
    pub fn load(path: &Path) -> LoadResult<DungeonFile> {
        parse_ron(path)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use game_core::env::CompletionPredicate;
    use game_core::{DungeonId, EnemyTemplateId};

    use super::*;

    #[test]
    fn loads_dungeons_with_traps_and_spawns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
                dungeons: [
                    (
                        id: 1,
                        name: "Sunken Crypt",
                        floors: 3,
                        tier: 2,
                        dc_min: 11,
                        dc_max: 15,
                        entry_cost: 25,
                        scaling_factor: 1.25,
                        completion: Boss(9),
                        traps: [(name: "Dart Trap", detect_dc: 13, damage: 4)],
                        chest_gold: (min: 5, max: 20),
                    ),
                ],
                spawns: [
                    (dungeon: 1, enemy: 1, weight: 6),
                    (dungeon: 1, enemy: 9, weight: 1, min_floor: 3),
                ],
            )"#
        )
        .unwrap();

        let file = DungeonLoader::load(file.path()).unwrap();

        let crypt = &file.dungeons[0];
        assert_eq!(crypt.completion, CompletionPredicate::Boss(EnemyTemplateId(9)));
        assert_eq!(crypt.traps[0].detect_dc, 13);
        assert_eq!(file.spawns.len(), 2);
        assert_eq!(file.spawns[0].dungeon, DungeonId(1));
        assert_eq!(file.spawns[0].min_floor, 1);
        assert!(!file.spawns[1].applies_to_floor(2));
    }
}
