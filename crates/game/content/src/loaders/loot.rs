//! Loot table loader.

use std::path::Path;

use game_core::LootRule;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootFile {
    pub rules: Vec<LootRule>,
}

pub struct LootLoader;

impl LootLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<LootRule>> {
        let file: LootFile = parse_ron(path)?;
        Ok(file.rules)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use game_core::env::{DropMode, LootCondition};
    use game_core::{ItemId, LootSource, Skill};

    use super::*;

    #[test]
    fn loads_modes_conditions_and_gates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
                rules: [
                    (source: Enemy, source_id: 1, item: 6, mode: Guaranteed),
                    (source: Chest, source_id: 1, item: 3, quantity: 2, mode: Weighted(5)),
                    (
                        source: Search,
                        source_id: 1,
                        item: 4,
                        mode: Weighted(1),
                        condition: Some(SkillAtLeast(skill: Lockpicking, level: 20)),
                        perception_dc: Some(14),
                    ),
                ],
            )"#
        )
        .unwrap();

        let rules = LootLoader::load(file.path()).unwrap();

        assert_eq!(rules[0].quantity, 1);
        assert_eq!(rules[0].source, LootSource::Enemy);
        assert_eq!(rules[1].mode, DropMode::Weighted(5));
        assert_eq!(rules[1].quantity, 2);
        assert_eq!(
            rules[2].condition,
            Some(LootCondition::SkillAtLeast {
                skill: Skill::Lockpicking,
                level: 20
            })
        );
        assert_eq!(rules[2].perception_dc, Some(14));
        assert_eq!(rules[2].item, ItemId(4));
    }
}
