//! Content factory for building the catalog from data files.

use std::path::{Path, PathBuf};

use game_core::{EnemyTemplate, GameConfig, ItemDefinition, LootRule};
use tracing::info;

use crate::catalog::ContentCatalog;
use crate::loaders::{
    ConfigLoader, DungeonFile, DungeonLoader, EnemyLoader, ItemLoader, LoadResult, LootLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml     (optional)
/// ├── items.ron
/// ├── enemies.ron
/// ├── dungeons.ron
/// └── loot.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load rule tunables from `config.toml`, falling back to defaults when
    /// the file is absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load_or_default(&self.data_dir.join("config.toml"))
    }

    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    pub fn load_enemies(&self) -> LoadResult<Vec<EnemyTemplate>> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    pub fn load_dungeons(&self) -> LoadResult<DungeonFile> {
        DungeonLoader::load(&self.data_dir.join("dungeons.ron"))
    }

    pub fn load_loot(&self) -> LoadResult<Vec<LootRule>> {
        LootLoader::load(&self.data_dir.join("loot.ron"))
    }

    /// Load every table into a sanitized catalog.
    ///
    /// Duplicate ids are a hard error; malformed fields and dangling rules
    /// degrade with a warning (see [`ContentCatalog::sanitize`]).
    pub fn load_catalog(&self) -> LoadResult<ContentCatalog> {
        let mut catalog = ContentCatalog::new();

        for item in self.load_items()? {
            let id = item.id;
            if catalog.insert_item(item).is_some() {
                anyhow::bail!("duplicate {id} in items.ron");
            }
        }
        for enemy in self.load_enemies()? {
            let id = enemy.id;
            if catalog.insert_enemy(enemy).is_some() {
                anyhow::bail!("duplicate {id} in enemies.ron");
            }
        }
        let DungeonFile { dungeons, spawns } = self.load_dungeons()?;
        for dungeon in dungeons {
            let id = dungeon.id;
            if catalog.insert_dungeon(dungeon).is_some() {
                anyhow::bail!("duplicate {id} in dungeons.ron");
            }
        }
        for rule in spawns {
            catalog.insert_spawn_rule(rule);
        }
        for rule in self.load_loot()? {
            catalog.insert_loot_rule(rule);
        }

        let issues = catalog.sanitize();
        info!(
            items = catalog.items().count(),
            enemies = catalog.enemies().count(),
            dungeons = catalog.dungeons().count(),
            spawn_rules = catalog.spawn_rule_count(),
            loot_rules = catalog.loot_rule_count(),
            issues = issues.len(),
            data_dir = %self.data_dir.display(),
            "content loaded"
        );
        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
