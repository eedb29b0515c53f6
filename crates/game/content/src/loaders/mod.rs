//! Content loaders for reading game data from files.
//!
//! Tables are RON, rule tunables are TOML. Each loader returns game-core
//! types directly; [`ContentFactory`] assembles them into a
//! [`crate::ContentCatalog`].

pub mod config;
pub mod dungeons;
pub mod enemies;
pub mod factory;
pub mod items;
pub mod loot;

pub use config::ConfigLoader;
pub use dungeons::{DungeonFile, DungeonLoader};
pub use enemies::{EnemyFile, EnemyLoader};
pub use factory::ContentFactory;
pub use items::{ItemFile, ItemLoader};
pub use loot::{LootFile, LootLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Parses a RON document, naming the file on failure.
pub(crate) fn parse_ron<T: serde::de::DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse RON at {}: {}", path.display(), e))
}
