//! Declarative game content and its loaders.
//!
//! Content is authored as data and addressed by stable integer ids:
//! - Item catalog (RON)
//! - Enemy templates with abilities and resistances (RON)
//! - Dungeons with their traps and spawn rules (RON)
//! - Loot tables (RON)
//! - Rule tunables (TOML)
//!
//! [`ContentCatalog`] holds the loaded tables and implements every game-core
//! content oracle. Content is read by the engine and never appears in game
//! state.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{ContentCatalog, ContentIssue};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, DungeonLoader, EnemyLoader, ItemLoader, LootLoader};
