//! Item catalog loader.

use std::path::Path;

use game_core::ItemDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFile {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let file: ItemFile = parse_ron(path)?;
        Ok(file.items)
    }
}
