//! Enemy template loader.

use std::path::Path;

use game_core::EnemyTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyFile {
    pub enemies: Vec<EnemyTemplate>,
}

pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyTemplate>> {
        let file: EnemyFile = parse_ron(path)?;
        Ok(file.enemies)
    }
}
