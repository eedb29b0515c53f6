//! Game configuration loader.

use std::path::Path;

use game_core::GameConfig;
use tracing::info;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Keys missing from the file keep
    /// their defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        let config: GameConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }

    /// Like [`ConfigLoader::load`], but an absent file yields the defaults.
    pub fn load_or_default(path: &Path) -> LoadResult<GameConfig> {
        if !path.exists() {
            info!(path = %path.display(), "no config file; using defaults");
            return Ok(GameConfig::default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "context_window = 4\ncompletion_bonus = [10, 20]").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();

        assert_eq!(config.context_window, 4);
        assert_eq!(config.completion_bonus_for(5), 20);
        assert_eq!(config.rest_heal_percent, 50);
    }

    #[test]
    fn missing_file_is_an_error_unless_defaulted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(ConfigLoader::load(&path).is_err());
        assert_eq!(ConfigLoader::load_or_default(&path).unwrap(), GameConfig::default());
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "context_window = \"ten\"").unwrap();
        assert!(ConfigLoader::load(file.path()).is_err());
    }
}
