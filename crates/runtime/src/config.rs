//! Runtime configuration loaded from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::{Result, RuntimeError};
use crate::rng::RngSource;

pub const DATA_DIR_VAR: &str = "DUNGEON_DATA_DIR";
pub const SAVE_DIR_VAR: &str = "DUNGEON_SAVE_DIR";
pub const LEASE_TIMEOUT_VAR: &str = "DUNGEON_LEASE_TIMEOUT_SECS";
pub const RNG_SEED_VAR: &str = "DUNGEON_RNG_SEED";

/// Settings of the run service that are not game rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Directory holding the content pack (`items.ron`, `config.toml`, ...).
    pub data_dir: PathBuf,
    /// Directory of the file store.
    pub save_dir: PathBuf,
    /// How long a run may stay `processing` before recovery unlocks it.
    pub lease_timeout: Duration,
    /// Fixed seed making every draw of the session reproducible.
    pub rng_seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            save_dir: default_save_dir(),
            lease_timeout: Duration::from_secs(Self::DEFAULT_LEASE_TIMEOUT_SECS),
            rng_seed: None,
        }
    }
}

impl RuntimeConfig {
    pub const DEFAULT_LEASE_TIMEOUT_SECS: u64 = 30;

    /// Defaults overridden by `DUNGEON_*` environment variables.
    ///
    /// # Errors
    ///
    /// A variable that is set but does not parse is a configuration error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(dir) = lookup(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(SAVE_DIR_VAR) {
            config.save_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup(LEASE_TIMEOUT_VAR) {
            config.lease_timeout = Duration::from_secs(parse(LEASE_TIMEOUT_VAR, &secs)?);
        }
        if let Some(seed) = lookup(RNG_SEED_VAR) {
            config.rng_seed = Some(parse(RNG_SEED_VAR, &seed)?);
        }
        Ok(config)
    }

    pub fn rng_source(&self) -> RngSource {
        self.rng_seed.map_or(RngSource::Live, RngSource::Seeded)
    }

    pub fn lease_timeout_millis(&self) -> i64 {
        i64::try_from(self.lease_timeout.as_millis()).unwrap_or(i64::MAX)
    }
}

fn parse(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| RuntimeError::Config(format!("{key} must be an unsigned integer, got {value:?}")))
}

fn default_save_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "dungeon")
        .map(|dirs| dirs.data_dir().join("saves"))
        .unwrap_or_else(|| PathBuf::from("saves"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = RuntimeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.lease_timeout, Duration::from_secs(30));
        assert_eq!(config.rng_source(), RngSource::Live);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn variables_override_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            (DATA_DIR_VAR, "/srv/content"),
            (SAVE_DIR_VAR, "/srv/saves"),
            (LEASE_TIMEOUT_VAR, "5"),
            (RNG_SEED_VAR, "1234"),
        ]))
        .unwrap();
        assert_eq!(config.save_dir, PathBuf::from("/srv/saves"));
        assert_eq!(config.lease_timeout_millis(), 5_000);
        assert_eq!(config.rng_source(), RngSource::Seeded(1234));
    }

    #[test]
    fn unparsable_variable_is_a_config_error() {
        let error = RuntimeConfig::from_lookup(lookup(&[(RNG_SEED_VAR, "soon")])).unwrap_err();
        assert!(matches!(error, RuntimeError::Config(_)));
    }
}
