//! Runtime settings: built-in defaults, then an optional TOML file, then
//! `WEATHER_*` environment variables.

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_LISTEN_ADDR, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_OBSERVATION_BATCH_SIZE, DEFAULT_STATS_BATCH_SIZE,
};

pub const ENV_PREFIX: &str = "WEATHER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(length(min = 1))]
    pub database_url: String,

    #[validate(length(min = 1))]
    pub listen_addr: String,

    #[validate(range(min = 1))]
    pub max_connections: u32,

    /// Observation rows per committed transaction during weather ingestion.
    #[validate(range(min = 1))]
    pub observation_batch_size: usize,

    /// Stat rows per committed transaction during aggregation.
    #[validate(range(min = 1))]
    pub stats_batch_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            observation_batch_size: DEFAULT_OBSERVATION_BATCH_SIZE,
            stats_batch_size: DEFAULT_STATS_BATCH_SIZE,
        }
    }
}

impl Settings {
    /// Load settings, reading `config_file` when given (it must exist).
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_file, Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn load_with_env(config_file: Option<&Path>, env: Environment) -> Result<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("database_url", defaults.database_url)?
            .set_default("listen_addr", defaults.listen_addr)?
            .set_default("max_connections", u64::from(defaults.max_connections))?
            .set_default("observation_batch_size", defaults.observation_batch_size as u64)?
            .set_default("stats_batch_size", defaults.stats_batch_size as u64)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let settings: Settings = builder.add_source(env).build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply a connection string given on the command line or via `DATABASE_URL`.
    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        self
    }

    pub fn with_listen_addr(mut self, listen_addr: Option<String>) -> Self {
        if let Some(addr) = listen_addr {
            self.listen_addr = addr;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with_env(None, env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.observation_batch_size, 10_000);
        assert_eq!(settings.stats_batch_size, 500);
    }

    #[test]
    fn test_file_then_env_layering() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weather.toml");
        std::fs::write(
            &path,
            "database_url = \"sqlite://from-file.db\"\nstats_batch_size = 50\n",
        )
        .unwrap();

        let settings =
            Settings::load_with_env(Some(path.as_path()), env(&[("WEATHER_STATS_BATCH_SIZE", "25")])).unwrap();

        assert_eq!(settings.database_url, "sqlite://from-file.db");
        assert_eq!(settings.stats_batch_size, 25);
        assert_eq!(settings.observation_batch_size, 10_000);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = Settings::load_with_env(None, env(&[("WEATHER_OBSERVATION_BATCH_SIZE", "0")]));
        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = Settings::load_with_env(Some(Path::new("/no/such/weather.toml")), env(&[]));
        assert!(matches!(result, Err(PipelineError::ConfigSource(_))));
    }

    #[test]
    fn test_cli_override() {
        let settings = Settings::default()
            .with_database_url(Some("sqlite::memory:".to_string()))
            .with_database_url(None)
            .with_listen_addr(Some("127.0.0.1:8080".to_string()));
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.listen_addr, "127.0.0.1:8080");
    }
}
