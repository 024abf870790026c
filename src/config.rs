use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub catalogue_path: Option<PathBuf>,
    pub min_frequency: u32,
    pub min_co_occurrence: u32,
    pub lookback_days: u32,
    pub concurrency_limit: usize,
    pub shard_size: usize,
    pub requests_per_minute: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "jobpulse.db".to_string(),
            catalogue_path: None,
            min_frequency: 2,
            min_co_occurrence: 1,
            lookback_days: 30,
            concurrency_limit: 4,
            shard_size: 500,
            requests_per_minute: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let database_path =
            env::var("JOBPULSE_DATABASE").unwrap_or(defaults.database_path);

        let catalogue_path = match env::var("JOBPULSE_CATALOGUE") {
            Ok(path) if path.trim().is_empty() => {
                return Err(Error::Config(
                    "JOBPULSE_CATALOGUE is set but empty".to_string(),
                ))
            }
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => None,
        };

        Ok(Self {
            database_path,
            catalogue_path,
            min_frequency: parse_var("JOBPULSE_MIN_FREQUENCY", defaults.min_frequency),
            min_co_occurrence: parse_var(
                "JOBPULSE_MIN_CO_OCCURRENCE",
                defaults.min_co_occurrence,
            ),
            lookback_days: parse_var("JOBPULSE_LOOKBACK_DAYS", defaults.lookback_days),
            concurrency_limit: parse_var("JOBPULSE_CONCURRENCY", defaults.concurrency_limit),
            shard_size: parse_var("JOBPULSE_SHARD_SIZE", defaults.shard_size),
            requests_per_minute: parse_var(
                "JOBPULSE_REQUESTS_PER_MINUTE",
                defaults.requests_per_minute,
            ),
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub concurrency_limit: usize,
    pub shard_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            concurrency_limit: config.concurrency_limit.max(1),
            shard_size: config.shard_size.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.min_frequency, 2);
        assert_eq!(config.min_co_occurrence, 1);
        assert_eq!(config.database_path, "jobpulse.db");
        assert!(config.catalogue_path.is_none());
    }

    #[test]
    fn test_pipeline_config_never_zero() {
        let config = Config {
            concurrency_limit: 0,
            shard_size: 0,
            ..Config::default()
        };
        let pipeline = PipelineConfig::from(&config);
        assert_eq!(pipeline.concurrency_limit, 1);
        assert_eq!(pipeline.shard_size, 1);
    }

    #[test]
    fn test_parse_var_missing_uses_default() {
        assert_eq!(parse_var("JOBPULSE_TEST_UNSET_VARIABLE", 7u32), 7);
    }
}
