//! Worker configuration with TOML file support.

use serde::{Deserialize, Serialize};

use keeper_types::Environment;

use crate::JobError;

/// Configuration for the keeper workers.
///
/// Can be loaded from a TOML file via [`WorkerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). The chain registry itself is not
/// part of this struct — it is resolved from `environment` at startup and
/// injected into the workers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Which chain-capacity table to run with.
    #[serde(default = "default_environment")]
    pub environment: Environment,

    /// Base URL of the relay network gateway.
    #[serde(default = "default_network_url")]
    pub network_url: String,

    /// Pool fill cadence, seconds.
    #[serde(default = "default_fill_interval")]
    pub fill_interval_secs: u64,

    /// Pool stake cadence, seconds.
    #[serde(default = "default_stake_interval")]
    pub stake_interval_secs: u64,

    /// Pool decommission cadence, seconds.
    #[serde(default = "default_decommission_interval")]
    pub decommission_interval_secs: u64,

    /// Cadence for both statistics jobs, seconds.
    #[serde(default = "default_stats_interval")]
    pub stats_interval_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_environment() -> Environment {
    Environment::Development
}

fn default_network_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_fill_interval() -> u64 {
    60
}

fn default_stake_interval() -> u64 {
    5 * 60
}

fn default_decommission_interval() -> u64 {
    15 * 60
}

fn default_stats_interval() -> u64 {
    60 * 60
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl WorkerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, JobError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| JobError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, JobError> {
        toml::from_str(s).map_err(|e| JobError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("WorkerConfig is always serializable to TOML")
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            network_url: default_network_url(),
            fill_interval_secs: default_fill_interval(),
            stake_interval_secs: default_stake_interval(),
            decommission_interval_secs: default_decommission_interval(),
            stats_interval_secs: default_stats_interval(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JobErrorKind;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = WorkerConfig::default();
        let toml_str = config.to_toml_string();
        let parsed = WorkerConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.environment, config.environment);
        assert_eq!(parsed.stats_interval_secs, config.stats_interval_secs);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = WorkerConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.fill_interval_secs, 60);
        assert_eq!(config.stake_interval_secs, 300);
        assert_eq!(config.decommission_interval_secs, 900);
        assert_eq!(config.stats_interval_secs, 3600);
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            environment = "production"
            fill_interval_secs = 30
        "#;
        let config = WorkerConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.fill_interval_secs, 30);
        assert_eq!(config.log_format, "human"); // default
    }

    #[test]
    fn unknown_environment_string_is_a_config_error() {
        let result = WorkerConfig::from_toml_str("environment = \"staging\"");
        assert_eq!(result.unwrap_err().kind(), JobErrorKind::Config);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = WorkerConfig::from_toml_file("/nonexistent/keeper.toml");
        assert_eq!(result.unwrap_err().kind(), JobErrorKind::Config);
    }

    #[test]
    fn loads_from_a_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keeper.toml");
        std::fs::write(&path, "environment = \"production\"\nstats_interval_secs = 7200\n")
            .unwrap();

        let config = WorkerConfig::from_toml_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.stats_interval_secs, 7200);
    }
}
