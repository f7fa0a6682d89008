//! Chain identifiers and the per-environment chain registry.
//!
//! Each supported relay chain has a fixed configuration entry: its network
//! identifier, ticker symbol, and the target number of pre-staked application
//! accounts the pool keeps in reserve for it. The registry is resolved once at
//! startup from the selected environment and injected into the workers —
//! job bodies never read ambient process state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// A relay chain identifier (four-hex-digit network id, e.g. `"0021"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainId(String);

impl ChainId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chain's ticker symbol (e.g. `"ETH"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self(ticker.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deployment environment selector.
///
/// Chooses which chain-capacity table the process runs with. Anything other
/// than the two known environments is a startup configuration error — the
/// workers must not start with an undefined chain set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(TypesError::UnknownEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable configuration for one supported chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Relay chain network identifier.
    pub id: ChainId,
    /// Ticker symbol.
    pub ticker: Ticker,
    /// Target pool size: how many application accounts to hold in reserve.
    pub capacity: u32,
}

impl ChainConfig {
    pub fn new(id: &str, ticker: &str, capacity: u32) -> Self {
        Self {
            id: ChainId::new(id),
            ticker: Ticker::new(ticker),
            capacity,
        }
    }
}

/// The full chain table for one environment, keyed by chain id.
///
/// Constructed once per process and passed into the workers at construction
/// time, which keeps job bodies deterministic under test (any table can be
/// injected).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRegistry {
    chains: BTreeMap<ChainId, ChainConfig>,
}

impl ChainRegistry {
    /// Build a registry from an explicit list of chain configurations.
    pub fn from_configs(configs: impl IntoIterator<Item = ChainConfig>) -> Self {
        Self {
            chains: configs.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    /// Resolve the fixed chain table for an environment.
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::from_configs([
                ChainConfig::new("0001", "NATIVE", 1),
                ChainConfig::new("0021", "ETH", 2),
                ChainConfig::new("0027", "XDAI", 2),
            ]),
            Environment::Production => Self::from_configs([
                ChainConfig::new("0001", "NATIVE", 5),
                ChainConfig::new("0003", "AVAX", 20),
                ChainConfig::new("0009", "POLY", 40),
                ChainConfig::new("0021", "ETH", 60),
                ChainConfig::new("0027", "XDAI", 20),
                ChainConfig::new("0040", "HMY", 10),
            ]),
        }
    }

    pub fn get(&self, id: &ChainId) -> Option<&ChainConfig> {
        self.chains.get(id)
    }

    pub fn contains(&self, id: &ChainId) -> bool {
        self.chains.contains_key(id)
    }

    /// Target pool capacity for a chain, if it is registered.
    pub fn capacity_of(&self, id: &ChainId) -> Option<u32> {
        self.chains.get(id).map(|c| c.capacity)
    }

    /// Iterate chain configurations in chain-id order.
    pub fn iter(&self) -> impl Iterator<Item = &ChainConfig> {
        self.chains.values()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_known_values() {
        assert_eq!(
            "development".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert_eq!(
            "Production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
    }

    #[test]
    fn unknown_environment_is_an_error() {
        let err = "staging".parse::<Environment>().unwrap_err();
        assert!(matches!(err, TypesError::UnknownEnvironment(ref s) if s == "staging"));
    }

    #[test]
    fn development_registry_is_small() {
        let registry = ChainRegistry::for_environment(Environment::Development);
        assert!(!registry.is_empty());
        assert!(registry.iter().all(|c| c.capacity <= 2));
    }

    #[test]
    fn production_registry_has_distinct_capacities() {
        let registry = ChainRegistry::for_environment(Environment::Production);
        assert_eq!(
            registry.capacity_of(&ChainId::new("0021")),
            Some(60),
        );
        assert!(registry.capacity_of(&ChainId::new("9999")).is_none());
    }

    #[test]
    fn from_configs_keys_by_chain_id() {
        let registry = ChainRegistry::from_configs([
            ChainConfig::new("00AA", "FOO", 3),
            ChainConfig::new("00BB", "BAR", 7),
        ]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&ChainId::new("00AA")));
        assert_eq!(registry.get(&ChainId::new("00BB")).unwrap().capacity, 7);
    }

    #[test]
    fn duplicate_chain_ids_keep_last_entry() {
        let registry = ChainRegistry::from_configs([
            ChainConfig::new("00AA", "FOO", 3),
            ChainConfig::new("00AA", "FOO", 9),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.capacity_of(&ChainId::new("00AA")), Some(9));
    }
}
