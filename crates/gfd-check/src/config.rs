//! Validator configuration.
//!
//! Reads from environment variables, overridable by the CLI:
//! - `GFD_STRATEGY`: `naive`, `distributed` or `index` (default: `index`)
//! - `GFD_THREADS`: worker threads for the distributed strategy
//!   (default: available parallelism)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const STRATEGY_ENV: &str = "GFD_STRATEGY";
pub const THREADS_ENV: &str = "GFD_THREADS";

/// Validation algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Exhaustive matching over the whole data graph.
    Naive,
    /// Center-pinned matching balanced across worker threads.
    Distributed,
    /// Candidate path index construction and enumeration.
    #[default]
    Index,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Naive, Strategy::Distributed, Strategy::Index];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Naive => "naive",
            Strategy::Distributed => "distributed",
            Strategy::Index => "index",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    /// Accepts the short names and the long algorithm names
    /// (`naive_gfd_verifier`, `gfd_verifier`, `egfd_verifier`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naive" | "naive_gfd_verifier" => Ok(Strategy::Naive),
            "distributed" | "gfd_verifier" => Ok(Strategy::Distributed),
            "index" | "cpi" | "egfd_verifier" => Ok(Strategy::Index),
            other => Err(format!(
                "unknown strategy '{}': expected naive, distributed or index",
                other
            )),
        }
    }
}

/// Strategy and thread count for a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    pub strategy: Strategy,
    /// Worker threads; only the distributed strategy uses more than one.
    pub threads: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            strategy: Strategy::default(),
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl ValidatorConfig {
    pub fn new(strategy: Strategy, threads: usize) -> Self {
        ValidatorConfig { strategy, threads }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.threads == 0 {
            return Err(ValidationError::InvalidThreadCount { got: 0 });
        }
        Ok(())
    }

    /// Builds a config from `GFD_STRATEGY` and `GFD_THREADS`, falling back to
    /// [`Default`] for unset variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let mut config = ValidatorConfig::default();
        if let Some(raw) = lookup(STRATEGY_ENV) {
            config.strategy = raw
                .parse()
                .map_err(|message| ValidationError::InvalidConfig {
                    key: STRATEGY_ENV.to_string(),
                    message,
                })?;
        }
        if let Some(raw) = lookup(THREADS_ENV) {
            config.threads =
                raw.trim()
                    .parse()
                    .map_err(|err: std::num::ParseIntError| ValidationError::InvalidConfig {
                        key: THREADS_ENV.to_string(),
                        message: format!("'{}': {}", raw, err),
                    })?;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parses_strategy_names() {
        assert_eq!("naive".parse::<Strategy>(), Ok(Strategy::Naive));
        assert_eq!("gfd_verifier".parse::<Strategy>(), Ok(Strategy::Distributed));
        assert_eq!("EGFD_VERIFIER".parse::<Strategy>(), Ok(Strategy::Index));
        assert!("fast".parse::<Strategy>().is_err());
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
    }

    #[test]
    fn default_uses_index() {
        let config = ValidatorConfig::default();
        assert_eq!(config.strategy, Strategy::Index);
        assert!(config.threads >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_threads_rejected() {
        assert!(matches!(
            ValidatorConfig::new(Strategy::Distributed, 0).validate(),
            Err(ValidationError::InvalidThreadCount { got: 0 })
        ));
    }

    #[test]
    fn reads_environment() {
        let config =
            ValidatorConfig::from_lookup(lookup(&[("GFD_STRATEGY", "naive"), ("GFD_THREADS", "3")]))
                .unwrap();
        assert_eq!(config, ValidatorConfig::new(Strategy::Naive, 3));

        let defaults = ValidatorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(defaults, ValidatorConfig::default());
    }

    #[test]
    fn bad_environment_values() {
        assert!(matches!(
            ValidatorConfig::from_lookup(lookup(&[("GFD_THREADS", "many")])),
            Err(ValidationError::InvalidConfig { .. })
        ));
        assert!(matches!(
            ValidatorConfig::from_lookup(lookup(&[("GFD_THREADS", "0")])),
            Err(ValidationError::InvalidThreadCount { got: 0 })
        ));
        assert!(matches!(
            ValidatorConfig::from_lookup(lookup(&[("GFD_STRATEGY", "fast")])),
            Err(ValidationError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let config = ValidatorConfig::new(Strategy::Distributed, 4);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"strategy":"distributed","threads":4}"#);
        let back: ValidatorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
