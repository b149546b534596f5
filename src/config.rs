//! Configuration file support
//!
//! An optional TOML file supplies defaults that command-line flags override:
//!
//! ```toml
//! delta = 0.1
//! epsilon = 0.05
//! miner = "java -jar spmf.jar run PrefixSpan {input} {output} {threshold}"
//! ```

use crate::bounds::{validate_delta, validate_epsilon};
use crate::error::{Result, SeqBoundError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Defaults for bound computation and mining
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Confidence parameter; bounds hold with probability `1 - delta`
    ///
    /// Default: 0.1
    pub delta: f64,

    /// Error bound for sampling mode
    ///
    /// Default: 0.05
    pub epsilon: f64,

    /// Miner command template (see `CommandMiner::from_template`)
    pub miner: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delta: 0.1,
            epsilon: 0.05,
            miner: None,
        }
    }
}

impl Config {
    /// Load and validate a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SeqBoundError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| SeqBoundError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        validate_delta(self.delta)?;
        validate_epsilon(self.epsilon)?;
        if let Some(miner) = &self.miner {
            if miner.trim().is_empty() {
                return Err(SeqBoundError::Config("miner command is empty".to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.delta, 0.1);
        assert_eq!(config.epsilon, 0.05);
        assert!(config.miner.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("delta = 0.05").unwrap();
        assert_eq!(config.delta, 0.05);
        assert_eq!(config.epsilon, 0.05);
    }

    #[test]
    fn test_miner_template() {
        let config = Config::from_toml("miner = \"prefixspan {input} {output} {threshold}\"").unwrap();
        assert_eq!(
            config.miner.as_deref(),
            Some("prefixspan {input} {output} {threshold}")
        );
    }

    #[test]
    fn test_invalid_delta_rejected() {
        assert!(matches!(
            Config::from_toml("delta = 0.0"),
            Err(SeqBoundError::InvalidParameter { name: "delta", .. })
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            Config::from_toml("theta = 0.2"),
            Err(SeqBoundError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file(Path::new("/nonexistent/seqbound.toml")),
            Err(SeqBoundError::Config(_))
        ));
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_blank_miner_rejected() {
        let mut config = Config::default();
        config.miner = Some("  ".to_string());
        assert!(config.validate().is_err());
    }
}
