//! Runtime configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::RuntimeResult;

/// Log output settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG` when set
    pub filter: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Simulation runtime configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Scale applied to recorded energy consumption. Zero disables channels.
    pub energy_consumption_multiplier: f64,
    /// Capacity of the configuration intent queue
    pub intent_queue_capacity: usize,
    pub logging: LoggingConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            energy_consumption_multiplier: 1.0,
            intent_queue_capacity: 64,
            logging: LoggingConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// No energy accounting, channels disabled
    pub fn energy_free() -> Self {
        RuntimeConfig {
            energy_consumption_multiplier: 0.0,
            ..Default::default()
        }
    }

    /// Verbose JSON logging for test harnesses
    pub fn debug() -> Self {
        RuntimeConfig {
            logging: LoggingConfig {
                filter: "debug".to_string(),
                json: true,
            },
            ..Default::default()
        }
    }

    /// Whether channel settings are offered at all
    pub fn channels_enabled(&self) -> bool {
        self.energy_consumption_multiplier > 0.0
    }

    pub fn from_json_str(json: &str) -> RuntimeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> RuntimeResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuntimeError;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.energy_consumption_multiplier, 1.0);
        assert_eq!(config.intent_queue_capacity, 64);
        assert!(config.channels_enabled());
        assert!(!RuntimeConfig::energy_free().channels_enabled());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RuntimeConfig::from_json_str(r#"{"logging": {"json": true}}"#).unwrap();
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.intent_queue_capacity, 64);
    }

    #[test]
    fn test_invalid_json() {
        let err = RuntimeConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, RuntimeError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = RuntimeConfig::load("/nonexistent/partnet.json").unwrap_err();
        assert!(matches!(err, RuntimeError::Io(_)));
    }
}
