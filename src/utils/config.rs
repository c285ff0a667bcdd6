use crate::core::{Accuracy, LocationRequest};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Longest accepted update interval (24 hours)
pub const MAX_UPDATE_INTERVAL_MS: u64 = 24 * 60 * 60 * 1000;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Parameter outside its valid range
    #[error("Invalid {parameter} = {value}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    #[error("{message}")]
    Io { message: String },
    /// JSON serialization/deserialization error
    #[error("{message}")]
    Serialization { message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Immutable acquisition parameters supplied at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Desired accuracy tier
    pub accuracy: Accuracy,
    /// Interval at which the consumer can process updates (milliseconds)
    pub update_interval_ms: u64,
    /// Deliver samples the mock filter rejected instead of reporting them
    pub allow_unverified_samples: bool,
    /// Log every sample verdict
    pub verbose: bool,
    /// Suppress all log output from the assistant, including errors
    pub quiet: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            accuracy: Accuracy::High,
            update_interval_ms: 5000,
            allow_unverified_samples: false,
            verbose: false,
            quiet: false,
        }
    }
}

impl AssistantConfig {
    pub fn new(accuracy: Accuracy, update_interval_ms: u64, allow_unverified_samples: bool) -> Self {
        Self {
            accuracy,
            update_interval_ms,
            allow_unverified_samples,
            ..Default::default()
        }
    }

    pub fn with_accuracy(mut self, accuracy: Accuracy) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_update_interval(mut self, update_interval_ms: u64) -> Self {
        self.update_interval_ms = update_interval_ms;
        self
    }

    pub fn with_unverified_samples(mut self, allow: bool) -> Self {
        self.allow_unverified_samples = allow;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Request handed to the platform for settings checks and subscriptions
    pub fn location_request(&self) -> LocationRequest {
        LocationRequest::new(self.accuracy, self.update_interval_ms)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.update_interval_ms == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "update_interval_ms".to_string(),
                value: self.update_interval_ms.to_string(),
                reason: "Update interval must be positive".to_string(),
            });
        }

        if self.update_interval_ms > MAX_UPDATE_INTERVAL_MS {
            return Err(ConfigError::InvalidParameter {
                parameter: "update_interval_ms".to_string(),
                value: self.update_interval_ms.to_string(),
                reason: format!("Update interval must not exceed {}ms", MAX_UPDATE_INTERVAL_MS),
            });
        }

        Ok(())
    }

    /// Load and validate configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: AssistantConfig = serde_json::from_str(&content).map_err(|e| ConfigError::Serialization {
            message: format!("Failed to parse config file '{}': {}", path_str, e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialization {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::Io {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        Ok(())
    }
}
