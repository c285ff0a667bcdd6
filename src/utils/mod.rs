//! Utility modules for configuration and logging

pub mod config;
pub mod logging;

pub use config::{AssistantConfig, ConfigError, ConfigResult};
pub use logging::Diagnostics;
