//! Logging setup and per-assistant diagnostics

use crate::core::Sample;
use crate::processing::sample_filter::Verdict;
use std::fmt;
use tracing_subscriber::{fmt as subscriber_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter for `directives`, falling back to `info` when none are given
fn default_filter(directives: &str) -> EnvFilter {
    if directives.trim().is_empty() {
        EnvFilter::new("info")
    } else {
        EnvFilter::new(directives)
    }
}

fn env_filter() -> EnvFilter {
    default_filter(&std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default())
}

/// Install a human-readable subscriber; level comes from `RUST_LOG`, default `info`
pub fn init() {
    let filter = env_filter();

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber_fmt::layer().with_target(true))
        .init();
}

/// Install a JSON subscriber for log aggregation
pub fn init_json() {
    let filter = env_filter();

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber_fmt::layer().json().with_target(true))
        .init();
}

/// Gate for one assistant's log output
///
/// `quiet` mutes everything the assistant logs; `verbose` additionally
/// reports the verdict on every sample at info level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    verbose: bool,
    quiet: bool,
}

impl Diagnostics {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    pub fn error(&self, message: impl fmt::Display) {
        if !self.quiet {
            tracing::error!("{}", message);
        }
    }

    pub fn warn(&self, message: impl fmt::Display) {
        if !self.quiet {
            tracing::warn!("{}", message);
        }
    }

    pub fn info(&self, message: impl fmt::Display) {
        if !self.quiet {
            tracing::info!("{}", message);
        }
    }

    pub fn debug(&self, message: impl fmt::Display) {
        if !self.quiet {
            tracing::debug!("{}", message);
        }
    }

    /// Report a sample verdict when verbose
    pub fn sample_verdict(&self, sample: &Sample, verdict: &Verdict) {
        if !self.is_verbose() {
            return;
        }
        tracing::info!(
            lat = sample.position.lat,
            lon = sample.position.lon,
            accuracy_m = sample.accuracy_m,
            provider = %sample.provider,
            synthetic = sample.reported_as_synthetic,
            distance_to_mock_m = ?verdict.distance_to_mock_m(),
            "{}",
            if verdict.is_plausible() { "sample plausible" } else { "sample not plausible" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_overrides_verbose() {
        assert!(Diagnostics::new(true, false).is_verbose());
        assert!(!Diagnostics::new(true, true).is_verbose());
        assert!(Diagnostics::new(false, true).is_quiet());
    }

    #[test]
    fn test_default_filter_directive() {
        assert_eq!(default_filter("").to_string(), "info");
        assert_eq!(default_filter("location_assistant=debug").to_string(), "location_assistant=debug");
    }

    #[test]
    fn test_logging_without_subscriber_is_harmless() {
        let diagnostics = Diagnostics::new(true, false);
        diagnostics.error("no subscriber installed");
        diagnostics.sample_verdict(&Sample::new(0.0, 0.0), &Verdict::Trusted);
    }
}
