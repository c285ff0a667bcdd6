//! Core data types for location acquisition

use serde::{Deserialize, Serialize};

/// Geodetic position in WGS84 decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A single position reading delivered by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub position: Position,
    /// Horizontal accuracy radius (meters)
    pub accuracy_m: f32,
    /// Capture time (milliseconds since epoch)
    pub timestamp_ms: u64,
    /// Provider that produced the fix ("gps", "network", "fused", ...)
    pub provider: String,
    /// Set by the platform when it can tell the fix is not physical
    pub reported_as_synthetic: bool,
}

impl Sample {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            position: Position::new(lat, lon),
            accuracy_m: 0.0,
            timestamp_ms: 0,
            provider: "fused".to_string(),
            reported_as_synthetic: false,
        }
    }

    pub fn at(position: Position) -> Self {
        Self::new(position.lat, position.lon)
    }

    pub fn with_accuracy(mut self, accuracy_m: f32) -> Self {
        self.accuracy_m = accuracy_m;
        self
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn synthetic(mut self) -> Self {
        self.reported_as_synthetic = true;
        self
    }
}

/// Desired accuracy tier of the update stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Accuracy {
    /// Highest possible accuracy, typically within 30m
    High,
    /// Roughly a city block, around 100m
    Medium,
    /// City-level, typically within 10km
    Low,
    /// Only piggy-backs on updates requested by other apps
    Passive,
}

impl Accuracy {
    pub fn priority(&self) -> Priority {
        match self {
            Accuracy::High => Priority::HighAccuracy,
            Accuracy::Medium => Priority::BalancedPower,
            Accuracy::Low => Priority::LowPower,
            Accuracy::Passive => Priority::NoPower,
        }
    }
}

/// Power/accuracy priority understood by the platform provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    HighAccuracy,
    BalancedPower,
    LowPower,
    NoPower,
}

/// Update request handed to the platform for settings checks and subscriptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRequest {
    pub priority: Priority,
    pub interval_ms: u64,
    pub fastest_interval_ms: u64,
    /// Ask the platform to always show the resolution dialog when settings need changing
    pub always_show: bool,
}

impl LocationRequest {
    pub fn new(accuracy: Accuracy, interval_ms: u64) -> Self {
        Self {
            priority: accuracy.priority(),
            interval_ms,
            fastest_interval_ms: interval_ms,
            always_show: true,
        }
    }
}

/// Enabled state of the known location providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProviderStatus {
    /// Satellite-based provider (GPS/GNSS)
    pub satellite: bool,
    /// Network-based provider (cell/Wi-Fi)
    pub network: bool,
}

impl ProviderStatus {
    pub fn all_enabled() -> Self {
        Self { satellite: true, network: true }
    }

    pub fn all_disabled() -> Self {
        Self::default()
    }

    pub fn any_enabled(&self) -> bool {
        self.satellite || self.network
    }
}
