//! Thresholds and fixed parameters of the acquisition pipeline

/// Consecutive good readings after which a mock incident is considered resolved
pub const MOCK_INCIDENT_CLEAR_READINGS: u32 = 20;

/// Saturation cap for the good-readings counter
pub const GOOD_READINGS_CAP: u32 = 1_000_000;

/// Samples farther than this from the last mock sample are trusted (meters)
pub const MOCK_EXCLUSION_RADIUS_M: f64 = 1000.0;

/// Delay before a fresh subscription is re-validated (milliseconds)
pub const REVALIDATION_DELAY_MS: u64 = 10_000;

/// Number of declines after which permission is no longer requested autonomously
pub const PERMANENT_DECLINE_THRESHOLD: u32 = 2;

/// Mean earth radius (IUGG, meters)
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;
