//! Mock-location heuristic
//!
//! Every sample updates a small incident record: a sample flagged as mock
//! (either by the platform-wide developer setting or by the sample itself)
//! opens an incident anchored at that sample, and a run of
//! [`MOCK_INCIDENT_CLEAR_READINGS`] genuine readings closes it again. While an
//! incident is open, samples within [`MOCK_EXCLUSION_RADIUS_M`] of the last mock
//! sample are suspect. This is a best-effort signal, not a security boundary.

use crate::algorithms::geodesy::great_circle_distance;
use crate::core::{Sample, GOOD_READINGS_CAP, MOCK_EXCLUSION_RADIUS_M, MOCK_INCIDENT_CLEAR_READINGS};

/// Outcome of assessing one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// No open incident, nothing to compare against
    Trusted,
    /// Incident open, but the sample is far from the last mock sample
    Distant { distance_m: f64 },
    /// Within the exclusion radius of the last mock sample
    Suspect { distance_m: f64 },
}

impl Verdict {
    pub fn is_plausible(&self) -> bool {
        !matches!(self, Verdict::Suspect { .. })
    }

    pub fn distance_to_mock_m(&self) -> Option<f64> {
        match self {
            Verdict::Trusted => None,
            Verdict::Distant { distance_m } | Verdict::Suspect { distance_m } => Some(*distance_m),
        }
    }
}

/// Stateful mock-location detector
#[derive(Debug, Clone, Default)]
pub struct SampleFilter {
    /// System-wide "mock locations allowed" setting (older platforms)
    global_mock_flag: bool,
    last_mock_sample: Option<Sample>,
    consecutive_good_readings: u32,
}

impl SampleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the platform-global mock flag; read at start, injected by the caller
    pub fn set_global_mock_flag(&mut self, enabled: bool) {
        self.global_mock_flag = enabled;
    }

    pub fn global_mock_flag(&self) -> bool {
        self.global_mock_flag
    }

    /// Assess a sample and update the incident record
    pub fn assess(&mut self, sample: &Sample) -> Verdict {
        let is_mock = self.global_mock_flag || sample.reported_as_synthetic;
        if is_mock {
            self.last_mock_sample = Some(sample.clone());
            self.consecutive_good_readings = 0;
        } else {
            self.consecutive_good_readings =
                (self.consecutive_good_readings + 1).min(GOOD_READINGS_CAP);
        }

        if self.consecutive_good_readings >= MOCK_INCIDENT_CLEAR_READINGS {
            self.last_mock_sample = None;
        }

        let Some(last_mock) = &self.last_mock_sample else {
            return Verdict::Trusted;
        };

        let distance_m = great_circle_distance(&sample.position, &last_mock.position);
        if distance_m > MOCK_EXCLUSION_RADIUS_M {
            Verdict::Distant { distance_m }
        } else {
            Verdict::Suspect { distance_m }
        }
    }

    pub fn last_mock_sample(&self) -> Option<&Sample> {
        self.last_mock_sample.as_ref()
    }

    pub fn consecutive_good_readings(&self) -> u32 {
        self.consecutive_good_readings
    }

    pub fn incident_open(&self) -> bool {
        self.last_mock_sample.is_some()
    }
}
