//! Location settings resolver
//!
//! Submits the settings check for the configured request, turns the platform's
//! answer into a [`SettingsVerdict`], launches the in-app resolution dialog and
//! runs the manual provider check used when settings cannot be fixed in-app.

use crate::acquisition::state::SettingsVerdict;
use crate::core::{LocationRequest, ProviderStatus};
use crate::platform::{
    CheckId, HostContext, LocationPlatform, PlatformResult, ResolutionOutcome, SettingsCheckOutcome,
};
use crate::validation::AssistantError;

/// Result of the manual provider check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCheck {
    /// At least one provider is on
    Available(ProviderStatus),
    /// Everything is off; only the system settings screen can help
    AllDisabled,
}

/// How a finished resolution flow affects the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionEffect {
    Fixed,
    StillPending,
    Broken(AssistantError),
}

/// Submits settings checks and remembers which one is still unanswered
///
/// Every submitted check gets a fresh [`CheckId`]; only the answer to the
/// outstanding one is accepted.
#[derive(Debug, Clone)]
pub struct SettingsResolver {
    request: LocationRequest,
    next_check: u64,
    outstanding: Option<CheckId>,
}

impl SettingsResolver {
    pub fn new(request: LocationRequest) -> Self {
        Self {
            request,
            next_check: 0,
            outstanding: None,
        }
    }

    pub fn request(&self) -> &LocationRequest {
        &self.request
    }

    /// Submit the settings check; completes with `Completion::SettingsChecked`
    pub fn check(&mut self, platform: &mut dyn LocationPlatform) -> PlatformResult<CheckId> {
        self.next_check += 1;
        let check = CheckId::new(self.next_check);
        platform.check_settings(&self.request, check)?;
        self.outstanding = Some(check);
        Ok(check)
    }

    /// Claim the answer to `check`; `false` if it is not the outstanding check
    pub fn take_answer(&mut self, check: CheckId) -> bool {
        if self.outstanding == Some(check) {
            self.outstanding = None;
            true
        } else {
            false
        }
    }

    /// Forget the outstanding check so its late answer is ignored
    pub fn abandon_check(&mut self) {
        self.outstanding = None;
    }

    pub fn outstanding(&self) -> Option<CheckId> {
        self.outstanding
    }

    /// Map the platform's answer onto a verdict
    pub fn classify(&self, outcome: &SettingsCheckOutcome) -> SettingsVerdict {
        match outcome {
            SettingsCheckOutcome::Satisfied => SettingsVerdict::Satisfied,
            SettingsCheckOutcome::ResolutionRequired => SettingsVerdict::FixPending { resolving: false },
            SettingsCheckOutcome::Unresolvable | SettingsCheckOutcome::Failed(_) => SettingsVerdict::Unresolvable,
        }
    }

    /// Launch the in-app resolution dialog
    pub fn resolve(&self, host: &mut dyn HostContext) -> Result<(), AssistantError> {
        host.launch_settings_resolution()
            .map_err(|e| AssistantError::settings(&e))
    }

    /// Interpret the outcome reported by the resolution dialog
    pub fn conclude(&self, outcome: &ResolutionOutcome) -> ResolutionEffect {
        match outcome {
            ResolutionOutcome::Succeeded => ResolutionEffect::Fixed,
            ResolutionOutcome::Declined => ResolutionEffect::StillPending,
            ResolutionOutcome::Failed(reason) => ResolutionEffect::Broken(AssistantError::Settings(reason.clone())),
        }
    }

    /// Query provider switches directly
    pub fn check_providers(&self, platform: &dyn LocationPlatform) -> ProviderCheck {
        let status = platform.providers();
        if status.any_enabled() {
            ProviderCheck::Available(status)
        } else {
            ProviderCheck::AllDisabled
        }
    }
}
