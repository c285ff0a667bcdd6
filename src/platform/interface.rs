//! Collaborator traits for the platform location service and the host context

use crate::api::types::SettingsScreen;
use crate::core::{LocationRequest, ProviderStatus};
use crate::platform::{CheckId, PlatformResult, SubscriptionId, TimerId};
use std::time::Duration;

/// Platform location service, available for the assistant's whole lifetime
///
/// Methods returning `PlatformResult<()>` are asynchronous: they return once the
/// request is submitted and deliver their outcome later as a
/// [`Completion`](crate::platform::Completion) on the event loop.
pub trait LocationPlatform {
    /// Whether this platform has a run-time permission model at all
    fn requires_runtime_permission(&self) -> bool {
        true
    }

    /// Current grant status of the fine location permission
    fn is_permission_granted(&self) -> bool;

    /// System-wide developer setting allowing mock locations (older platforms)
    fn mock_locations_globally_enabled(&self) -> bool;

    /// Check whether current settings satisfy `request`.
    /// Completes with `Completion::SettingsChecked` tagged with `check`.
    fn check_settings(&mut self, request: &LocationRequest, check: CheckId) -> PlatformResult<()>;

    /// Enabled state of the satellite and network providers
    fn providers(&self) -> ProviderStatus;

    /// Open a continuous update stream tagged with `subscription`.
    /// Samples arrive as `Completion::SampleDelivered`, availability changes as
    /// `Completion::AvailabilityChanged`.
    fn subscribe(&mut self, request: &LocationRequest, subscription: SubscriptionId) -> PlatformResult<()>;

    /// Tear down a stream; no further samples for `subscription` are produced afterwards
    fn unsubscribe(&mut self, subscription: SubscriptionId);

    /// Fetch the cached last fix. Completes with `Completion::LastKnownSample`.
    fn request_last_known(&mut self) -> PlatformResult<()>;

    /// Query current stream availability. Completes with `Completion::AvailabilityQueried`.
    fn query_availability(&mut self) -> PlatformResult<()>;

    /// Arm a one-shot timer. Completes with `Completion::TimerFired`.
    fn schedule_timer(&mut self, delay: Duration, timer: TimerId);

    /// Disarm a timer; a no-op if it already fired
    fn cancel_timer(&mut self, timer: TimerId);
}

/// Host context (activity/window) that can show system UI on the assistant's behalf
pub trait HostContext {
    /// Whether the user declined once and an explanation should be shown before asking again
    fn should_show_rationale(&self) -> bool;

    /// Show the permission prompt. Completes with `Completion::PermissionResult`.
    fn launch_permission_prompt(&mut self) -> PlatformResult<()>;

    /// Show the in-app settings resolution dialog. Completes with `Completion::ResolutionFinished`.
    fn launch_settings_resolution(&mut self) -> PlatformResult<()>;

    /// Deep-link to a system settings screen
    fn open_settings(&mut self, screen: SettingsScreen) -> PlatformResult<()>;
}
