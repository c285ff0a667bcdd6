//! Location acquisition orchestrator
//!
//! [`LocationAssistant`] walks the precondition chain
//! (permission, settings, provider availability, subscription) one step per
//! evaluation and reports progress to the attached [`EventSink`]. It is driven
//! from a single event loop: consumer calls arrive as method calls, platform
//! answers as [`Completion`]s passed to [`LocationAssistant::handle`].
//!
//! Nothing here returns an error to the caller. Failures are logged and, when a
//! sink is attached, forwarded as [`LocationEvent::Error`].

use crate::acquisition::permission::{PermissionAnswer, PermissionGate};
use crate::acquisition::settings::{ProviderCheck, ResolutionEffect, SettingsResolver};
use crate::acquisition::state::{AcquisitionState, SettingsVerdict, Step, Transition};
use crate::acquisition::subscription::SubscriptionManager;
use crate::api::callback::EventSink;
use crate::api::types::{LocationEvent, SettingsAction};
use crate::core::Sample;
use crate::platform::{
    Completion, HostContext, LocationPlatform, PlatformError, PlatformResult, Recovery, ResolutionOutcome,
    SettingsCheckOutcome, SubscriptionId, TimerId,
};
use crate::processing::sample_filter::SampleFilter;
use crate::utils::config::{AssistantConfig, ConfigResult};
use crate::utils::logging::Diagnostics;
use crate::validation::AssistantError;

pub struct LocationAssistant {
    /// Immutable acquisition parameters
    config: AssistantConfig,
    /// Platform location service
    platform: Box<dyn LocationPlatform>,
    /// Host able to show prompts and settings screens, while registered
    host: Option<Box<dyn HostContext>>,
    /// Consumer event sink, while registered
    sink: Option<Box<dyn EventSink>>,
    /// Position in the precondition chain
    state: AcquisitionState,
    permission: PermissionGate,
    settings: SettingsResolver,
    subscription: SubscriptionManager,
    filter: SampleFilter,
    /// Most recent sample delivered to the consumer
    best_known: Option<Sample>,
    diagnostics: Diagnostics,
}

impl LocationAssistant {
    /// Create an assistant on top of `platform`; nothing happens until `start`
    pub fn new(config: AssistantConfig, platform: impl LocationPlatform + 'static) -> ConfigResult<Self> {
        config.validate()?;

        Ok(Self {
            settings: SettingsResolver::new(config.location_request()),
            diagnostics: Diagnostics::new(config.verbose, config.quiet),
            config,
            platform: Box::new(platform),
            host: None,
            sink: None,
            state: AcquisitionState::default(),
            permission: PermissionGate::new(),
            subscription: SubscriptionManager::new(),
            filter: SampleFilter::new(),
            best_known: None,
        })
    }

    /// Begin (or resume) acquiring location
    pub fn start(&mut self) {
        self.diagnostics.debug("start");
        self.check_mock_locations();
        self.evaluate();
    }

    /// Tear down the update stream and forget every acquired precondition
    ///
    /// Decline count and the mock-location incident record survive.
    pub fn stop(&mut self) {
        self.diagnostics.debug("stop");
        self.tear_down();
    }

    /// Start over from scratch, e.g. after losing connectivity
    pub fn reset(&mut self) {
        self.diagnostics.debug("reset");
        self.tear_down();
        self.evaluate();
    }

    /// Attach a host context and event sink, replacing any previous ones
    pub fn register(&mut self, host: impl HostContext + 'static, sink: impl EventSink + 'static) {
        self.host = Some(Box::new(host));
        self.sink = Some(Box::new(sink));
        self.diagnostics.debug("host context and event sink registered");

        if self.state.settings_satisfied() {
            self.fetch_last_known();
        }
        self.evaluate();
    }

    /// Detach host context and sink; acquisition state is kept
    pub fn unregister(&mut self) {
        self.host = None;
        self.sink = None;
        self.diagnostics.debug("host context and event sink unregistered");
    }

    /// Show the system permission prompt
    pub fn request_permission(&mut self) {
        if self.permission_held() {
            self.diagnostics.debug("location permission already granted");
            return;
        }

        let host = self.host.as_deref_mut().map(|host| host as &mut dyn HostContext);
        if let Err(error) = self.permission.request_grant(host) {
            self.report_error(error);
        }
    }

    /// Ask for permission, or emit `ExplainPermission` if the user declined before
    pub fn request_permission_with_explanation(&mut self) {
        if self.permission_held() {
            self.diagnostics.debug("location permission already granted");
            return;
        }

        let show_rationale = match self.host.as_deref() {
            Some(host) => host.should_show_rationale(),
            None => {
                self.report_error(AssistantError::permission(&PlatformError::NoHostContext));
                return;
            }
        };

        if show_rationale && self.sink.is_some() {
            self.emit(LocationEvent::ExplainPermission);
        } else {
            self.request_permission();
        }
    }

    /// Feed back the answer to a permission prompt
    pub fn report_permission_result(&mut self, granted: bool) {
        match self.permission.record_result(granted) {
            PermissionAnswer::Granted => {
                self.diagnostics.info("Location permission granted");
                self.evaluate();
            }
            PermissionAnswer::Declined { permanently: false } => {
                self.diagnostics.info("Location permission request denied");
                self.evaluate();
            }
            PermissionAnswer::Declined { permanently: true } => {
                self.diagnostics.info(format!(
                    "Location permission request denied {} times, giving up",
                    self.permission.decline_count()
                ));
                self.emit(LocationEvent::PermissionPermanentlyDeclined(SettingsAction::APP_SETTINGS));
            }
        }
    }

    /// Launch the in-app settings resolution dialog; call in response to `NeedSettingsChange`
    pub fn resolve_settings(&mut self) {
        let Some(resolving) = self.state.apply(Transition::ResolutionStarted) else {
            self.diagnostics.debug(format!(
                "no settings resolution to start in state {}",
                self.state.label()
            ));
            return;
        };

        // Without a host the fix stays pending until one is registered
        let Some(host) = self.host.as_deref_mut() else {
            let error = PlatformError::NoHostContext;
            self.recover(&error, AssistantError::settings(&error));
            return;
        };
        match self.settings.resolve(host) {
            Ok(()) => self.state = resolving,
            Err(error) => self.fail_resolution(error),
        }
    }

    /// Feed back whether the user accepted the settings resolution dialog
    pub fn report_settings_resolution_result(&mut self, succeeded: bool) {
        let outcome = if succeeded {
            ResolutionOutcome::Succeeded
        } else {
            ResolutionOutcome::Declined
        };
        self.conclude_resolution(outcome);
    }

    /// Feed back a structural failure of the settings resolution flow
    pub fn report_settings_resolution_failure(&mut self, reason: impl Into<String>) {
        self.conclude_resolution(ResolutionOutcome::Failed(reason.into()));
    }

    /// Deep-link to the screen behind `action` through the attached host
    pub fn open(&mut self, action: SettingsAction) {
        let result = match self.host.as_deref_mut() {
            Some(host) => host.open_settings(action.screen()),
            None => Err(PlatformError::NoHostContext),
        };
        if let Err(error) = result {
            self.report_error(AssistantError::settings(&error));
        }
    }

    /// Process one asynchronous platform answer
    pub fn handle(&mut self, completion: Completion) {
        match completion {
            Completion::PermissionResult { granted } => {
                if self.permission.take_prompt() {
                    self.report_permission_result(granted);
                } else {
                    self.diagnostics.debug("ignoring answer to an abandoned permission prompt");
                }
            }
            Completion::SettingsChecked { check, outcome } => {
                if self.settings.take_answer(check) {
                    self.on_settings_checked(outcome);
                } else {
                    self.diagnostics.debug(format!("ignoring answer to abandoned settings check {}", check.id()));
                }
            }
            Completion::ResolutionFinished(outcome) => self.conclude_resolution(outcome),
            Completion::LastKnownSample(sample) => self.on_last_known(sample),
            Completion::SampleDelivered { subscription, sample } => self.on_sample(subscription, sample),
            Completion::AvailabilityChanged { subscription, available } => {
                self.on_availability_changed(subscription, available)
            }
            Completion::AvailabilityQueried(result) => self.on_availability_queried(result),
            Completion::TimerFired(timer) => self.on_timer(timer),
        }
    }

    pub fn best_known_sample(&self) -> Option<&Sample> {
        self.best_known.as_ref()
    }

    pub fn decline_count(&self) -> u32 {
        self.permission.decline_count()
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn sample_filter(&self) -> &SampleFilter {
        &self.filter
    }

    pub fn is_registered(&self) -> bool {
        self.host.is_some() && self.sink.is_some()
    }

    /// Take the first applicable step of the precondition chain
    fn evaluate(&mut self) {
        match self.state.next_step() {
            Step::CheckPermission => self.check_permission(),
            Step::CheckSettings => self.check_settings(),
            Step::AwaitSettingsCheck => self.diagnostics.debug("waiting for settings check"),
            Step::PromptSettingsChange => self.emit(LocationEvent::NeedSettingsChange),
            Step::AwaitResolution => self.diagnostics.debug("waiting for settings resolution"),
            Step::CheckProviders => self.check_providers(),
            Step::Subscribe => self.open_stream(),
            Step::Revalidate => self.revalidate(),
        }
    }

    fn check_permission(&mut self) {
        if self.permission.check_granted(self.platform.as_ref()) {
            self.transition(Transition::PermissionConfirmed);
            self.emit(LocationEvent::PermissionGranted);
            self.check_settings();
            return;
        }

        if self.permission.is_permanently_declined() {
            self.diagnostics.debug("location permission permanently declined");
            return;
        }
        self.emit(LocationEvent::NeedPermission);
    }

    fn check_settings(&mut self) {
        if !self.transition(Transition::SettingsCheckSubmitted) {
            return;
        }

        // Provider fallback is left to the next evaluation
        if let Err(error) = self.settings.check(self.platform.as_mut()) {
            self.report_error(AssistantError::settings(&error));
            self.transition(Transition::SettingsChecked(SettingsVerdict::Unresolvable));
        }
    }

    fn on_settings_checked(&mut self, outcome: SettingsCheckOutcome) {
        if let SettingsCheckOutcome::Failed(reason) = &outcome {
            self.diagnostics.warn(format!("Location settings check failed: {}", reason));
        }

        let verdict = self.settings.classify(&outcome);
        if !self.transition(Transition::SettingsChecked(verdict)) {
            return;
        }
        if verdict == SettingsVerdict::Satisfied {
            self.fetch_last_known();
        }
        self.evaluate();
    }

    fn conclude_resolution(&mut self, outcome: ResolutionOutcome) {
        if !self.state.settings_fix_pending() {
            self.diagnostics.debug("ignoring settings resolution outcome, no fix pending");
            return;
        }

        match self.settings.conclude(&outcome) {
            ResolutionEffect::Fixed => {
                self.transition(Transition::ResolutionSucceeded);
                self.fetch_last_known();
                self.evaluate();
            }
            ResolutionEffect::StillPending => {
                self.transition(Transition::ResolutionDeclined);
                self.evaluate();
            }
            ResolutionEffect::Broken(error) => self.fail_resolution(error),
        }
    }

    /// The resolution flow broke down: report, give up on the in-app fix, fall back
    fn fail_resolution(&mut self, error: AssistantError) {
        self.report_error(error);
        self.transition(Transition::ResolutionFailed);
        self.evaluate();
    }

    fn check_providers(&mut self) {
        match self.settings.check_providers(self.platform.as_ref()) {
            ProviderCheck::Available(status) => {
                if !self.diagnostics.is_quiet() {
                    tracing::debug!(
                        satellite = status.satellite,
                        network = status.network,
                        "location providers enabled"
                    );
                }
            }
            ProviderCheck::AllDisabled => {
                self.emit(LocationEvent::FallBackToSystemSettings(SettingsAction::LOCATION_SETTINGS))
            }
        }
    }

    fn open_stream(&mut self) {
        match self.subscription.subscribe(self.platform.as_mut(), self.settings.request()) {
            Ok(subscription) => {
                self.transition(Transition::Subscribed(subscription));
                self.diagnostics.info(format!("Location updates requested ({})", subscription));
            }
            Err(error) => {
                let failure = AssistantError::retrieval("requesting location updates", &error);
                if self.recover(&error, failure) == Recovery::RedriveChain {
                    return;
                }
            }
        }
        self.subscription.schedule_revalidation(self.platform.as_mut());
    }

    fn revalidate(&mut self) {
        if let Err(error) = self.subscription.query_availability(self.platform.as_mut()) {
            let failure = AssistantError::retrieval("checking location availability", &error);
            self.recover(&error, failure);
        }
    }

    fn fetch_last_known(&mut self) {
        if let Err(error) = self.subscription.fetch_last_known(self.platform.as_mut()) {
            self.report_error(AssistantError::retrieval("retrieving initial location", &error));
        }
    }

    fn on_last_known(&mut self, sample: Option<Sample>) {
        match sample {
            Some(sample) if self.state.settings_satisfied() => self.deliver(sample),
            Some(_) => self.diagnostics.debug("ignoring last known location, settings no longer satisfied"),
            None => self.diagnostics.debug("no last known location available"),
        }
    }

    fn on_sample(&mut self, subscription: SubscriptionId, sample: Sample) {
        if self.state.is_streaming_on(subscription) {
            self.deliver(sample);
        } else {
            self.diagnostics.debug(format!("ignoring sample from inactive subscription {}", subscription));
        }
    }

    fn on_availability_changed(&mut self, subscription: SubscriptionId, available: bool) {
        if !self.state.is_streaming_on(subscription) {
            self.diagnostics.debug(format!("ignoring availability of inactive subscription {}", subscription));
            return;
        }
        if !available {
            self.diagnostics.info("Location updates became unavailable");
            self.check_providers();
        }
    }

    fn on_availability_queried(&mut self, result: PlatformResult<bool>) {
        if !self.state.stream_active() {
            self.diagnostics.debug("ignoring availability answer, no stream active");
            return;
        }
        match result {
            Ok(true) => self.diagnostics.debug("location updates available"),
            Ok(false) => self.check_providers(),
            Err(error) => {
                let failure = AssistantError::retrieval("checking location availability", &error);
                self.recover(&error, failure);
            }
        }
    }

    fn on_timer(&mut self, timer: TimerId) {
        if self.subscription.take_revalidation(timer) {
            self.evaluate();
        } else {
            self.diagnostics.debug(format!("ignoring stale timer {}", timer.id()));
        }
    }

    /// Run a sample through the mock heuristic and hand it to the consumer
    fn deliver(&mut self, sample: Sample) {
        let verdict = self.filter.assess(&sample);
        self.diagnostics.sample_verdict(&sample, &verdict);

        if !verdict.is_plausible() && !self.config.allow_unverified_samples {
            self.emit(LocationEvent::MockLocationsDetected(SettingsAction::DEVELOPER_SETTINGS));
            return;
        }

        self.best_known = Some(sample.clone());
        self.emit(LocationEvent::NewLocationAvailable(sample));
    }

    /// Read the platform-global mock flag, which has no change notification
    fn check_mock_locations(&mut self) {
        let enabled = self.platform.mock_locations_globally_enabled();
        self.filter.set_global_mock_flag(enabled);
        if enabled && !self.config.allow_unverified_samples {
            self.emit(LocationEvent::MockLocationsDetected(SettingsAction::DEVELOPER_SETTINGS));
        }
    }

    /// Report a platform failure and apply its recovery
    fn recover(&mut self, cause: &PlatformError, failure: AssistantError) -> Recovery {
        let recovery = cause.recovery();
        self.report_error(failure);
        if recovery == Recovery::RedriveChain {
            // Authorization vanished between check and use
            self.tear_down();
            self.evaluate();
        }
        recovery
    }

    fn tear_down(&mut self) {
        self.subscription.unsubscribe(self.platform.as_mut());
        self.settings.abandon_check();
        self.permission.abandon_prompt();
        self.transition(Transition::Cleared);
    }

    /// Apply `transition`; `false` (and no change) if it does not apply
    fn transition(&mut self, transition: Transition) -> bool {
        match self.state.apply(transition) {
            Some(next) => {
                if next != self.state && !self.diagnostics.is_quiet() {
                    tracing::debug!(from = self.state.label(), to = next.label(), "state transition");
                }
                self.state = next;
                true
            }
            None => {
                self.diagnostics.debug(format!(
                    "ignoring {:?} in state {}",
                    transition,
                    self.state.label()
                ));
                false
            }
        }
    }

    fn permission_held(&self) -> bool {
        self.state.permission_granted() || self.permission.check_granted(self.platform.as_ref())
    }

    fn emit(&mut self, event: LocationEvent) {
        match self.sink.as_mut() {
            Some(sink) => {
                if !self.diagnostics.is_quiet() {
                    tracing::debug!(event = event.name(), "emitting event");
                }
                sink.on_event(event);
            }
            None => {
                let message = format!("{} dropped: no event sink is registered", event.name());
                if matches!(event, LocationEvent::NewLocationAvailable(_)) {
                    self.diagnostics.warn(message);
                } else {
                    self.diagnostics.error(message);
                }
            }
        }
    }

    fn report_error(&mut self, error: AssistantError) {
        self.diagnostics.error(&error);
        if let Some(sink) = self.sink.as_mut() {
            sink.on_event(LocationEvent::Error {
                kind: error.kind(),
                message: error.to_string(),
            });
        }
    }
}
