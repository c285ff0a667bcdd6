//! Scripted platform and host implementations for testing and simulation
//!
//! Both mocks are cheap handles over shared state, so a test can keep a clone
//! to script answers and inspect requests while the assistant owns another.
//! Asynchronous answers are posted to the shared [`Mailbox`]; timers run on a
//! logical clock advanced explicitly with [`MockPlatform::advance`].

use crate::api::types::SettingsScreen;
use crate::core::{LocationRequest, ProviderStatus, Sample};
use crate::platform::{
    CheckId, Completion, HostContext, LocationPlatform, Mailbox, PlatformError, PlatformResult,
    ResolutionOutcome, SettingsCheckOutcome, SubscriptionId, TimerId,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug)]
struct PlatformState {
    requires_runtime_permission: bool,
    permission_granted: bool,
    mock_locations_enabled: bool,
    settings_outcome: SettingsCheckOutcome,
    settings_check_error: Option<PlatformError>,
    providers: ProviderStatus,
    available: bool,
    last_known: Option<Sample>,
    subscribe_error: Option<PlatformError>,
    availability_error: Option<PlatformError>,
    last_known_error: Option<PlatformError>,
    active_subscription: Option<SubscriptionId>,
    last_subscription: Option<SubscriptionId>,
    last_request: Option<LocationRequest>,
    settings_checks: u32,
    subscribe_calls: u32,
    availability_queries: u32,
    last_known_requests: u32,
    clock_ms: u64,
    timers: Vec<(TimerId, u64)>,
}

impl Default for PlatformState {
    fn default() -> Self {
        Self {
            requires_runtime_permission: true,
            permission_granted: false,
            mock_locations_enabled: false,
            settings_outcome: SettingsCheckOutcome::Satisfied,
            settings_check_error: None,
            providers: ProviderStatus::all_enabled(),
            available: true,
            last_known: None,
            subscribe_error: None,
            availability_error: None,
            last_known_error: None,
            active_subscription: None,
            last_subscription: None,
            last_request: None,
            settings_checks: 0,
            subscribe_calls: 0,
            availability_queries: 0,
            last_known_requests: 0,
            clock_ms: 0,
            timers: Vec::new(),
        }
    }
}

/// Mock location platform
#[derive(Debug, Clone)]
pub struct MockPlatform {
    state: Rc<RefCell<PlatformState>>,
    mailbox: Mailbox,
}

impl MockPlatform {
    /// Create a mock that posts its answers to `mailbox`
    pub fn new(mailbox: Mailbox) -> Self {
        Self {
            state: Rc::new(RefCell::new(PlatformState::default())),
            mailbox,
        }
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn set_permission_granted(&self, granted: bool) {
        self.state.borrow_mut().permission_granted = granted;
    }

    /// Simulate a platform predating run-time permissions
    pub fn set_requires_runtime_permission(&self, required: bool) {
        self.state.borrow_mut().requires_runtime_permission = required;
    }

    pub fn set_mock_locations_enabled(&self, enabled: bool) {
        self.state.borrow_mut().mock_locations_enabled = enabled;
    }

    pub fn set_settings_outcome(&self, outcome: SettingsCheckOutcome) {
        self.state.borrow_mut().settings_outcome = outcome;
    }

    pub fn fail_settings_check(&self, error: Option<PlatformError>) {
        self.state.borrow_mut().settings_check_error = error;
    }

    pub fn set_providers(&self, providers: ProviderStatus) {
        self.state.borrow_mut().providers = providers;
    }

    pub fn set_available(&self, available: bool) {
        self.state.borrow_mut().available = available;
    }

    pub fn set_last_known(&self, sample: Option<Sample>) {
        self.state.borrow_mut().last_known = sample;
    }

    pub fn fail_subscribe(&self, error: Option<PlatformError>) {
        self.state.borrow_mut().subscribe_error = error;
    }

    pub fn fail_availability_query(&self, error: Option<PlatformError>) {
        self.state.borrow_mut().availability_error = error;
    }

    pub fn fail_last_known(&self, error: Option<PlatformError>) {
        self.state.borrow_mut().last_known_error = error;
    }

    /// Push a sample down the active stream; returns `false` if no stream is open
    pub fn deliver_sample(&self, sample: Sample) -> bool {
        let active = self.state.borrow().active_subscription;
        match active {
            Some(subscription) => {
                self.deliver_sample_to(subscription, sample);
                true
            }
            None => false,
        }
    }

    /// Push a sample tagged with an explicit subscription (used to simulate stray callbacks)
    pub fn deliver_sample_to(&self, subscription: SubscriptionId, sample: Sample) {
        self.mailbox.post(Completion::SampleDelivered { subscription, sample });
    }

    /// Change availability and notify the active stream, if any
    pub fn signal_availability(&self, available: bool) {
        let active = {
            let mut state = self.state.borrow_mut();
            state.available = available;
            state.active_subscription
        };
        if let Some(subscription) = active {
            self.mailbox.post(Completion::AvailabilityChanged { subscription, available });
        }
    }

    /// Advance the logical clock and fire every timer that came due, in due order
    pub fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut state = self.state.borrow_mut();
            state.clock_ms += by.as_millis() as u64;
            let now = state.clock_ms;
            let mut due: Vec<(TimerId, u64)> =
                state.timers.iter().copied().filter(|(_, at)| *at <= now).collect();
            state.timers.retain(|(_, at)| *at > now);
            due.sort_by_key(|(_, at)| *at);
            due
        };

        for (timer, _) in &due {
            self.mailbox.post(Completion::TimerFired(*timer));
        }
        due.len()
    }

    pub fn active_subscription(&self) -> Option<SubscriptionId> {
        self.state.borrow().active_subscription
    }

    pub fn last_subscription(&self) -> Option<SubscriptionId> {
        self.state.borrow().last_subscription
    }

    pub fn last_request(&self) -> Option<LocationRequest> {
        self.state.borrow().last_request.clone()
    }

    pub fn settings_checks(&self) -> u32 {
        self.state.borrow().settings_checks
    }

    pub fn subscribe_calls(&self) -> u32 {
        self.state.borrow().subscribe_calls
    }

    pub fn availability_queries(&self) -> u32 {
        self.state.borrow().availability_queries
    }

    pub fn last_known_requests(&self) -> u32 {
        self.state.borrow().last_known_requests
    }

    pub fn pending_timers(&self) -> Vec<TimerId> {
        self.state.borrow().timers.iter().map(|(timer, _)| *timer).collect()
    }

    pub fn clock_ms(&self) -> u64 {
        self.state.borrow().clock_ms
    }
}

impl LocationPlatform for MockPlatform {
    fn requires_runtime_permission(&self) -> bool {
        self.state.borrow().requires_runtime_permission
    }

    fn is_permission_granted(&self) -> bool {
        self.state.borrow().permission_granted
    }

    fn mock_locations_globally_enabled(&self) -> bool {
        self.state.borrow().mock_locations_enabled
    }

    fn check_settings(&mut self, request: &LocationRequest, check: CheckId) -> PlatformResult<()> {
        let outcome = {
            let mut state = self.state.borrow_mut();
            state.settings_checks += 1;
            state.last_request = Some(request.clone());
            if let Some(error) = state.settings_check_error.clone() {
                return Err(error);
            }
            state.settings_outcome.clone()
        };
        self.mailbox.post(Completion::SettingsChecked { check, outcome });
        Ok(())
    }

    fn providers(&self) -> ProviderStatus {
        self.state.borrow().providers
    }

    fn subscribe(&mut self, request: &LocationRequest, subscription: SubscriptionId) -> PlatformResult<()> {
        let mut state = self.state.borrow_mut();
        state.subscribe_calls += 1;
        state.last_request = Some(request.clone());
        if let Some(error) = state.subscribe_error.clone() {
            return Err(error);
        }
        state.active_subscription = Some(subscription);
        state.last_subscription = Some(subscription);
        Ok(())
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        let mut state = self.state.borrow_mut();
        if state.active_subscription == Some(subscription) {
            state.active_subscription = None;
        }
    }

    fn request_last_known(&mut self) -> PlatformResult<()> {
        let sample = {
            let mut state = self.state.borrow_mut();
            state.last_known_requests += 1;
            if let Some(error) = state.last_known_error.clone() {
                return Err(error);
            }
            state.last_known.clone()
        };
        self.mailbox.post(Completion::LastKnownSample(sample));
        Ok(())
    }

    fn query_availability(&mut self) -> PlatformResult<()> {
        let available = {
            let mut state = self.state.borrow_mut();
            state.availability_queries += 1;
            if let Some(error) = state.availability_error.clone() {
                return Err(error);
            }
            state.available
        };
        self.mailbox.post(Completion::AvailabilityQueried(Ok(available)));
        Ok(())
    }

    fn schedule_timer(&mut self, delay: Duration, timer: TimerId) {
        let mut state = self.state.borrow_mut();
        let due = state.clock_ms + delay.as_millis() as u64;
        state.timers.push((timer, due));
    }

    fn cancel_timer(&mut self, timer: TimerId) {
        self.state.borrow_mut().timers.retain(|(armed, _)| *armed != timer);
    }
}

#[derive(Debug, Default)]
struct HostState {
    show_rationale: bool,
    permission_answer: Option<bool>,
    resolution_answer: Option<ResolutionOutcome>,
    prompt_error: Option<PlatformError>,
    resolution_error: Option<PlatformError>,
    open_error: Option<PlatformError>,
    permission_prompts: u32,
    resolution_launches: u32,
    opened_screens: Vec<SettingsScreen>,
}

/// Mock host context
///
/// With an answer configured, prompts and resolution dialogs respond
/// immediately (through the mailbox) and update the linked platform the way
/// the real system would: a granted prompt grants the permission, a
/// successful resolution makes the settings check pass, and a declined
/// prompt makes the host ask for a rationale next time.
#[derive(Debug, Clone)]
pub struct MockHost {
    state: Rc<RefCell<HostState>>,
    platform: MockPlatform,
}

impl MockHost {
    pub fn new(platform: &MockPlatform) -> Self {
        Self {
            state: Rc::new(RefCell::new(HostState::default())),
            platform: platform.clone(),
        }
    }

    /// Auto-answer permission prompts; `None` leaves them pending
    pub fn answer_permission_prompts(&self, granted: Option<bool>) {
        self.state.borrow_mut().permission_answer = granted;
    }

    /// Auto-answer resolution dialogs; `None` leaves them pending
    pub fn answer_resolutions(&self, outcome: Option<ResolutionOutcome>) {
        self.state.borrow_mut().resolution_answer = outcome;
    }

    pub fn fail_permission_prompt(&self, error: Option<PlatformError>) {
        self.state.borrow_mut().prompt_error = error;
    }

    pub fn fail_resolution_launch(&self, error: Option<PlatformError>) {
        self.state.borrow_mut().resolution_error = error;
    }

    pub fn fail_open_settings(&self, error: Option<PlatformError>) {
        self.state.borrow_mut().open_error = error;
    }

    pub fn permission_prompts(&self) -> u32 {
        self.state.borrow().permission_prompts
    }

    pub fn resolution_launches(&self) -> u32 {
        self.state.borrow().resolution_launches
    }

    pub fn opened_screens(&self) -> Vec<SettingsScreen> {
        self.state.borrow().opened_screens.clone()
    }
}

impl HostContext for MockHost {
    fn should_show_rationale(&self) -> bool {
        self.state.borrow().show_rationale
    }

    fn launch_permission_prompt(&mut self) -> PlatformResult<()> {
        let answer = {
            let mut state = self.state.borrow_mut();
            state.permission_prompts += 1;
            if let Some(error) = state.prompt_error.clone() {
                return Err(error);
            }
            if state.permission_answer == Some(false) {
                state.show_rationale = true;
            }
            state.permission_answer
        };

        if let Some(granted) = answer {
            if granted {
                self.platform.set_permission_granted(true);
            }
            self.platform.mailbox().post(Completion::PermissionResult { granted });
        }
        Ok(())
    }

    fn launch_settings_resolution(&mut self) -> PlatformResult<()> {
        let answer = {
            let mut state = self.state.borrow_mut();
            state.resolution_launches += 1;
            if let Some(error) = state.resolution_error.clone() {
                return Err(error);
            }
            state.resolution_answer.clone()
        };

        if let Some(outcome) = answer {
            if outcome == ResolutionOutcome::Succeeded {
                self.platform.set_settings_outcome(SettingsCheckOutcome::Satisfied);
            }
            self.platform.mailbox().post(Completion::ResolutionFinished(outcome));
        }
        Ok(())
    }

    fn open_settings(&mut self, screen: SettingsScreen) -> PlatformResult<()> {
        let mut state = self.state.borrow_mut();
        if let Some(error) = state.open_error.clone() {
            return Err(error);
        }
        state.opened_screens.push(screen);
        Ok(())
    }
}
