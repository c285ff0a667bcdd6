use location_assistant::algorithms::destination;
use location_assistant::{
    pump, AcquisitionState, AssistantConfig, Accuracy, ErrorKind, LocationAssistant, LocationEvent, Mailbox,
    MockHost, MockPlatform, Position, ProviderStatus, RecordingSink, ResolutionOutcome, Sample,
    SettingsCheckOutcome, SettingsScreen, SettingsVerdict,
};
use std::time::Duration;

struct Session {
    mailbox: Mailbox,
    platform: MockPlatform,
    host: MockHost,
    sink: RecordingSink,
    assistant: LocationAssistant,
}

impl Session {
    fn new(config: AssistantConfig) -> Self {
        let mailbox = Mailbox::new();
        let platform = MockPlatform::new(mailbox.clone());
        let host = MockHost::new(&platform);
        let sink = RecordingSink::new();
        let assistant = LocationAssistant::new(config, platform.clone()).unwrap();
        Session { mailbox, platform, host, sink, assistant }
    }

    fn register(&mut self) {
        self.assistant.register(self.host.clone(), self.sink.clone());
    }

    fn settle(&mut self) {
        pump(&mut self.assistant, &self.mailbox);
    }

    fn deliver(&mut self, sample: Sample) {
        assert!(self.platform.deliver_sample(sample), "no update stream open");
        self.settle();
    }

    /// Grant on first ask, settings satisfied, stream open; events drained
    fn streaming(config: AssistantConfig) -> Self {
        let mut session = Session::new(config);
        session.host.answer_permission_prompts(Some(true));
        session.register();
        session.assistant.start();
        session.assistant.request_permission();
        session.settle();
        assert!(session.assistant.state().stream_active());
        session.sink.take();
        session
    }
}

fn origin() -> Position {
    Position::new(47.3769, 8.5417)
}

#[test]
fn test_mock_incident_scenario() {
    let config = AssistantConfig::new(Accuracy::High, 5000, false);
    let mut session = Session::new(config);
    session.host.answer_permission_prompts(Some(true));
    session.register();
    session.assistant.start();
    assert_eq!(session.sink.last(), Some(LocationEvent::NeedPermission));

    session.assistant.request_permission();
    session.settle();
    assert_eq!(session.sink.count(|e| *e == LocationEvent::PermissionGranted), 1);
    assert!(session.assistant.state().stream_active());
    let request = session.platform.last_request().unwrap();
    assert_eq!(request.interval_ms, 5000);
    session.sink.take();

    let s1 = Sample::at(origin());
    session.deliver(s1.clone());
    assert_eq!(session.sink.take(), vec![LocationEvent::NewLocationAvailable(s1.clone())]);

    let s2 = Sample::at(destination(&origin(), 0.0, 50.0)).synthetic();
    session.deliver(s2.clone());
    let events = session.sink.take();
    assert_eq!(events.len(), 1);
    let action = events[0].action().unwrap();
    assert!(matches!(events[0], LocationEvent::MockLocationsDetected(_)));
    assert_eq!(action.screen(), SettingsScreen::DeveloperOptions);
    assert_eq!(session.assistant.sample_filter().last_mock_sample(), Some(&s2));
    assert_eq!(session.assistant.sample_filter().consecutive_good_readings(), 0);
    assert_eq!(session.assistant.best_known_sample(), Some(&s1));

    let s3 = Sample::at(destination(&s2.position, 180.0, 2000.0));
    session.deliver(s3.clone());
    assert_eq!(session.sink.take(), vec![LocationEvent::NewLocationAvailable(s3.clone())]);
    assert_eq!(session.assistant.best_known_sample(), Some(&s3));
    assert_eq!(session.assistant.sample_filter().consecutive_good_readings(), 1);

    // The action handed out with the event deep-links through the host
    session.assistant.open(action);
    assert_eq!(session.host.opened_screens(), vec![SettingsScreen::DeveloperOptions]);
}

#[test]
fn test_incident_clears_after_sustained_good_readings() {
    let near = Sample::at(destination(&origin(), 90.0, 100.0));
    let far = |i: u64| Sample::at(destination(&origin(), 270.0, 5_000.0)).with_timestamp(i);

    for (good_readings, expect_plausible) in [(18, false), (19, true)] {
        let mut session = Session::streaming(AssistantConfig::default());
        session.deliver(Sample::at(origin()).synthetic());
        for i in 0..good_readings {
            session.deliver(far(i));
        }
        session.sink.take();

        session.deliver(near.clone());
        let events = session.sink.take();
        if expect_plausible {
            assert_eq!(events, vec![LocationEvent::NewLocationAvailable(near.clone())]);
            assert!(!session.assistant.sample_filter().incident_open());
        } else {
            assert!(matches!(events.as_slice(), [LocationEvent::MockLocationsDetected(_)]));
            assert!(session.assistant.sample_filter().incident_open());
        }
    }
}

#[test]
fn test_two_declines_end_permission_requests() {
    let mut session = Session::new(AssistantConfig::default());
    session.host.answer_permission_prompts(Some(false));
    session.register();
    session.assistant.start();
    session.sink.take();

    session.assistant.request_permission_with_explanation();
    session.settle();
    session.assistant.request_permission();
    session.settle();

    let events = session.sink.take();
    let permanent = events
        .iter()
        .filter(|e| matches!(e, LocationEvent::PermissionPermanentlyDeclined(_)))
        .count();
    assert_eq!(permanent, 1);
    assert_eq!(events.last().and_then(|e| e.action()).map(|a| a.screen()), Some(SettingsScreen::AppDetails));
    assert_eq!(session.assistant.decline_count(), 2);

    session.assistant.start();
    session.assistant.stop();
    session.assistant.start();
    assert_eq!(session.sink.count(|e| *e == LocationEvent::NeedPermission), 0);
}

#[test]
fn test_stop_silences_stray_samples() {
    let mut session = Session::streaming(AssistantConfig::default());
    let subscription = session.platform.active_subscription().unwrap();
    let first = Sample::new(10.0, 10.0);
    session.deliver(first.clone());
    session.sink.take();

    session.assistant.stop();
    assert_eq!(session.assistant.state(), AcquisitionState::Unpermitted);
    session.platform.deliver_sample_to(subscription, Sample::new(11.0, 11.0));
    session.settle();

    assert!(session.sink.is_empty());
    assert_eq!(session.assistant.best_known_sample(), Some(&first));

    // Restart runs the whole chain again
    session.assistant.start();
    session.settle();
    assert!(session.assistant.state().stream_active());
    assert_ne!(session.platform.active_subscription(), Some(subscription));
}

#[test]
fn test_structural_resolution_failure_does_not_reprompt() {
    let mut session = Session::new(AssistantConfig::default());
    session.platform.set_permission_granted(true);
    session.platform.set_settings_outcome(SettingsCheckOutcome::ResolutionRequired);
    session.register();
    session.settle();
    assert_eq!(session.sink.last(), Some(LocationEvent::NeedSettingsChange));

    session.platform.set_providers(ProviderStatus::all_disabled());
    session.host.answer_resolutions(Some(ResolutionOutcome::Failed("activity not found".into())));
    session.sink.take();
    session.assistant.resolve_settings();
    session.settle();

    let events = session.sink.take();
    let settings_errors = events
        .iter()
        .filter(|e| matches!(e, LocationEvent::Error { kind: ErrorKind::Settings, .. }))
        .count();
    assert_eq!(settings_errors, 1);
    assert!(matches!(events.last(), Some(LocationEvent::FallBackToSystemSettings(_))));
    assert_eq!(session.host.permission_prompts(), 0);
    assert_eq!(
        session.assistant.state(),
        AcquisitionState::Evaluated(SettingsVerdict::Unresolvable)
    );

    // Consumer-reported outcomes work the same way
    let mut session = Session::new(AssistantConfig::default());
    session.platform.set_permission_granted(true);
    session.platform.set_settings_outcome(SettingsCheckOutcome::ResolutionRequired);
    session.register();
    session.settle();
    session.assistant.report_settings_resolution_failure("intent rejected");
    assert_eq!(
        session.sink.count(|e| matches!(e, LocationEvent::Error { kind: ErrorKind::Settings, .. })),
        1
    );
}

#[test]
fn test_consumer_reported_resolution_success() {
    let mut session = Session::new(AssistantConfig::default());
    session.platform.set_permission_granted(true);
    session.platform.set_settings_outcome(SettingsCheckOutcome::ResolutionRequired);
    session.register();
    session.settle();

    session.assistant.report_settings_resolution_result(true);
    assert!(session.assistant.state().stream_active());
}

#[test]
fn test_revalidation_detects_dark_stream() {
    let mut session = Session::streaming(AssistantConfig::default());
    assert_eq!(session.platform.pending_timers().len(), 1);

    session.platform.signal_availability(false);
    session.platform.set_providers(ProviderStatus::all_enabled());
    session.settle();
    assert!(session.sink.is_empty());

    session.platform.set_providers(ProviderStatus::all_disabled());
    session.platform.advance(Duration::from_secs(10));
    session.settle();

    assert_eq!(session.platform.availability_queries(), 1);
    let events = session.sink.take();
    assert!(matches!(
        events.as_slice(),
        [LocationEvent::FallBackToSystemSettings(action)] if action.screen() == SettingsScreen::LocationSources
    ));
}

#[test]
fn test_config_file_drives_request() {
    let path = std::env::temp_dir().join(format!("location_assistant_scenario_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "accuracy": "LOW", "update_interval_ms": 60000 }"#).unwrap();
    let config = AssistantConfig::from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let session = Session::streaming(config);
    let request = session.platform.last_request().unwrap();
    assert_eq!(request.interval_ms, 60_000);
    assert_eq!(request.fastest_interval_ms, 60_000);
    assert!(request.always_show);
}
