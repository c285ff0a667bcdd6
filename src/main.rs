use location_assistant::algorithms::destination;
use location_assistant::utils::logging;
use location_assistant::{
    pump, AssistantConfig, LocationAssistant, LocationEvent, Mailbox, MockHost, MockPlatform, Position,
    Sample,
};
use std::time::Duration;

/// Replays a scripted session against the mock platform:
/// the permission prompt is granted, settings are already satisfied, then a
/// genuine fix, a spoofed fix 50 m away and a genuine fix 2 km away arrive.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let json_logs = args.iter().any(|arg| arg == "--json-logs");
    let config_path = args.iter().find(|arg| !arg.starts_with("--"));

    if json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    let config = match config_path {
        Some(path) => AssistantConfig::from_file(path)?,
        None => AssistantConfig::default(),
    };
    tracing::info!(
        accuracy = ?config.accuracy,
        update_interval_ms = config.update_interval_ms,
        allow_unverified_samples = config.allow_unverified_samples,
        "starting simulated session"
    );

    let mailbox = Mailbox::new();
    let platform = MockPlatform::new(mailbox.clone());
    let host = MockHost::new(&platform);
    host.answer_permission_prompts(Some(true));

    let mut assistant = LocationAssistant::new(config, platform.clone())?;
    let consumer = |event: LocationEvent| match &event {
        LocationEvent::NewLocationAvailable(sample) => tracing::info!(
            lat = sample.position.lat,
            lon = sample.position.lon,
            accuracy_m = sample.accuracy_m,
            "new location available"
        ),
        LocationEvent::Error { kind, message } => tracing::error!(%kind, "{}", message),
        other => tracing::info!(event = other.name(), action = ?other.action(), "location event"),
    };
    assistant.register(host.clone(), consumer);
    assistant.start();
    assistant.request_permission();
    pump(&mut assistant, &mailbox);

    let home = Position::new(52.5200, 13.4050);
    let script = [
        Sample::at(home).with_accuracy(8.0).with_timestamp(1_000),
        Sample::at(destination(&home, 45.0, 50.0))
            .with_accuracy(3.0)
            .with_timestamp(2_000)
            .with_provider("mock")
            .synthetic(),
        Sample::at(destination(&home, 45.0, 2_050.0))
            .with_accuracy(10.0)
            .with_timestamp(3_000),
    ];

    for sample in script {
        platform.advance(Duration::from_secs(1));
        if !platform.deliver_sample(sample) {
            tracing::warn!("no update stream open, sample dropped");
        }
        pump(&mut assistant, &mailbox);
    }

    platform.advance(Duration::from_secs(10));
    pump(&mut assistant, &mailbox);

    match assistant.best_known_sample() {
        Some(best) => tracing::info!(
            lat = best.position.lat,
            lon = best.position.lon,
            "best known location"
        ),
        None => tracing::warn!("no location acquired"),
    }

    assistant.stop();
    Ok(())
}
