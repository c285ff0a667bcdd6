//! Location Assistant
//!
//! Drives the chain of preconditions an app has to satisfy before it receives
//! location updates (runtime permission, location settings, provider
//! availability, an open update stream) and screens every delivered sample
//! with a mock-location heuristic before handing it to the consumer.
//!
//! The assistant is single-threaded: consumer calls and platform completions
//! are processed one at a time on the caller's event loop.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod platform;
pub mod acquisition;
pub mod api;
pub mod validation;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{Accuracy, LocationRequest, Position, Priority, ProviderStatus, Sample};
pub use acquisition::{pump, AcquisitionState, LocationAssistant, SettingsVerdict};
pub use api::{ErrorKind, EventCallback, EventSink, LocationEvent, RecordingSink, SettingsAction, SettingsScreen};
pub use platform::{
    CheckId, Completion, HostContext, LocationPlatform, Mailbox, MockHost, MockPlatform, PlatformError,
    PlatformResult, ResolutionOutcome, SettingsCheckOutcome, SubscriptionId, TimerId,
};
pub use processing::{SampleFilter, Verdict};
pub use utils::{AssistantConfig, ConfigError, ConfigResult};
pub use validation::AssistantError;
