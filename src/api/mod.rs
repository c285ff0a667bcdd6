//! Consumer-facing API
//!
//! Events, deep-link actions and the sink consumers register to receive them.

pub mod callback;
pub mod types;

pub use callback::{EventCallback, EventSink, RecordingSink};
pub use types::{ErrorKind, LocationEvent, SettingsAction, SettingsScreen};
