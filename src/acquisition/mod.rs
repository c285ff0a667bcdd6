//! Location acquisition
//!
//! The precondition chain (permission, settings, providers, subscription) and
//! the orchestrator that drives it from platform completions.

pub mod state;
pub mod permission;
pub mod settings;
pub mod subscription;
pub mod orchestrator;
pub mod event_loop;

pub use state::{AcquisitionState, SettingsVerdict};
pub use permission::PermissionGate;
pub use settings::{ProviderCheck, SettingsResolver};
pub use subscription::SubscriptionManager;
pub use orchestrator::LocationAssistant;
pub use event_loop::pump;
