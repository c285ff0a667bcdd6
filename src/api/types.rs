//! Consumer-facing event types

use crate::core::Sample;
use serde::{Deserialize, Serialize};
use std::fmt;

/// System settings screens the consumer can be deep-linked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingsScreen {
    /// Per-app details page, where permissions can be re-enabled
    AppDetails,
    /// Location source (provider) settings
    LocationSources,
    /// Developer options, where mock location apps are configured
    DeveloperOptions,
}

/// Opaque, reusable deep-link trigger handed out with events
///
/// The action carries no reference to any host; pass it back to
/// [`LocationAssistant::open`](crate::LocationAssistant::open) to launch the
/// screen through whichever host context is attached at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettingsAction {
    screen: SettingsScreen,
}

impl SettingsAction {
    pub(crate) const APP_SETTINGS: SettingsAction = SettingsAction { screen: SettingsScreen::AppDetails };
    pub(crate) const LOCATION_SETTINGS: SettingsAction = SettingsAction { screen: SettingsScreen::LocationSources };
    pub(crate) const DEVELOPER_SETTINGS: SettingsAction = SettingsAction { screen: SettingsScreen::DeveloperOptions };

    pub fn screen(&self) -> SettingsScreen {
        self.screen
    }
}

/// Category of an error reported through the event channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Permission could not be requested
    Permission,
    /// Location settings could not be checked or resolved
    Settings,
    /// Location info could not be retrieved
    Retrieval,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Permission => write!(f, "permission"),
            ErrorKind::Settings => write!(f, "settings"),
            ErrorKind::Retrieval => write!(f, "retrieval"),
        }
    }
}

/// Events delivered to the attached [`EventSink`](crate::api::EventSink)
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// The user needs to grant location permission
    NeedPermission,
    /// The user declined before; show an explanation, then request again
    ExplainPermission,
    /// The user declined at least twice; only the app settings page can help now
    PermissionPermanentlyDeclined(SettingsAction),
    PermissionGranted,
    /// Settings need a change that the in-app dialog can make; call `resolve_settings`
    NeedSettingsChange,
    /// All providers are off; send the user to the system location settings
    FallBackToSystemSettings(SettingsAction),
    /// Mock locations were detected and unverified samples are not allowed
    MockLocationsDetected(SettingsAction),
    NewLocationAvailable(Sample),
    Error { kind: ErrorKind, message: String },
}

impl LocationEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LocationEvent::NeedPermission => "NeedPermission",
            LocationEvent::ExplainPermission => "ExplainPermission",
            LocationEvent::PermissionPermanentlyDeclined(_) => "PermissionPermanentlyDeclined",
            LocationEvent::PermissionGranted => "PermissionGranted",
            LocationEvent::NeedSettingsChange => "NeedSettingsChange",
            LocationEvent::FallBackToSystemSettings(_) => "FallBackToSystemSettings",
            LocationEvent::MockLocationsDetected(_) => "MockLocationsDetected",
            LocationEvent::NewLocationAvailable(_) => "NewLocationAvailable",
            LocationEvent::Error { .. } => "Error",
        }
    }

    /// The deep-link action carried by this event, if any
    pub fn action(&self) -> Option<SettingsAction> {
        match self {
            LocationEvent::PermissionPermanentlyDeclined(action)
            | LocationEvent::FallBackToSystemSettings(action)
            | LocationEvent::MockLocationsDetected(action) => Some(*action),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_point_at_expected_screens() {
        assert_eq!(SettingsAction::APP_SETTINGS.screen(), SettingsScreen::AppDetails);
        assert_eq!(SettingsAction::LOCATION_SETTINGS.screen(), SettingsScreen::LocationSources);
        assert_eq!(SettingsAction::DEVELOPER_SETTINGS.screen(), SettingsScreen::DeveloperOptions);
    }

    #[test]
    fn test_event_action_accessor() {
        let event = LocationEvent::FallBackToSystemSettings(SettingsAction::LOCATION_SETTINGS);
        assert_eq!(event.action(), Some(SettingsAction::LOCATION_SETTINGS));
        assert_eq!(event.name(), "FallBackToSystemSettings");
        assert_eq!(LocationEvent::NeedPermission.action(), None);
    }
}
