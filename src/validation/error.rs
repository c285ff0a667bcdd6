//! Error taxonomy of the acquisition pipeline
//!
//! None of these cross the public control surface as `Err`; the assistant
//! logs them and, when a sink is attached, forwards them as
//! [`LocationEvent::Error`](crate::api::LocationEvent::Error).

use crate::api::types::ErrorKind;
use crate::platform::PlatformError;
use thiserror::Error;

/// Errors raised while driving the precondition chain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistantError {
    /// Permission could not be requested (no host context, prompt rejected structurally)
    #[error("Could not request location permission: {0}")]
    Permission(String),

    /// Settings resolution broke down (not merely declined by the user)
    #[error("Could not resolve location settings issue: {0}")]
    Settings(String),

    /// Location info could not be retrieved (authorization revoked, availability query failed)
    #[error("Could not retrieve location info: {0}")]
    Retrieval(String),
}

impl AssistantError {
    pub fn permission(source: &PlatformError) -> Self {
        AssistantError::Permission(source.to_string())
    }

    pub fn settings(source: &PlatformError) -> Self {
        AssistantError::Settings(source.to_string())
    }

    pub fn retrieval(context: &str, source: &PlatformError) -> Self {
        AssistantError::Retrieval(format!("{}: {}", context, source))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AssistantError::Permission(_) => ErrorKind::Permission,
            AssistantError::Settings(_) => ErrorKind::Settings,
            AssistantError::Retrieval(_) => ErrorKind::Retrieval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(AssistantError::Permission("x".into()).kind(), ErrorKind::Permission);
        assert_eq!(AssistantError::Settings("x".into()).kind(), ErrorKind::Settings);
        assert_eq!(AssistantError::Retrieval("x".into()).kind(), ErrorKind::Retrieval);
    }

    #[test]
    fn test_messages_carry_context() {
        let err = AssistantError::retrieval("requesting location updates", &PlatformError::Unauthorized);
        assert_eq!(
            err.to_string(),
            "Could not retrieve location info: requesting location updates: location access is not authorized"
        );

        let err = AssistantError::permission(&PlatformError::NoHostContext);
        assert!(err.to_string().contains("no host context"));
    }
}
