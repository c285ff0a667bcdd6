//! Platform collaborator error types

use thiserror::Error;

/// Failures reported by the platform location service or the host context
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The location permission was revoked between check and use
    #[error("location access is not authorized")]
    Unauthorized,
    /// No host context is attached to launch UI flows from
    #[error("no host context is attached")]
    NoHostContext,
    /// A UI flow (permission prompt, resolution dialog, settings screen) could not be launched
    #[error("failed to launch {0}")]
    LaunchFailed(String),
    /// A platform query or request failed structurally
    #[error("platform request failed: {0}")]
    QueryFailed(String),
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// What the assistant should do after a platform failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Clear acquired preconditions and re-run the chain from the top
    RedriveChain,
    /// Report and keep the current state; a later evaluation retries
    ReportOnly,
    /// Report and wait until the consumer attaches what is missing
    AwaitConsumer,
}

impl PlatformError {
    /// Recommended recovery for this failure
    pub fn recovery(&self) -> Recovery {
        match self {
            PlatformError::Unauthorized => Recovery::RedriveChain,
            PlatformError::NoHostContext => Recovery::AwaitConsumer,
            PlatformError::LaunchFailed(_) => Recovery::ReportOnly,
            PlatformError::QueryFailed(_) => Recovery::ReportOnly,
        }
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, PlatformError::Unauthorized)
    }
}
