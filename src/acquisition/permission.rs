//! Location permission gate

use crate::core::PERMANENT_DECLINE_THRESHOLD;
use crate::platform::{HostContext, LocationPlatform, PlatformError};
use crate::validation::AssistantError;

/// How a reported permission answer should be acted upon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionAnswer {
    Granted,
    /// `permanently` once the decline threshold is reached
    Declined { permanently: bool },
}

/// Tracks permission declines and talks to the host's permission prompt
#[derive(Debug, Clone, Default)]
pub struct PermissionGate {
    decline_count: u32,
    /// A prompt launched by the gate has not answered yet
    prompt_outstanding: bool,
}

impl PermissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current grant status; platforms without run-time permissions always grant
    pub fn check_granted(&self, platform: &dyn LocationPlatform) -> bool {
        !platform.requires_runtime_permission() || platform.is_permission_granted()
    }

    /// Launch the host's permission prompt; the answer arrives as a completion
    pub fn request_grant(&mut self, host: Option<&mut dyn HostContext>) -> Result<(), AssistantError> {
        let host = match host {
            Some(host) => host,
            None => return Err(AssistantError::permission(&PlatformError::NoHostContext)),
        };
        host.launch_permission_prompt()
            .map_err(|e| AssistantError::permission(&e))?;
        self.prompt_outstanding = true;
        Ok(())
    }

    /// Claim the answer of the outstanding prompt; `false` if none is outstanding
    pub fn take_prompt(&mut self) -> bool {
        std::mem::replace(&mut self.prompt_outstanding, false)
    }

    /// Forget the outstanding prompt so its late answer is ignored
    pub fn abandon_prompt(&mut self) {
        self.prompt_outstanding = false;
    }

    /// Record the user's answer to a prompt
    pub fn record_result(&mut self, granted: bool) -> PermissionAnswer {
        if granted {
            return PermissionAnswer::Granted;
        }
        self.decline_count = self.decline_count.saturating_add(1);
        PermissionAnswer::Declined {
            permanently: self.is_permanently_declined(),
        }
    }

    pub fn decline_count(&self) -> u32 {
        self.decline_count
    }

    pub fn is_permanently_declined(&self) -> bool {
        self.decline_count >= PERMANENT_DECLINE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Mailbox, MockHost, MockPlatform};

    #[test]
    fn test_legacy_platform_is_always_granted() {
        let platform = MockPlatform::new(Mailbox::new());
        let gate = PermissionGate::new();
        assert!(!gate.check_granted(&platform));

        platform.set_requires_runtime_permission(false);
        assert!(gate.check_granted(&platform));
    }

    #[test]
    fn test_second_decline_is_permanent() {
        let mut gate = PermissionGate::new();
        assert_eq!(gate.record_result(false), PermissionAnswer::Declined { permanently: false });
        assert_eq!(gate.record_result(false), PermissionAnswer::Declined { permanently: true });
        assert_eq!(gate.decline_count(), 2);

        // A grant does not forgive earlier declines
        assert_eq!(gate.record_result(true), PermissionAnswer::Granted);
        assert!(gate.is_permanently_declined());
    }

    #[test]
    fn test_prompt_is_claimed_once() {
        let platform = MockPlatform::new(Mailbox::new());
        let mut host = MockHost::new(&platform);
        let mut gate = PermissionGate::new();
        assert!(!gate.take_prompt());

        gate.request_grant(Some(&mut host as &mut dyn HostContext)).unwrap();
        assert!(gate.take_prompt());
        assert!(!gate.take_prompt());

        gate.request_grant(Some(&mut host as &mut dyn HostContext)).unwrap();
        gate.abandon_prompt();
        assert!(!gate.take_prompt());
    }

    #[test]
    fn test_request_without_host() {
        let mut gate = PermissionGate::new();
        let err = gate.request_grant(None).unwrap_err();
        assert_eq!(err, AssistantError::Permission("no host context is attached".into()));
    }

    #[test]
    fn test_request_launch_failure() {
        let platform = MockPlatform::new(Mailbox::new());
        let mut host = MockHost::new(&platform);
        host.fail_permission_prompt(Some(PlatformError::LaunchFailed("permission prompt".into())));

        let mut gate = PermissionGate::new();
        let err = gate.request_grant(Some(&mut host as &mut dyn HostContext)).unwrap_err();
        assert!(err.to_string().contains("failed to launch permission prompt"));
        assert_eq!(host.permission_prompts(), 1);
        assert!(!gate.take_prompt());
    }
}
