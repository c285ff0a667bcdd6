//! Acquisition state machine
//!
//! The precondition chain is a single tagged state:
//! `Unpermitted -> Permitted -> Evaluated(verdict) -> Streaming`.
//! Each boolean facet of the chain (permission granted, settings satisfied,
//! stream active, ...) is derived from the variant, so combinations such as
//! "stream active without permission" cannot be represented. Transitions are
//! pure and guarded: an input that does not apply to the current state yields
//! `None`, which is how late callbacks from abandoned requests are recognised.

use crate::platform::SubscriptionId;

/// Answer of the settings check, refined by the resolution flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsVerdict {
    Satisfied,
    /// Fixable through the in-app dialog; `resolving` while the dialog is up
    FixPending { resolving: bool },
    /// Only fixable outside the app
    Unresolvable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquisitionState {
    /// Permission not confirmed since the last start/stop/reset
    #[default]
    Unpermitted,
    /// Permission held; settings not yet evaluated
    Permitted { check_in_flight: bool },
    /// Settings evaluated
    Evaluated(SettingsVerdict),
    /// Update stream open
    Streaming { subscription: SubscriptionId },
}

/// Inputs driving the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    PermissionConfirmed,
    SettingsCheckSubmitted,
    SettingsChecked(SettingsVerdict),
    ResolutionStarted,
    ResolutionSucceeded,
    ResolutionDeclined,
    ResolutionFailed,
    Subscribed(SubscriptionId),
    /// stop(), reset(), or revoked authorization
    Cleared,
}

/// Single action an evaluation takes in the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CheckPermission,
    CheckSettings,
    AwaitSettingsCheck,
    PromptSettingsChange,
    AwaitResolution,
    CheckProviders,
    Subscribe,
    Revalidate,
}

impl AcquisitionState {
    /// Apply a transition; `None` if it does not apply to this state
    pub fn apply(self, transition: Transition) -> Option<Self> {
        use AcquisitionState::*;
        use SettingsVerdict::*;

        match (self, transition) {
            (_, Transition::Cleared) => Some(Unpermitted),
            (Unpermitted, Transition::PermissionConfirmed) => Some(Permitted { check_in_flight: false }),
            (Permitted { check_in_flight: false }, Transition::SettingsCheckSubmitted) => {
                Some(Permitted { check_in_flight: true })
            }
            (Permitted { .. }, Transition::SettingsChecked(verdict)) => Some(Evaluated(verdict)),
            (Evaluated(FixPending { resolving: false }), Transition::ResolutionStarted) => {
                Some(Evaluated(FixPending { resolving: true }))
            }
            (Evaluated(FixPending { .. }), Transition::ResolutionSucceeded) => Some(Evaluated(Satisfied)),
            (Evaluated(FixPending { .. }), Transition::ResolutionDeclined) => {
                Some(Evaluated(FixPending { resolving: false }))
            }
            (Evaluated(FixPending { .. }), Transition::ResolutionFailed) => Some(Evaluated(Unresolvable)),
            (Evaluated(Satisfied), Transition::Subscribed(subscription)) => Some(Streaming { subscription }),
            _ => None,
        }
    }

    /// What the next evaluation does
    pub fn next_step(&self) -> Step {
        use AcquisitionState::*;
        use SettingsVerdict::*;

        match self {
            Unpermitted => Step::CheckPermission,
            Permitted { check_in_flight: false } => Step::CheckSettings,
            Permitted { check_in_flight: true } => Step::AwaitSettingsCheck,
            Evaluated(FixPending { resolving: false }) => Step::PromptSettingsChange,
            Evaluated(FixPending { resolving: true }) => Step::AwaitResolution,
            Evaluated(Unresolvable) => Step::CheckProviders,
            Evaluated(Satisfied) => Step::Subscribe,
            Streaming { .. } => Step::Revalidate,
        }
    }

    pub fn permission_granted(&self) -> bool {
        !matches!(self, AcquisitionState::Unpermitted)
    }

    /// A settings check has been answered for the current permission grant
    pub fn subscription_established(&self) -> bool {
        matches!(self, AcquisitionState::Evaluated(_) | AcquisitionState::Streaming { .. })
    }

    pub fn settings_satisfied(&self) -> bool {
        matches!(
            self,
            AcquisitionState::Evaluated(SettingsVerdict::Satisfied) | AcquisitionState::Streaming { .. }
        )
    }

    pub fn settings_fix_pending(&self) -> bool {
        matches!(self, AcquisitionState::Evaluated(SettingsVerdict::FixPending { .. }))
    }

    pub fn stream_active(&self) -> bool {
        matches!(self, AcquisitionState::Streaming { .. })
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        match self {
            AcquisitionState::Streaming { subscription } => Some(*subscription),
            _ => None,
        }
    }

    /// Whether `subscription` is the currently open stream
    pub fn is_streaming_on(&self, subscription: SubscriptionId) -> bool {
        self.subscription() == Some(subscription)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AcquisitionState::Unpermitted => "unpermitted",
            AcquisitionState::Permitted { .. } => "permitted",
            AcquisitionState::Evaluated(SettingsVerdict::Satisfied) => "ready",
            AcquisitionState::Evaluated(SettingsVerdict::FixPending { .. }) => "settings-fix-pending",
            AcquisitionState::Evaluated(SettingsVerdict::Unresolvable) => "settings-unresolvable",
            AcquisitionState::Streaming { .. } => "streaming",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [AcquisitionState; 8] = [
        AcquisitionState::Unpermitted,
        AcquisitionState::Permitted { check_in_flight: false },
        AcquisitionState::Permitted { check_in_flight: true },
        AcquisitionState::Evaluated(SettingsVerdict::Satisfied),
        AcquisitionState::Evaluated(SettingsVerdict::FixPending { resolving: false }),
        AcquisitionState::Evaluated(SettingsVerdict::FixPending { resolving: true }),
        AcquisitionState::Evaluated(SettingsVerdict::Unresolvable),
        AcquisitionState::Streaming { subscription: SubscriptionId::new(1) },
    ];

    #[test]
    fn test_happy_path() {
        let sub = SubscriptionId::new(4);
        let state = AcquisitionState::default()
            .apply(Transition::PermissionConfirmed)
            .and_then(|s| s.apply(Transition::SettingsCheckSubmitted))
            .and_then(|s| s.apply(Transition::SettingsChecked(SettingsVerdict::Satisfied)))
            .and_then(|s| s.apply(Transition::Subscribed(sub)))
            .unwrap();

        assert_eq!(state, AcquisitionState::Streaming { subscription: sub });
        assert_eq!(state.next_step(), Step::Revalidate);
        assert!(state.is_streaming_on(sub));
        assert!(!state.is_streaming_on(SubscriptionId::new(5)));
    }

    #[test]
    fn test_stream_implies_permission_and_settings() {
        for state in ALL_STATES {
            if state.stream_active() {
                assert!(state.permission_granted());
                assert!(state.settings_satisfied());
            }
            if state.settings_satisfied() || state.settings_fix_pending() {
                assert!(state.subscription_established());
            }
            if state.subscription_established() {
                assert!(state.permission_granted());
            }
        }
    }

    #[test]
    fn test_cleared_always_returns_to_unpermitted() {
        for state in ALL_STATES {
            assert_eq!(state.apply(Transition::Cleared), Some(AcquisitionState::Unpermitted));
        }
    }

    #[test]
    fn test_settings_result_ignored_unless_permitted() {
        let verdict = Transition::SettingsChecked(SettingsVerdict::Satisfied);
        assert_eq!(AcquisitionState::Unpermitted.apply(verdict), None);
        assert_eq!(
            AcquisitionState::Evaluated(SettingsVerdict::Unresolvable).apply(verdict),
            None
        );
        assert_eq!(
            AcquisitionState::Permitted { check_in_flight: true }.apply(verdict),
            Some(AcquisitionState::Evaluated(SettingsVerdict::Satisfied))
        );
    }

    #[test]
    fn test_only_one_settings_check_in_flight() {
        let in_flight = AcquisitionState::Permitted { check_in_flight: true };
        assert_eq!(in_flight.apply(Transition::SettingsCheckSubmitted), None);
        assert_eq!(in_flight.next_step(), Step::AwaitSettingsCheck);
    }

    #[test]
    fn test_resolution_flow() {
        let pending = AcquisitionState::Evaluated(SettingsVerdict::FixPending { resolving: false });
        assert_eq!(pending.next_step(), Step::PromptSettingsChange);

        let resolving = pending.apply(Transition::ResolutionStarted).unwrap();
        assert_eq!(resolving.next_step(), Step::AwaitResolution);
        assert_eq!(resolving.apply(Transition::ResolutionStarted), None);

        assert_eq!(
            resolving.apply(Transition::ResolutionDeclined),
            Some(pending)
        );
        assert_eq!(
            resolving.apply(Transition::ResolutionSucceeded),
            Some(AcquisitionState::Evaluated(SettingsVerdict::Satisfied))
        );

        let failed = resolving.apply(Transition::ResolutionFailed).unwrap();
        assert_eq!(failed.next_step(), Step::CheckProviders);
        assert!(!failed.settings_fix_pending());
        assert!(failed.permission_granted());
    }

    #[test]
    fn test_stray_resolution_after_stop() {
        assert_eq!(AcquisitionState::Unpermitted.apply(Transition::ResolutionSucceeded), None);
    }

    #[test]
    fn test_subscribe_requires_satisfied_settings() {
        let sub = Transition::Subscribed(SubscriptionId::new(1));
        assert_eq!(AcquisitionState::Evaluated(SettingsVerdict::Unresolvable).apply(sub), None);
        assert_eq!(AcquisitionState::Permitted { check_in_flight: false }.apply(sub), None);
    }
}
