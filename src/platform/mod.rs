//! Platform abstraction layer
//!
//! The assistant talks to the outside world through two traits:
//! [`LocationPlatform`] (location service, settings client, timers) and
//! [`HostContext`] (the UI host that can show prompts and settings screens).
//! Asynchronous requests answer by posting a [`Completion`] into a [`Mailbox`],
//! which the single event loop drains in delivery order.

pub mod interface;
pub mod mock;
pub mod error;

pub use interface::{LocationPlatform, HostContext};
pub use mock::{MockPlatform, MockHost};
pub use error::{PlatformError, PlatformResult, Recovery};

use crate::core::Sample;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Identifies one update-stream subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub const fn new(id: u64) -> Self {
        SubscriptionId(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Identifies one armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub const fn new(id: u64) -> Self {
        TimerId(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Identifies one submitted settings check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CheckId(u64);

impl CheckId {
    pub const fn new(id: u64) -> Self {
        CheckId(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Platform answer to a settings check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsCheckOutcome {
    /// Current settings satisfy the request
    Satisfied,
    /// Settings can be fixed through the in-app resolution dialog
    ResolutionRequired,
    /// Settings cannot be changed from within the app
    Unresolvable,
    /// The check itself failed
    Failed(String),
}

/// Outcome of the in-app settings resolution flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Succeeded,
    /// The user dismissed the dialog
    Declined,
    /// The flow broke down (not a user decision)
    Failed(String),
}

/// Asynchronous answer from a collaborator, delivered onto the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    PermissionResult { granted: bool },
    SettingsChecked { check: CheckId, outcome: SettingsCheckOutcome },
    ResolutionFinished(ResolutionOutcome),
    LastKnownSample(Option<Sample>),
    SampleDelivered { subscription: SubscriptionId, sample: Sample },
    AvailabilityChanged { subscription: SubscriptionId, available: bool },
    AvailabilityQueried(PlatformResult<bool>),
    TimerFired(TimerId),
}

/// Single-threaded FIFO of pending completions
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    queue: Rc<RefCell<VecDeque<Completion>>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, completion: Completion) {
        self.queue.borrow_mut().push_back(completion);
    }

    pub fn next(&self) -> Option<Completion> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailbox_is_fifo_and_shared() {
        let mailbox = Mailbox::new();
        let producer = mailbox.clone();

        producer.post(Completion::PermissionResult { granted: false });
        producer.post(Completion::TimerFired(TimerId::new(7)));
        assert_eq!(mailbox.len(), 2);

        assert_eq!(mailbox.next(), Some(Completion::PermissionResult { granted: false }));
        assert_eq!(mailbox.next(), Some(Completion::TimerFired(TimerId::new(7))));
        assert!(mailbox.next().is_none());
        assert!(producer.is_empty());
    }

    #[test]
    fn test_subscription_id_display() {
        assert_eq!(SubscriptionId::new(3).to_string(), "sub#3");
        assert_eq!(SubscriptionId::new(3).id(), 3);
    }
}
