//! Update-stream subscription and its revalidation timer

use crate::core::{LocationRequest, REVALIDATION_DELAY_MS};
use crate::platform::{LocationPlatform, PlatformResult, SubscriptionId, TimerId};
use std::time::Duration;

/// Owns subscription identities and the single pending revalidation timer
///
/// Every subscribe attempt gets a fresh [`SubscriptionId`] and every scheduled
/// revalidation a fresh [`TimerId`], so completions that belong to an abandoned
/// stream or timer can be told apart from current ones.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionManager {
    next_subscription: u64,
    next_timer: u64,
    current: Option<SubscriptionId>,
    revalidation: Option<TimerId>,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a continuous stream for `request`
    pub fn subscribe(
        &mut self,
        platform: &mut dyn LocationPlatform,
        request: &LocationRequest,
    ) -> PlatformResult<SubscriptionId> {
        self.next_subscription += 1;
        let subscription = SubscriptionId::new(self.next_subscription);
        platform.subscribe(request, subscription)?;
        self.current = Some(subscription);
        Ok(subscription)
    }

    /// Tear down the current stream, if any, and disarm the revalidation timer
    pub fn unsubscribe(&mut self, platform: &mut dyn LocationPlatform) {
        if let Some(subscription) = self.current.take() {
            platform.unsubscribe(subscription);
        }
        self.cancel_revalidation(platform);
    }

    pub fn current(&self) -> Option<SubscriptionId> {
        self.current
    }

    /// Arm the one-shot revalidation, replacing any timer still pending
    pub fn schedule_revalidation(&mut self, platform: &mut dyn LocationPlatform) -> TimerId {
        self.cancel_revalidation(platform);
        self.next_timer += 1;
        let timer = TimerId::new(self.next_timer);
        platform.schedule_timer(Duration::from_millis(REVALIDATION_DELAY_MS), timer);
        self.revalidation = Some(timer);
        timer
    }

    pub fn cancel_revalidation(&mut self, platform: &mut dyn LocationPlatform) {
        if let Some(timer) = self.revalidation.take() {
            platform.cancel_timer(timer);
        }
    }

    /// Consume a fired timer; `false` if it is not the pending revalidation
    pub fn take_revalidation(&mut self, timer: TimerId) -> bool {
        if self.revalidation == Some(timer) {
            self.revalidation = None;
            true
        } else {
            false
        }
    }

    pub fn pending_revalidation(&self) -> Option<TimerId> {
        self.revalidation
    }

    /// Ask the platform whether the stream is currently delivering
    pub fn query_availability(&self, platform: &mut dyn LocationPlatform) -> PlatformResult<()> {
        platform.query_availability()
    }

    /// Best-effort fetch of the platform's cached last fix
    pub fn fetch_last_known(&self, platform: &mut dyn LocationPlatform) -> PlatformResult<()> {
        platform.request_last_known()
    }
}
