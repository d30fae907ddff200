use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use bridgebot_core::errors::OutboundError;
use bridgebot_core::outbound::OutboundApi;

/// Recording outbound double. Calls are logged in order; the next N calls
/// of either capability can be made to fail, to exercise the
/// drop-on-error paths.
#[derive(Default)]
pub struct MockOutbound {
    published: Mutex<Vec<String>>,
    notifications: Mutex<Vec<(String, i64)>>,
    publish_failures: AtomicU32,
    notify_failures: AtomicU32,
}

impl MockOutbound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().clone()
    }

    pub fn notifications(&self) -> Vec<(String, i64)> {
        self.notifications.lock().clone()
    }

    /// Fail the next `n` publish calls.
    pub fn fail_next_publishes(&self, n: u32) {
        self.publish_failures.store(n, Ordering::Relaxed);
    }

    /// Fail the next `n` notify calls.
    pub fn fail_next_notifies(&self, n: u32) {
        self.notify_failures.store(n, Ordering::Relaxed);
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl OutboundApi for MockOutbound {
    async fn publish(&self, text: &str) -> Result<(), OutboundError> {
        if Self::take_failure(&self.publish_failures) {
            return Err(OutboundError::Api {
                status: 500,
                body: "mock publish failure".into(),
            });
        }
        self.published.lock().push(text.to_string());
        Ok(())
    }

    async fn notify(&self, text: &str, recipient_user_id: i64) -> Result<(), OutboundError> {
        if Self::take_failure(&self.notify_failures) {
            return Err(OutboundError::Api {
                status: 500,
                body: "mock notify failure".into(),
            });
        }
        self.notifications
            .lock()
            .push((text.to_string(), recipient_user_id));
        Ok(())
    }
}
