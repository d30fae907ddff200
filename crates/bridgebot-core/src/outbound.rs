use async_trait::async_trait;

use crate::errors::OutboundError;

/// A public status derived from an accepted message. Consumed exactly once
/// by the publisher worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundPost {
    pub text: String,
}

/// A private reply to a specific user. Consumed exactly once by the
/// notifier worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundNotification {
    pub text: String,
    pub recipient_user_id: i64,
}

/// The two outbound publishing capabilities. Implementations own whatever
/// transport and retry behavior they want; the pipeline itself never
/// retries.
#[async_trait]
pub trait OutboundApi: Send + Sync {
    /// Post a public status.
    async fn publish(&self, text: &str) -> Result<(), OutboundError>;

    /// Send a private message to one user.
    async fn notify(&self, text: &str, recipient_user_id: i64) -> Result<(), OutboundError>;
}
