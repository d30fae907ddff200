use tokio::sync::mpsc;
use tracing::warn;

use bridgebot_core::events::{DirectMessage, FeedEvent};

/// Pure dispatch: `Other` is dropped, direct messages go onto the incoming
/// queue unmodified. Classification (including self-message suppression)
/// already happened in the session layer.
pub struct EventRouter {
    incoming_tx: mpsc::UnboundedSender<DirectMessage>,
}

impl EventRouter {
    pub fn new(incoming_tx: mpsc::UnboundedSender<DirectMessage>) -> Self {
        Self { incoming_tx }
    }

    pub fn route(&self, event: FeedEvent) {
        match event {
            FeedEvent::DirectMessage(message) => {
                if self.incoming_tx.send(message).is_err() {
                    warn!("incoming queue receiver gone, dropping message");
                }
            }
            FeedEvent::Other => {}
        }
    }
}
