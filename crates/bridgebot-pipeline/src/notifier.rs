use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use bridgebot_core::outbound::{OutboundApi, OutboundNotification};

/// Consumer of the notify queue: one direct message per item, at most
/// once, same drop-on-failure policy as the publisher.
pub struct Notifier {
    notify_rx: mpsc::UnboundedReceiver<OutboundNotification>,
    api: Arc<dyn OutboundApi>,
}

impl Notifier {
    pub fn new(
        notify_rx: mpsc::UnboundedReceiver<OutboundNotification>,
        api: Arc<dyn OutboundApi>,
    ) -> Self {
        Self { notify_rx, api }
    }

    pub async fn run(mut self) {
        debug!("notifier ready");
        while let Some(note) = self.notify_rx.recv().await {
            if let Err(e) = self.api.notify(&note.text, note.recipient_user_id).await {
                warn!(
                    error = %e,
                    kind = e.error_kind(),
                    recipient = note.recipient_user_id,
                    "notify failed, dropping message"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridgebot_outbound::MockOutbound;

    #[tokio::test]
    async fn notifies_in_queue_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let api = Arc::new(MockOutbound::new());
        let notifier = Notifier::new(rx, api.clone());

        tx.send(OutboundNotification {
            text: "thanks".into(),
            recipient_user_id: 42,
        })
        .unwrap();
        tx.send(OutboundNotification {
            text: "thanks".into(),
            recipient_user_id: 43,
        })
        .unwrap();
        drop(tx);

        notifier.run().await;
        assert_eq!(
            api.notifications(),
            vec![("thanks".to_string(), 42), ("thanks".to_string(), 43)]
        );
    }

    #[tokio::test]
    async fn failed_notify_dropped_and_loop_continues() {
        let (tx, rx) = mpsc::unbounded_channel();
        let api = Arc::new(MockOutbound::new());
        api.fail_next_notifies(1);
        let notifier = Notifier::new(rx, api.clone());

        tx.send(OutboundNotification {
            text: "lost".into(),
            recipient_user_id: 1,
        })
        .unwrap();
        tx.send(OutboundNotification {
            text: "kept".into(),
            recipient_user_id: 2,
        })
        .unwrap();
        drop(tx);

        notifier.run().await;
        assert_eq!(api.notifications(), vec![("kept".to_string(), 2)]);
    }
}
