use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use bridgebot_core::audit::{AuditRecord, AuditStore};
use bridgebot_core::events::DirectMessage;
use bridgebot_core::outbound::{OutboundNotification, OutboundPost};

/// Fixed acknowledgement sent to every accepted sender. Sent before the
/// post is published; there is no confirmation the publish succeeded.
pub const ACK_TEXT: &str = "your post is accepted. thanks!";

/// Consumer of the incoming queue. Each message fans out into a public
/// post, a private acknowledgement, and a best-effort audit row.
pub struct MessageProcessor {
    incoming_rx: mpsc::UnboundedReceiver<DirectMessage>,
    post_tx: mpsc::UnboundedSender<OutboundPost>,
    notify_tx: mpsc::UnboundedSender<OutboundNotification>,
    audit: Arc<dyn AuditStore>,
}

impl MessageProcessor {
    pub fn new(
        incoming_rx: mpsc::UnboundedReceiver<DirectMessage>,
        post_tx: mpsc::UnboundedSender<OutboundPost>,
        notify_tx: mpsc::UnboundedSender<OutboundNotification>,
        audit: Arc<dyn AuditStore>,
    ) -> Self {
        Self {
            incoming_rx,
            post_tx,
            notify_tx,
            audit,
        }
    }

    pub async fn run(mut self) {
        debug!("message processor ready");
        while let Some(message) = self.incoming_rx.recv().await {
            self.handle(message);
        }
    }

    fn handle(&self, message: DirectMessage) {
        info!(
            message_id = message.id,
            sender = %message.sender_screen_name,
            "processing message"
        );

        let text = message.text.trim().to_string();

        if self
            .post_tx
            .send(OutboundPost { text: text.clone() })
            .is_err()
        {
            warn!(message_id = message.id, "post queue receiver gone");
        }

        if self
            .notify_tx
            .send(OutboundNotification {
                text: ACK_TEXT.to_string(),
                recipient_user_id: message.sender_id,
            })
            .is_err()
        {
            warn!(message_id = message.id, "notify queue receiver gone");
        }

        // Best effort: a failed audit write never blocks the pipeline.
        let record = AuditRecord::from_message(&message);
        if let Err(e) = self.audit.append(&record) {
            warn!(
                error = %e,
                message_id = message.id,
                "audit append failed, continuing"
            );
        }
    }
}
