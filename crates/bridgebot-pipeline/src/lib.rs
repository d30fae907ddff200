pub mod notifier;
pub mod processor;
pub mod publisher;
pub mod router;

pub use notifier::Notifier;
pub use processor::{MessageProcessor, ACK_TEXT};
pub use publisher::Publisher;
pub use router::EventRouter;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use bridgebot_core::audit::AuditStore;
use bridgebot_core::outbound::OutboundApi;

/// The wired pipeline: three queues, one worker per stage. Channels are
/// built here and handed into each worker's constructor, never ambient. The workers run until their queue's senders are gone, which in
/// the binary means until process exit.
pub struct Pipeline {
    pub router: EventRouter,
    pub handles: Vec<JoinHandle<()>>,
}

impl Pipeline {
    pub fn spawn(audit: Arc<dyn AuditStore>, api: Arc<dyn OutboundApi>) -> Self {
        let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();
        let (post_tx, post_rx) = mpsc::unbounded_channel();
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();

        let processor = MessageProcessor::new(incoming_rx, post_tx, notify_tx, audit);
        let publisher = Publisher::new(post_rx, api.clone());
        let notifier = Notifier::new(notify_rx, api);

        let handles = vec![
            tokio::spawn(processor.run()),
            tokio::spawn(publisher.run()),
            tokio::spawn(notifier.run()),
        ];

        Self {
            router: EventRouter::new(incoming_tx),
            handles,
        }
    }
}
