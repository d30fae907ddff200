use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use bridgebot_core::outbound::{OutboundApi, OutboundPost};

/// Consumer of the post queue: one publish call per item, at most once.
/// A failed call is logged and the post is gone.
pub struct Publisher {
    post_rx: mpsc::UnboundedReceiver<OutboundPost>,
    api: Arc<dyn OutboundApi>,
}

impl Publisher {
    pub fn new(post_rx: mpsc::UnboundedReceiver<OutboundPost>, api: Arc<dyn OutboundApi>) -> Self {
        Self { post_rx, api }
    }

    pub async fn run(mut self) {
        debug!("publisher ready");
        while let Some(post) = self.post_rx.recv().await {
            if let Err(e) = self.api.publish(&post.text).await {
                warn!(error = %e, kind = e.error_kind(), "publish failed, dropping post");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridgebot_outbound::MockOutbound;

    #[tokio::test]
    async fn publishes_in_queue_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let api = Arc::new(MockOutbound::new());
        let publisher = Publisher::new(rx, api.clone());

        tx.send(OutboundPost { text: "one".into() }).unwrap();
        tx.send(OutboundPost { text: "two".into() }).unwrap();
        drop(tx);

        publisher.run().await;
        assert_eq!(api.published(), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn failed_publish_dropped_and_loop_continues() {
        let (tx, rx) = mpsc::unbounded_channel();
        let api = Arc::new(MockOutbound::new());
        api.fail_next_publishes(1);
        let publisher = Publisher::new(rx, api.clone());

        tx.send(OutboundPost { text: "lost".into() }).unwrap();
        tx.send(OutboundPost { text: "kept".into() }).unwrap();
        drop(tx);

        publisher.run().await;
        assert_eq!(api.published(), vec!["kept"]);
    }
}
