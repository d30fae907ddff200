use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::errors::StreamError;
use crate::events::FeedEvent;

/// The lazy, non-restartable event sequence produced by one connection.
/// Ends with an `Err` item (or end-of-stream) when the connection dies.
pub type BoxedEventStream = Pin<Box<dyn Stream<Item = Result<FeedEvent, StreamError>> + Send>>;

/// A connectable event feed. The reconnect supervisor is generic over this
/// seam so retry behavior can be tested without a network.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn open(&self) -> Result<BoxedEventStream, StreamError>;
}
