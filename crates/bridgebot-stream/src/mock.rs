use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;

use bridgebot_core::errors::StreamError;
use bridgebot_core::events::FeedEvent;
use bridgebot_core::source::{BoxedEventStream, FeedSource};

/// One scripted outcome for a `FeedSource::open` call.
pub enum MockConnect {
    /// Connect successfully and yield these items, then end the stream.
    Events(Vec<Result<FeedEvent, StreamError>>),
    /// Fail the open call itself.
    Fail(StreamError),
}

/// Feed source that plays back pre-programmed connect outcomes in order.
/// Calls past the end of the script fail, so a test that scripts N
/// outcomes sees exactly N productive connects.
pub struct MockFeedSource {
    connects: Mutex<VecDeque<MockConnect>>,
    call_count: AtomicUsize,
}

impl MockFeedSource {
    pub fn new(connects: Vec<MockConnect>) -> Self {
        Self {
            connects: Mutex::new(connects.into()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FeedSource for MockFeedSource {
    async fn open(&self) -> Result<BoxedEventStream, StreamError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        let next = self.connects.lock().pop_front();
        match next {
            Some(MockConnect::Events(items)) => Ok(Box::pin(stream::iter(items))),
            Some(MockConnect::Fail(e)) => Err(e),
            None => Err(StreamError::Config("no connect scripted".into())),
        }
    }
}
