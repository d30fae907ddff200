use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures::{Future, Stream};
use reqwest::Client;
use tracing::{debug, instrument};

use bridgebot_core::errors::StreamError;
use bridgebot_core::events::FeedEvent;
use bridgebot_core::security::RequestSigner;
use bridgebot_core::source::{BoxedEventStream, FeedSource};

use crate::frame::FrameDecoder;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection parameters for the streaming endpoint.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub stream_url: String,
    /// Fixed client-identifying label sent as the User-Agent.
    pub user_agent: String,
    /// Messages from this sender are suppressed before routing.
    pub self_user_id: i64,
    /// Optional extra trust anchor (PEM bytes). Peer verification is
    /// always on regardless.
    pub ca_cert_pem: Option<Vec<u8>>,
    pub idle_timeout: Duration,
}

/// Owns the long-lived authenticated connection. One `open` call produces
/// one lazy, non-restartable event sequence; the reconnect supervisor calls
/// `open` again after each failure.
pub struct StreamSession {
    client: Client,
    config: SessionConfig,
    signer: Arc<dyn RequestSigner>,
}

impl StreamSession {
    pub fn new(config: SessionConfig, signer: Arc<dyn RequestSigner>) -> Result<Self, StreamError> {
        let mut builder = Client::builder().connect_timeout(CONNECT_TIMEOUT);
        if let Some(pem) = &config.ca_cert_pem {
            let cert = reqwest::Certificate::from_pem(pem)
                .map_err(|e| StreamError::Config(format!("trust anchor: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }
        let client = builder
            .build()
            .map_err(|e| StreamError::Config(e.to_string()))?;
        Ok(Self {
            client,
            config,
            signer,
        })
    }

    /// Issue the signed GET and wrap the chunked body in an event stream.
    #[instrument(skip(self), fields(url = %self.config.stream_url))]
    pub async fn open(&self) -> Result<EventStream, StreamError> {
        let signed = self.signer.sign("GET", &self.config.stream_url)?;

        let mut req = self
            .client
            .get(&self.config.stream_url)
            .header(reqwest::header::USER_AGENT, &self.config.user_agent);
        for (name, value) in &signed.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req
            .send()
            .await
            .map_err(|e| StreamError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StreamError::from_status(status, body));
        }

        debug!("stream connected");
        Ok(EventStream::new(
            resp.bytes_stream(),
            self.config.self_user_id,
            self.config.idle_timeout,
        ))
    }
}

#[async_trait::async_trait]
impl FeedSource for StreamSession {
    async fn open(&self) -> Result<BoxedEventStream, StreamError> {
        let stream = StreamSession::open(self).await?;
        Ok(Box::pin(stream))
    }
}

/// Decodes the chunked response body into classified events.
///
/// Each arriving chunk resets the idle deadline and runs through the frame
/// decoder; decoded records are classified (including self-message
/// suppression) and queued, so the caller consumes every event from a chunk
/// before the next chunk is read. Transport failure, end of body, and idle
/// expiry all terminate the sequence with an `Err` item; a feed that ends
/// is an error by definition, the stream is supposed to be infinite.
pub struct EventStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
    decoder: FrameDecoder,
    pending: VecDeque<FeedEvent>,
    self_user_id: i64,
    idle_deadline: Pin<Box<tokio::time::Sleep>>,
    idle_timeout: Duration,
    done: bool,
}

impl EventStream {
    pub(crate) fn new(
        byte_stream: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
        self_user_id: i64,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            inner: Box::pin(byte_stream),
            decoder: FrameDecoder::new(),
            pending: VecDeque::new(),
            self_user_id,
            idle_deadline: Box::pin(tokio::time::sleep(idle_timeout)),
            idle_timeout,
            done: false,
        }
    }
}

impl Stream for EventStream {
    type Item = Result<FeedEvent, StreamError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }

        if let Some(event) = self.pending.pop_front() {
            return Poll::Ready(Some(Ok(event)));
        }

        loop {
            match self.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    let deadline = tokio::time::Instant::now() + self.idle_timeout;
                    self.idle_deadline.as_mut().reset(deadline);

                    let records = self.decoder.feed(&bytes);
                    let self_user_id = self.self_user_id;
                    self.pending.extend(
                        records
                            .into_iter()
                            .map(|record| FeedEvent::classify(record, self_user_id)),
                    );

                    if let Some(event) = self.pending.pop_front() {
                        return Poll::Ready(Some(Ok(event)));
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    self.done = true;
                    return Poll::Ready(Some(Err(StreamError::Network(e.to_string()))));
                }
                Poll::Ready(None) => {
                    self.done = true;
                    return Poll::Ready(Some(Err(StreamError::Closed)));
                }
                Poll::Pending => {
                    if self.idle_deadline.as_mut().poll(cx).is_ready() {
                        let timeout = self.idle_timeout;
                        self.done = true;
                        return Poll::Ready(Some(Err(StreamError::Stalled(timeout))));
                    }
                    return Poll::Pending;
                }
            }
        }
    }
}
