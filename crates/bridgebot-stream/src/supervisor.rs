use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use parking_lot::RwLock;
use tracing::{error, info, warn};

use bridgebot_core::errors::StreamError;
use bridgebot_core::events::FeedEvent;
use bridgebot_core::source::FeedSource;

/// Reconnect policy: bounded attempts, fixed delay between them.
/// The delay is deliberately constant: no exponent, no jitter.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_secs(30),
        }
    }
}

/// Connection lifecycle. `Aborted` is terminal and observable, so tests
/// assert on it instead of watching a process die.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Connecting,
    Connected,
    Backoff,
    Aborted,
}

/// Wraps a feed source in the bounded-retry reconnect loop.
///
/// Every connection or stream error burns one attempt. A connection that
/// delivers at least one event counts as sustained and resets the budget.
/// Once the budget is exhausted the supervisor parks in `Aborted` and
/// returns; an unattended bridge with no feed is worse than a dead one an
/// operator will notice and restart.
pub struct ReconnectSupervisor<S: FeedSource> {
    source: S,
    config: RetryConfig,
    state: Arc<RwLock<SupervisorState>>,
    attempts: AtomicU32,
}

impl<S: FeedSource> ReconnectSupervisor<S> {
    pub fn new(source: S, config: RetryConfig) -> Self {
        Self {
            source,
            config,
            state: Arc::new(RwLock::new(SupervisorState::Idle)),
            attempts: AtomicU32::new(0),
        }
    }

    pub fn state(&self) -> SupervisorState {
        *self.state.read()
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempts.load(Ordering::Relaxed)
    }

    fn set_state(&self, next: SupervisorState) {
        *self.state.write() = next;
    }

    /// Drive the feed until the retry budget is exhausted. Every decoded
    /// event is handed to `deliver` before the next chunk is read.
    pub async fn run<F>(&self, mut deliver: F)
    where
        F: FnMut(FeedEvent),
    {
        loop {
            self.set_state(SupervisorState::Connecting);

            let failure = match self.source.open().await {
                Ok(mut stream) => {
                    self.set_state(SupervisorState::Connected);
                    info!("feed connected");

                    let mut sustained = false;
                    loop {
                        match stream.next().await {
                            Some(Ok(event)) => {
                                if !sustained {
                                    // First event proves the connection;
                                    // the retry budget starts over.
                                    sustained = true;
                                    self.attempts.store(0, Ordering::Relaxed);
                                }
                                deliver(event);
                            }
                            Some(Err(e)) => break e,
                            None => break StreamError::Closed,
                        }
                    }
                }
                Err(e) => e,
            };

            let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
            if attempt > self.config.max_attempts {
                error!(
                    error = %failure,
                    attempts = attempt - 1,
                    "retry budget exhausted, giving up"
                );
                self.set_state(SupervisorState::Aborted);
                return;
            }

            warn!(
                error = %failure,
                kind = failure.error_kind(),
                attempt,
                max_attempts = self.config.max_attempts,
                delay_secs = self.config.interval.as_secs(),
                "feed connection lost, retrying"
            );
            self.set_state(SupervisorState::Backoff);
            tokio::time::sleep(self.config.interval).await;
        }
    }
}
