/**
 * Feed Poller
 *
 * Keeps one long-poll feed request in flight at all times and hands every
 * delivered message to a [`MessageSink`], in order, exactly once.
 *
 * # States
 *
 * ```text
 * Idle -> Requesting -> delivered:  advance cursor, request again at once
 *                    -> aborted:    same cursor, request again at once
 *                    -> failed:     Backoff, then request again, same cursor
 * ```
 *
 * Each request runs under its own abort timer. Firing it drops the request
 * and the next one resumes from the same cursor, so nothing is lost; the
 * server may finish its wait for nothing.
 *
 * Failures are retried forever with capped exponential backoff. Any
 * success or abort resets the backoff.
 */

use crate::client::api::ChatApi;
use crate::client::config::Config;
use crate::client::display::MessageSink;
use crate::client::retry::Backoff;
use crate::shared::Cursor;
use std::future::Future;
use std::time::Duration;

/// Where the poller is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// Not started, or stopped by its owner
    Idle,
    /// A feed request is in flight
    Requesting,
    /// Waiting before retrying a failed request
    Backoff,
}

/// Result of one feed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The server answered; this many messages were shown (may be 0 on a
    /// server-side timeout)
    Delivered(usize),
    /// The abort timer fired before the server answered
    Aborted,
    /// The request failed; retry after the given delay
    Failed { retry_in: Duration },
}

/// Long-poll loop over a [`ChatApi`]
pub struct FeedPoller<S: MessageSink> {
    api: ChatApi,
    sink: S,
    cursor: Cursor,
    state: PollerState,
    backoff: Backoff,
    abort_timeout: Duration,
}

impl<S: MessageSink> FeedPoller<S> {
    pub fn new(api: ChatApi, sink: S, config: &Config) -> Self {
        Self {
            api,
            sink,
            cursor: Cursor::ORIGIN,
            state: PollerState::Idle,
            backoff: Backoff::new(config.backoff().clone()),
            abort_timeout: config.abort_timeout(),
        }
    }

    /// Resume from a known position instead of the beginning
    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Issue one feed request and apply its result
    pub async fn poll_once(&mut self) -> PollOutcome {
        self.state = PollerState::Requesting;

        match tokio::time::timeout(self.abort_timeout, self.api.fetch_feed(self.cursor)).await {
            Ok(Ok(response)) => {
                let delivered = response.messages.len();
                for message in &response.messages {
                    self.sink.append(message);
                }
                if delivered > 0 {
                    self.sink.scroll_to_latest();
                    tracing::debug!(
                        "[Poller] {} new messages, cursor {} -> {}",
                        delivered,
                        self.cursor,
                        response.cursor
                    );
                }
                self.cursor = response.cursor;
                self.backoff.reset();
                PollOutcome::Delivered(delivered)
            }
            Err(_) => {
                tracing::warn!(
                    "[Poller] No answer within {:?}, re-requesting from {}",
                    self.abort_timeout,
                    self.cursor
                );
                self.backoff.reset();
                PollOutcome::Aborted
            }
            Ok(Err(e)) => {
                let retry_in = self.backoff.next_delay();
                tracing::warn!(
                    "[Poller] Feed request failed (attempt {}): {}. Retrying in {:?}",
                    self.backoff.attempt(),
                    e,
                    retry_in
                );
                self.state = PollerState::Backoff;
                PollOutcome::Failed { retry_in }
            }
        }
    }

    /// Poll until `shutdown` resolves
    pub async fn run_until(&mut self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        tracing::info!("[Poller] Polling {} from {}", self.api.base_url(), self.cursor);

        loop {
            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                outcome = self.poll_once() => outcome,
            };

            if let PollOutcome::Failed { retry_in } = outcome {
                tokio::select! {
                    biased;
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(retry_in) => {}
                }
            }
        }

        self.state = PollerState::Idle;
        tracing::info!("[Poller] Stopped at cursor {}", self.cursor);
    }

    /// Poll forever
    pub async fn run(&mut self) {
        self.run_until(std::future::pending()).await;
    }
}
