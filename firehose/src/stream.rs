//! Stream source abstraction, shutdown signalling and variant selection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tracing::info;

use crate::config::MockStreamConfig;
use crate::error::Result;
use crate::listener::StatusListener;
use crate::live_stream::LiveFeedSource;
use crate::mock_stream::MockFeedSource;

/// A stream of statuses that drives a [`StatusListener`] until stopped or
/// fatally errored.
#[async_trait]
pub trait StreamSource: Send + std::fmt::Debug {
    /// Runs the stream. Returns `Ok(())` after a requested shutdown or when
    /// the feed ends; returns the error that terminated the stream otherwise.
    async fn run(&mut self) -> Result<()>;
}

/// Creates a linked shutdown handle/token pair.
pub fn shutdown_channel() -> (ShutdownHandle, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, ShutdownToken { rx })
}

/// Handle for requesting stream shutdown from another task.
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Requests a graceful shutdown of the stream.
    pub fn shutdown(&self) {
        info!("Requesting stream shutdown");
        let _ = self.tx.send(true);
    }
}

/// The stream-side view of the shutdown signal. Checked every iteration and
/// able to interrupt any wait; a dropped handle counts as shutdown.
#[derive(Clone)]
#[derive(Debug)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Whether shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes once shutdown is requested or the handle is dropped.
    pub async fn cancelled(&mut self) {
        if self.is_shutdown() {
            return;
        }
        while self.rx.changed().await.is_ok() {
            if self.is_shutdown() {
                return;
            }
        }
    }

    /// Sleeps for `duration`, waking early on shutdown. Returns `true` when
    /// shutdown was requested.
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        let interrupted = tokio::select! {
            _ = tokio::time::sleep(duration) => false,
            _ = self.cancelled() => true,
        };
        interrupted || self.is_shutdown()
    }
}

/// Selects which stream variant feeds the pipeline. Exactly one is active
/// per process.
pub enum FeedSelection {
    /// Generate synthetic statuses locally.
    Mock(MockStreamConfig),
    /// Forward raw payloads delivered by an external firehose client.
    Live { events: mpsc::Receiver<String> },
}

/// Builds the selected stream source over validated configuration.
///
/// # Errors
///
/// Returns a configuration error when the mock settings fail validation.
pub fn create_stream_source(
    selection: FeedSelection,
    listener: Arc<StatusListener>,
    shutdown: ShutdownToken,
) -> Result<Box<dyn StreamSource>> {
    match selection {
        FeedSelection::Mock(config) => {
            config.validate()?;
            info!("Selected mock status stream for keywords {:?}", config.keywords);
            Ok(Box::new(MockFeedSource::new(config, listener, shutdown)))
        }
        FeedSelection::Live { events } => {
            info!("Selected live status stream");
            Ok(Box::new(LiveFeedSource::new(events, listener, shutdown)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_sees_shutdown_signal() {
        let (handle, token) = shutdown_channel();
        assert!(!token.is_shutdown());
        handle.shutdown();
        assert!(token.is_shutdown());
    }

    #[tokio::test]
    async fn sleep_is_interrupted_by_shutdown() {
        let (handle, mut token) = shutdown_channel();
        let waiter = tokio::spawn(async move { token.sleep(Duration::from_secs(30)).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.shutdown();

        let stopped = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("sleep did not wake on shutdown")
            .unwrap();
        assert!(stopped);
    }

    #[tokio::test]
    async fn dropped_handle_counts_as_shutdown() {
        let (handle, mut token) = shutdown_channel();
        drop(handle);
        token.cancelled().await;
    }

    #[tokio::test]
    async fn sleep_runs_to_completion_without_signal() {
        let (_handle, mut token) = shutdown_channel();
        assert!(!token.sleep(Duration::from_millis(5)).await);
    }
}
