//! Synthetic status stream standing in for a live feed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use firehose_messages::{format_created_at, RawStatus, RawUser, Status};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};

use crate::config::MockStreamConfig;
use crate::error::{FeedError, Result};
use crate::listener::StatusListener;
use crate::stream::{ShutdownToken, StreamSource};

/// Generates randomized statuses and feeds them to the listener, one at a
/// time, pausing between events.
///
/// Each status is serialized into the feed's raw JSON form and parsed back
/// before the handoff, so the listener sees exactly what a live feed would
/// deliver. A failed round-trip is fatal for the stream.
#[derive(Debug)]
pub struct MockFeedSource {
    config: MockStreamConfig,
    listener: Arc<StatusListener>,
    shutdown: ShutdownToken,
    rng: StdRng,
}

impl MockFeedSource {
    pub fn new(config: MockStreamConfig, listener: Arc<StatusListener>, shutdown: ShutdownToken) -> Self {
        Self::with_rng(config, listener, shutdown, StdRng::from_entropy())
    }

    /// Like `new`, with a caller-supplied RNG for deterministic streams.
    pub fn with_rng(
        config: MockStreamConfig,
        listener: Arc<StatusListener>,
        shutdown: ShutdownToken,
        rng: StdRng,
    ) -> Self {
        Self {
            config,
            listener,
            shutdown,
            rng,
        }
    }

    /// Builds the next status via the raw-transport round-trip.
    fn next_status(&mut self) -> Result<Status> {
        let raw = RawStatus {
            created_at: format_created_at(Utc::now()),
            id: self.rng.gen_range(0..i64::MAX).to_string(),
            text: compose_text(
                &mut self.rng,
                &self.config.words,
                &self.config.keywords,
                self.config.min_length,
                self.config.max_length,
            ),
            user: RawUser {
                id: self.rng.gen_range(0..i64::MAX).to_string(),
            },
        };

        let raw_json = serde_json::to_string(&raw).map_err(|e| FeedError::Serialization(e.to_string()))?;
        Ok(Status::from_raw_json(&raw_json)?)
    }
}

#[async_trait]
impl StreamSource for MockFeedSource {
    async fn run(&mut self) -> Result<()> {
        info!("Starting mock status stream, keywords: {:?}", self.config.keywords);

        loop {
            if self.shutdown.is_shutdown() {
                break;
            }

            let status = match self.next_status() {
                Ok(status) => status,
                Err(e) => {
                    error!("Failed to construct mock status, stopping stream: {}", e);
                    return Err(e);
                }
            };

            if let Err(e) = self.listener.on_status(&status) {
                error!("Listener rejected status {}: {}", status.id, e);
            }

            if self.shutdown.sleep(self.config.sleep).await {
                break;
            }
        }

        info!("Mock status stream stopped");
        Ok(())
    }
}

/// Samples `min..=max` vocabulary words uniformly with replacement and
/// injects one keyword after the word at the midpoint index.
fn compose_text(rng: &mut StdRng, words: &[String], keywords: &[String], min: usize, max: usize) -> String {
    let tweet_length = rng.gen_range(min..=max);
    let mut parts: Vec<&str> = Vec::with_capacity(tweet_length + 1);

    for i in 0..tweet_length {
        parts.push(&words[rng.gen_range(0..words.len())]);
        if i == tweet_length / 2 {
            parts.push(&keywords[rng.gen_range(0..keywords.len())]);
        }
    }

    parts.join(" ")
}
