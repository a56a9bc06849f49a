//! Live firehose stream: forwards externally delivered statuses.

use std::sync::Arc;

use async_trait::async_trait;
use firehose_messages::Status;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::listener::StatusListener;
use crate::stream::{ShutdownToken, StreamSource};

/// Drains raw status payloads handed over by the external firehose client
/// and forwards each one to the listener, in arrival order, at most once.
///
/// The client's connection and auth live outside this crate; it only has to
/// push each status's raw JSON into the channel.
#[derive(Debug)]
pub struct LiveFeedSource {
    events: mpsc::Receiver<String>,
    listener: Arc<StatusListener>,
    shutdown: ShutdownToken,
}

impl LiveFeedSource {
    pub fn new(events: mpsc::Receiver<String>, listener: Arc<StatusListener>, shutdown: ShutdownToken) -> Self {
        Self {
            events,
            listener,
            shutdown,
        }
    }
}

#[async_trait]
impl StreamSource for LiveFeedSource {
    async fn run(&mut self) -> Result<()> {
        info!("Starting live status stream");

        loop {
            let event = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                event = self.events.recv() => event,
            };

            match event {
                Some(raw) => match Status::from_raw_json(&raw) {
                    Ok(status) => {
                        if let Err(e) = self.listener.on_status(&status) {
                            error!("Listener rejected status {}: {}", status.id, e);
                        }
                    }
                    Err(e) => warn!("Skipping malformed status payload: {}", e),
                },
                None => {
                    info!("Live feed closed by upstream");
                    break;
                }
            }
        }

        info!("Live status stream stopped");
        Ok(())
    }
}
