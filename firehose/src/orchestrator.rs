//! Composition root: selects a stream variant and owns process lifecycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::ProducerConfig;
use crate::error::{FeedError, Result};
use crate::listener::StatusListener;
use crate::producer::KafkaStatusProducer;
use crate::stream::{create_stream_source, shutdown_channel, FeedSelection, ShutdownHandle, ShutdownToken};

/// Lifecycle states of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Init,
    Running,
    Stopping,
    Stopped,
}

/// Wires producer, listener and the selected stream source together and
/// drives their lifecycle: `Init → Running → Stopping → Stopped`.
///
/// Errors inside the running stream are logged where they occur and never
/// escalate past the stream task; `shutdown` is the only way the stream is
/// halted from here.
pub struct Orchestrator {
    producer: Arc<KafkaStatusProducer>,
    state: OrchestratorState,
    shutdown: ShutdownHandle,
    token: Option<ShutdownToken>,
    source_task: Option<JoinHandle<Result<()>>>,
}

impl Orchestrator {
    /// Builds the producer from validated configuration.
    pub fn new(producer_config: &ProducerConfig) -> Result<Self> {
        let producer = Arc::new(KafkaStatusProducer::new(producer_config)?);
        let (shutdown, token) = shutdown_channel();

        Ok(Self {
            producer,
            state: OrchestratorState::Init,
            shutdown,
            token: Some(token),
            source_task: None,
        })
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    /// The producer owned by this orchestrator.
    pub fn producer(&self) -> Arc<KafkaStatusProducer> {
        Arc::clone(&self.producer)
    }

    /// Starts the selected stream variant on a background task.
    ///
    /// # Errors
    ///
    /// Fails when called more than once, or when the selection's
    /// configuration is invalid.
    pub fn start(&mut self, selection: FeedSelection) -> Result<()> {
        if self.state != OrchestratorState::Init {
            return Err(FeedError::Config("stream already started".to_string()));
        }
        let token = self
            .token
            .take()
            .ok_or_else(|| FeedError::Config("stream already started".to_string()))?;

        let listener = Arc::new(StatusListener::new(self.producer()));
        let mut source = create_stream_source(selection, listener, token)?;

        self.source_task = Some(tokio::spawn(async move {
            let result = source.run().await;
            if let Err(ref e) = result {
                error!("Status stream terminated with error: {}", e);
            }
            result
        }));

        self.state = OrchestratorState::Running;
        info!("Status stream started");
        Ok(())
    }

    /// Stops the stream, waits for it to finish and closes the producer.
    ///
    /// Idempotent; after it returns the pipeline accepts no further sends.
    pub async fn shutdown(&mut self, flush_timeout: Duration) -> Result<()> {
        match self.state {
            OrchestratorState::Running => {}
            OrchestratorState::Init => {
                self.producer.close(flush_timeout)?;
                self.state = OrchestratorState::Stopped;
                return Ok(());
            }
            OrchestratorState::Stopping | OrchestratorState::Stopped => {
                debug!("Orchestrator already stopped");
                return Ok(());
            }
        }

        self.state = OrchestratorState::Stopping;
        self.shutdown.shutdown();

        if let Some(task) = self.source_task.take() {
            if let Err(e) = task.await {
                error!("Stream task failed to join: {}", e);
            }
        }

        self.producer.close(flush_timeout)?;
        self.state = OrchestratorState::Stopped;
        info!("Orchestrator stopped");
        Ok(())
    }
}
