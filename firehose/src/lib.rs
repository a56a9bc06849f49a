//! Firehose-to-Kafka status pipeline.
//!
//! This crate ingests a continuous stream of short status events — from a
//! live firehose client or from a built-in synthetic generator — and
//! republishes each one onto a Kafka topic without blocking ingestion, built
//! on top of `rdkafka` and `tokio`.
//!
//! # Features
//!
//! - Non-blocking producer: `send` returns a [`DeliveryHandle`] that
//!   resolves exactly once with the delivery metadata or the failure
//! - Pluggable [`StreamSource`] variants selected through an explicit
//!   factory: synthetic generator or live feed
//! - Cooperative shutdown: a [`ShutdownHandle`] halts the stream between
//!   events and mid-wait
//! - [`Orchestrator`] owning the `Init → Running → Stopping → Stopped`
//!   lifecycle
//! - Integrated tracing
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use firehose::{FeedSelection, MockStreamConfig, Orchestrator, ProducerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let producer_config = ProducerConfig::new("localhost:9092", "statuses");
//!     let stream_config = MockStreamConfig::new(
//!         vec!["rust".to_string()],
//!         5,
//!         12,
//!         Duration::from_millis(500),
//!     );
//!
//!     let mut orchestrator = Orchestrator::new(&producer_config)?;
//!     orchestrator.start(FeedSelection::Mock(stream_config))?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     orchestrator.shutdown(Duration::from_secs(5)).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod listener;
mod live_stream;
mod mock_stream;
mod orchestrator;
mod producer;
mod stream;

pub use config::{MockStreamConfig, ProducerConfig};
pub use error::{FeedError, Result};
pub use listener::StatusListener;
pub use live_stream::LiveFeedSource;
pub use mock_stream::MockFeedSource;
pub use orchestrator::{Orchestrator, OrchestratorState};
pub use producer::{DeliveryHandle, DeliveryMetadata, DeliveryResult, KafkaStatusProducer, StatusPublisher};
pub use stream::{create_stream_source, shutdown_channel, FeedSelection, ShutdownHandle, ShutdownToken, StreamSource};

/// Re-export the event types for convenience.
pub use firehose_messages::{Status, StatusRecord};
