//! Example pipeline fed by the synthetic status generator.
//!
//! This example shows how to:
//! - Configure the producer and the mock stream from the environment
//! - Start the pipeline through the Orchestrator
//! - Shut everything down on Ctrl+C
//!
//! To run this example:
//! ```bash
//! cargo run --example mock_stream
//! ```
//!
//! Make sure you have a Kafka broker running on localhost:9092.

use std::time::Duration;

use firehose::{FeedSelection, MockStreamConfig, Orchestrator, ProducerConfig};
use tokio::signal;
use tracing::{info, Level};

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_num<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting mock stream example");

    let brokers = env_or("KAFKA_BROKERS", "localhost:9092");
    let topic = env_or("KAFKA_TOPIC", "twitter-topic");
    let keywords: Vec<String> = env_or("MOCK_KEYWORDS", "Java,Rust,Kafka,Microservices")
        .split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    let producer_config = ProducerConfig::new(&brokers, &topic);
    let stream_config = MockStreamConfig::new(
        keywords,
        env_num("MOCK_MIN_LENGTH", 5),
        env_num("MOCK_MAX_LENGTH", 15),
        Duration::from_millis(env_num("MOCK_SLEEP_MS", 1000)),
    );

    info!("Publishing mock statuses to topic '{}' via {}", topic, brokers);

    let mut orchestrator = Orchestrator::new(&producer_config)?;
    orchestrator.start(FeedSelection::Mock(stream_config))?;

    info!("Streaming... Press Ctrl+C to stop");
    signal::ctrl_c().await?;
    info!("Received shutdown signal (Ctrl+C)");

    orchestrator.shutdown(Duration::from_secs(5)).await?;
    info!("Pipeline shut down gracefully");
    Ok(())
}
