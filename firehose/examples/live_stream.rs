//! Example pipeline fed by an external firehose client.
//!
//! The firehose client itself (connection, auth, keyword filtering) lives
//! outside this crate; it only has to push each status's raw JSON into a
//! channel. Here a small scripted task stands in for it.
//!
//! To run this example:
//! ```bash
//! cargo run --example live_stream
//! ```
//!
//! Make sure you have a Kafka broker running on localhost:9092.

use std::time::Duration;

use chrono::Utc;
use firehose::{FeedSelection, Orchestrator, ProducerConfig};
use firehose_messages::format_created_at;
use tokio::sync::mpsc;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting live stream example");

    let brokers = std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string());
    let topic = std::env::var("KAFKA_TOPIC").unwrap_or_else(|_| "twitter-topic".to_string());

    let (feed, events) = mpsc::channel::<String>(64);

    // Stand-in for the external firehose client.
    tokio::spawn(async move {
        for i in 1..=10i64 {
            let payload = format!(
                r#"{{"created_at":"{}","id":"{}","text":"status number {} from the feed","user":{{"id":"{}"}}}}"#,
                format_created_at(Utc::now()),
                1000 + i,
                i,
                i * 7,
            );
            if feed.send(payload).await.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        info!("Feed script finished, closing the channel");
    });

    let mut orchestrator = Orchestrator::new(&ProducerConfig::new(&brokers, &topic))?;
    orchestrator.start(FeedSelection::Live { events })?;

    info!("Forwarding live statuses to topic '{}'... Press Ctrl+C to stop early", topic);
    tokio::signal::ctrl_c().await?;

    orchestrator.shutdown(Duration::from_secs(5)).await?;
    info!("Pipeline shut down gracefully");
    Ok(())
}
