//! Error types for the firehose pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Errors that can occur while streaming and publishing statuses.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Error from the underlying rdkafka library.
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// A message could not be delivered to its topic.
    #[error("Delivery to topic '{topic}' failed: {source}")]
    Delivery {
        topic: String,
        #[source]
        source: rdkafka::error::KafkaError,
    },

    /// Error serializing a record to JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A raw status payload could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] firehose_messages::ParseError),

    /// A send was attempted after the producer was closed.
    #[error("Producer is closed")]
    ProducerClosed,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A delivery result was lost before completion.
    #[error("Delivery canceled: {0}")]
    Canceled(String),
}
