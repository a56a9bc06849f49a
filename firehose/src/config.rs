//! Configuration for the producer and the synthetic stream.

use std::time::Duration;

use crate::error::{FeedError, Result};

/// The generator's built-in vocabulary.
pub(crate) const DEFAULT_WORDS: &[&str] = &[
    "Lorem",
    "ipsum",
    "dolor",
    "sensectetuer",
    "adipiscina",
    "elit",
    "ascenes",
    "porttitor",
    "conque",
    "Dasse",
    "Besuere",
    "magna",
    "sed",
    "aulviner",
    "ultricies",
    "Durus",
    "libero",
];

/// Configuration for the Kafka producer.
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Comma-separated list of Kafka brokers.
    pub brokers: String,

    /// Topic this producer publishes to.
    pub topic: String,

    /// Delivery timeout for an enqueued message.
    pub message_timeout: Duration,

    /// Maximum number of messages buffered in the client queue.
    pub queue_max_messages: u32,

    /// Maximum total size of the client queue, in kilobytes.
    pub queue_max_kbytes: u32,

    /// Maximum number of messages batched per request.
    pub batch_num_messages: u32,

    /// How long a send may wait for queue space before failing.
    pub enqueue_timeout: Duration,
}

impl ProducerConfig {
    /// Creates a producer configuration with the default tuning.
    ///
    /// # Arguments
    ///
    /// * `brokers` - Comma-separated list of Kafka brokers (e.g., "localhost:9092")
    /// * `topic` - Topic to publish status records to
    pub fn new(brokers: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            topic: topic.into(),
            message_timeout: Duration::from_secs(5),
            queue_max_messages: 100_000,
            queue_max_kbytes: 1_048_576,
            batch_num_messages: 10_000,
            enqueue_timeout: Duration::from_secs(5),
        }
    }

    /// Sets the delivery timeout.
    pub fn with_message_timeout(mut self, timeout: Duration) -> Self {
        self.message_timeout = timeout;
        self
    }

    /// Sets the client queue limits.
    pub fn with_queue_limits(mut self, max_messages: u32, max_kbytes: u32) -> Self {
        self.queue_max_messages = max_messages;
        self.queue_max_kbytes = max_kbytes;
        self
    }

    /// Sets the per-request batch size.
    pub fn with_batch_num_messages(mut self, batch: u32) -> Self {
        self.batch_num_messages = batch;
        self
    }

    /// Sets how long a send may wait for queue space.
    pub fn with_enqueue_timeout(mut self, timeout: Duration) -> Self {
        self.enqueue_timeout = timeout;
        self
    }

    /// Checks that brokers and topic are present.
    pub fn validate(&self) -> Result<()> {
        if self.brokers.trim().is_empty() {
            return Err(FeedError::Config("brokers must not be empty".to_string()));
        }
        if self.topic.trim().is_empty() {
            return Err(FeedError::Config("topic must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Configuration for the synthetic status stream.
#[derive(Debug, Clone)]
pub struct MockStreamConfig {
    /// Keywords injected into every generated status.
    pub keywords: Vec<String>,

    /// Minimum number of vocabulary words per status.
    pub min_length: usize,

    /// Maximum number of vocabulary words per status.
    pub max_length: usize,

    /// Pause between generated statuses.
    pub sleep: Duration,

    /// Vocabulary the status text is sampled from.
    pub words: Vec<String>,
}

impl MockStreamConfig {
    /// Creates a synthetic stream configuration with the built-in vocabulary.
    pub fn new(keywords: Vec<String>, min_length: usize, max_length: usize, sleep: Duration) -> Self {
        Self {
            keywords,
            min_length,
            max_length,
            sleep,
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Replaces the vocabulary.
    pub fn with_words(mut self, words: Vec<String>) -> Self {
        self.words = words;
        self
    }

    /// Checks keyword, vocabulary and length constraints.
    pub fn validate(&self) -> Result<()> {
        if self.keywords.is_empty() {
            return Err(FeedError::Config("keywords must not be empty".to_string()));
        }
        if self.words.is_empty() {
            return Err(FeedError::Config("vocabulary must not be empty".to_string()));
        }
        if self.min_length > self.max_length {
            return Err(FeedError::Config(format!(
                "min_length {} exceeds max_length {}",
                self.min_length, self.max_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn producer_config_defaults_match_client_tuning() {
        let config = ProducerConfig::new("localhost:9092", "statuses");
        assert_eq!(config.message_timeout, Duration::from_secs(5));
        assert_eq!(config.queue_max_messages, 100_000);
        assert_eq!(config.queue_max_kbytes, 1_048_576);
        assert_eq!(config.batch_num_messages, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn producer_config_rejects_blank_fields() {
        assert!(ProducerConfig::new("", "statuses").validate().is_err());
        assert!(ProducerConfig::new("localhost:9092", " ").validate().is_err());
    }

    #[test]
    fn mock_config_requires_keywords() {
        let config = MockStreamConfig::new(vec![], 3, 5, Duration::from_millis(100));
        assert!(config.validate().is_err());
    }

    #[test]
    fn mock_config_rejects_inverted_lengths() {
        let config = MockStreamConfig::new(vec!["rust".to_string()], 6, 5, Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn mock_config_accepts_equal_lengths() {
        let config = MockStreamConfig::new(vec!["rust".to_string()], 5, 5, Duration::ZERO);
        assert!(config.validate().is_ok());
        assert_eq!(config.words.len(), 17);
    }
}
