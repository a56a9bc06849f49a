//! Asynchronous Kafka producer for status records.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use firehose_messages::StatusRecord;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer as RdProducer};
use rdkafka::ClientConfig;
use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::config::ProducerConfig;
use crate::error::{FeedError, Result};

/// Broker-assigned facts about where a message landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryMetadata {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// Create-time stamp carried on the record, in epoch milliseconds.
    pub timestamp_ms: i64,
}

/// The terminal outcome of one send: metadata on success, the error otherwise.
pub type DeliveryResult = std::result::Result<DeliveryMetadata, FeedError>;

/// A promise for the terminal outcome of one send.
///
/// Every accepted send resolves its handle exactly once — success with
/// [`DeliveryMetadata`] or failure with the delivery error. The handle may be
/// dropped without awaiting it; the outcome is still logged by the producer.
#[derive(Debug)]
pub struct DeliveryHandle {
    rx: oneshot::Receiver<DeliveryResult>,
}

impl DeliveryHandle {
    /// Creates a handle that is already resolved.
    pub fn ready(result: DeliveryResult) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { rx }
    }

    /// Waits for the terminal delivery result.
    pub async fn wait(self) -> DeliveryResult {
        self.rx
            .await
            .unwrap_or_else(|_| Err(FeedError::Canceled("delivery task dropped before completion".to_string())))
    }
}

/// The seam the listener publishes through; mockable in tests.
#[cfg_attr(test, mockall::automock)]
pub trait StatusPublisher: Send + Sync {
    /// Publishes a status record to this publisher's configured topic.
    fn publish(&self, key: Option<i64>, record: &StatusRecord) -> Result<DeliveryHandle>;
}

/// Kafka producer for status records.
///
/// `send` never blocks the caller: the record is serialized, handed to a
/// background task that performs the enqueue and awaits the broker
/// acknowledgment, and a [`DeliveryHandle`] is returned immediately.
///
/// # Example
///
/// ```no_run
/// use firehose::{KafkaStatusProducer, ProducerConfig};
/// use firehose_messages::StatusRecord;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ProducerConfig::new("localhost:9092", "statuses");
///     let producer = KafkaStatusProducer::new(&config)?;
///
///     let record = StatusRecord {
///         id: 1,
///         created_at: "Tue Aug 04 09:15:02 +0000 2026".to_string(),
///         text: "hello".to_string(),
///         author_id: 7,
///     };
///
///     let handle = producer.send(&config.topic, Some(record.author_id), &record)?;
///     let metadata = handle.wait().await?;
///     println!("landed at offset {}", metadata.offset);
///     Ok(())
/// }
/// ```
pub struct KafkaStatusProducer {
    inner: FutureProducer,
    topic: String,
    enqueue_timeout: Duration,
    closed: AtomicBool,
}

impl KafkaStatusProducer {
    /// Creates a new Kafka producer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the client cannot
    /// be created.
    pub fn new(config: &ProducerConfig) -> Result<Self> {
        config.validate()?;
        info!("Creating Kafka producer with brokers: {}", config.brokers);

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", config.message_timeout.as_millis().to_string())
            .set("queue.buffering.max.messages", config.queue_max_messages.to_string())
            .set("queue.buffering.max.kbytes", config.queue_max_kbytes.to_string())
            .set("batch.num.messages", config.batch_num_messages.to_string())
            .create()?;

        Ok(Self {
            inner: producer,
            topic: config.topic.clone(),
            enqueue_timeout: config.enqueue_timeout,
            closed: AtomicBool::new(false),
        })
    }

    /// The topic this producer publishes to by default.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Sends a value to a topic without blocking the caller.
    ///
    /// The key, when present, is encoded big-endian in the layout of Kafka's
    /// standard long serializer; without a key the broker picks the
    /// partition. The returned handle resolves exactly once with the
    /// terminal delivery result, which is also logged.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::ProducerClosed` if `close` was already called; no
    /// delivery result is created for a rejected send.
    pub fn send<V: Serialize>(&self, topic: &str, key: Option<i64>, value: &V) -> Result<DeliveryHandle> {
        if self.is_closed() {
            return Err(FeedError::ProducerClosed);
        }

        let payload = match serde_json::to_vec(value) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize message for topic '{}': {}", topic, e);
                return Ok(DeliveryHandle::ready(Err(FeedError::Serialization(e.to_string()))));
            }
        };

        debug!(
            "Sending message to topic '{}' ({} bytes)",
            topic,
            payload.len()
        );

        let producer = self.inner.clone();
        let topic = topic.to_string();
        let key_bytes = key.map(|k| k.to_be_bytes().to_vec());
        let enqueue_timeout = self.enqueue_timeout;
        let timestamp_ms = Utc::now().timestamp_millis();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let record = FutureRecord {
                topic: &topic,
                partition: None,
                payload: Some(&payload),
                key: key_bytes.as_ref(),
                timestamp: Some(timestamp_ms),
                headers: None,
            };

            let submitted = Instant::now();
            let result = match producer.send(record, enqueue_timeout).await {
                Ok((partition, offset)) => {
                    info!(
                        "Received delivery metadata for topic '{}' (partition: {}, offset: {}, timestamp: {}) after {:?}",
                        topic,
                        partition,
                        offset,
                        timestamp_ms,
                        submitted.elapsed()
                    );
                    Ok(DeliveryMetadata {
                        topic,
                        partition,
                        offset,
                        timestamp_ms,
                    })
                }
                Err((kafka_err, _msg)) => {
                    error!(
                        "Failed to deliver message {} to topic '{}': {}",
                        String::from_utf8_lossy(&payload),
                        topic,
                        kafka_err
                    );
                    Err(FeedError::Delivery {
                        topic,
                        source: kafka_err,
                    })
                }
            };

            // Receiver may have been dropped; the outcome is already logged.
            let _ = tx.send(result);
        });

        Ok(DeliveryHandle { rx })
    }

    /// Closes the producer, flushing in-flight sends best-effort.
    ///
    /// Idempotent: only the first call flushes; later calls are no-ops. Safe
    /// to call when no send was ever issued. Sends issued after the first
    /// call fail synchronously with `FeedError::ProducerClosed`.
    pub fn close(&self, timeout: Duration) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("Kafka producer already closed");
            return Ok(());
        }

        info!("Closing Kafka producer, flushing in-flight messages");
        RdProducer::flush(&self.inner, timeout)?;
        Ok(())
    }
}

impl StatusPublisher for KafkaStatusProducer {
    fn publish(&self, key: Option<i64>, record: &StatusRecord) -> Result<DeliveryHandle> {
        self.send(&self.topic, key, record)
    }
}
