//! Maps incoming statuses to wire records and hands them to the producer.

use std::sync::Arc;

use firehose_messages::{Status, StatusRecord};
use tracing::debug;

use crate::error::Result;
use crate::producer::StatusPublisher;

/// Receives each status from a stream source and publishes it, keyed by the
/// author id so one author's statuses land on one partition.
pub struct StatusListener {
    publisher: Arc<dyn StatusPublisher>,
}

impl std::fmt::Debug for StatusListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusListener").finish_non_exhaustive()
    }
}

impl StatusListener {
    pub fn new(publisher: Arc<dyn StatusPublisher>) -> Self {
        Self { publisher }
    }

    /// Maps the status to a [`StatusRecord`] and publishes it.
    ///
    /// The delivery outcome is asynchronous and logged by the producer; this
    /// call only fails if the publisher rejects the send outright (e.g. it
    /// was already closed).
    pub fn on_status(&self, status: &Status) -> Result<()> {
        let record = StatusRecord::from(status);
        debug!("Received status {} from author {}", record.id, record.author_id);

        self.publisher.publish(Some(record.author_id), &record)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;
    use crate::producer::{DeliveryHandle, MockStatusPublisher};

    fn sample_status() -> Status {
        Status {
            id: 11,
            created_at: "Tue Aug 04 09:15:02 +0000 2026".to_string(),
            text: "Lorem ipsum".to_string(),
            user_id: 42,
        }
    }

    #[test]
    fn maps_fields_and_keys_by_author() {
        let mut publisher = MockStatusPublisher::new();
        publisher
            .expect_publish()
            .withf(|key, record| {
                *key == Some(42)
                    && record.id == 11
                    && record.author_id == 42
                    && record.text == "Lorem ipsum"
                    && record.created_at == "Tue Aug 04 09:15:02 +0000 2026"
            })
            .times(1)
            .returning(|_, _| Ok(DeliveryHandle::ready(Err(FeedError::ProducerClosed))));

        let listener = StatusListener::new(Arc::new(publisher));
        listener.on_status(&sample_status()).unwrap();
    }

    #[test]
    fn rejected_publish_propagates() {
        let mut publisher = MockStatusPublisher::new();
        publisher
            .expect_publish()
            .returning(|_, _| Err(FeedError::ProducerClosed));

        let listener = StatusListener::new(Arc::new(publisher));
        let err = listener.on_status(&sample_status()).unwrap_err();
        assert!(matches!(err, FeedError::ProducerClosed));
    }
}
