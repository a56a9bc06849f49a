//! Integration tests for the firehose pipeline.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use firehose::{
    create_stream_source, shutdown_channel, DeliveryHandle, DeliveryMetadata, FeedError, FeedSelection,
    KafkaStatusProducer, MockStreamConfig, Orchestrator, OrchestratorState, ProducerConfig, StatusListener,
    StatusPublisher, StatusRecord,
};
use tokio::sync::mpsc;
use tokio::time::timeout;

/// No broker listens here; deliveries fail once the message timeout expires.
const UNREACHABLE_BROKER: &str = "127.0.0.1:19";

fn failing_producer(topic: &str) -> KafkaStatusProducer {
    let config = ProducerConfig::new(UNREACHABLE_BROKER, topic)
        .with_message_timeout(Duration::from_millis(300));
    KafkaStatusProducer::new(&config).unwrap()
}

fn sample_record(id: i64) -> StatusRecord {
    StatusRecord {
        id,
        created_at: "Tue Aug 04 09:15:02 +0000 2026".to_string(),
        text: "Lorem ipsum dolor".to_string(),
        author_id: id * 7,
    }
}

/// Publisher that records everything it is handed.
#[derive(Default)]
struct RecordingPublisher {
    records: Mutex<Vec<StatusRecord>>,
    keys: Mutex<Vec<Option<i64>>>,
}

impl RecordingPublisher {
    fn records(&self) -> Vec<StatusRecord> {
        self.records.lock().unwrap().clone()
    }

    fn keys(&self) -> Vec<Option<i64>> {
        self.keys.lock().unwrap().clone()
    }
}

impl StatusPublisher for RecordingPublisher {
    fn publish(&self, key: Option<i64>, record: &StatusRecord) -> firehose::Result<DeliveryHandle> {
        self.keys.lock().unwrap().push(key);
        self.records.lock().unwrap().push(record.clone());
        Ok(DeliveryHandle::ready(Ok(DeliveryMetadata {
            topic: "statuses".to_string(),
            partition: 0,
            offset: self.records.lock().unwrap().len() as i64 - 1,
            timestamp_ms: 0,
        })))
    }
}

async fn collect_mock_statuses(config: MockStreamConfig, want: usize) -> Arc<RecordingPublisher> {
    let publisher = Arc::new(RecordingPublisher::default());
    let listener = Arc::new(StatusListener::new(publisher.clone() as Arc<dyn StatusPublisher>));
    let (handle, token) = shutdown_channel();

    let mut source = create_stream_source(FeedSelection::Mock(config), listener, token).unwrap();
    let task = tokio::spawn(async move { source.run().await });

    timeout(Duration::from_secs(5), async {
        while publisher.records().len() < want {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("mock stream produced too few statuses");

    handle.shutdown();
    timeout(Duration::from_secs(1), task)
        .await
        .expect("mock stream ignored shutdown")
        .unwrap()
        .unwrap();

    publisher
}

#[tokio::test]
async fn mock_stream_injects_keyword_into_fixed_length_statuses() {
    let config = MockStreamConfig::new(vec!["chatgpt".to_string()], 5, 5, Duration::ZERO);
    let publisher = collect_mock_statuses(config, 20).await;

    let records = publisher.records();
    assert!(records.len() >= 20);
    for record in &records {
        let words: Vec<&str> = record.text.split_whitespace().collect();
        assert_eq!(words.len(), 6, "expected 6 words in '{}'", record.text);
        assert!(words.contains(&"chatgpt"), "no keyword in '{}'", record.text);
    }
}

#[tokio::test]
async fn mock_stream_keys_every_status_by_author() {
    let config = MockStreamConfig::new(vec!["rust".to_string()], 2, 4, Duration::ZERO);
    let publisher = collect_mock_statuses(config, 10).await;

    let records = publisher.records();
    let keys = publisher.keys();
    for (record, key) in records.iter().zip(&keys) {
        assert_eq!(*key, Some(record.author_id));
        assert!(record.author_id >= 0);
        assert!(record.id >= 0);
        firehose_messages::parse_created_at(&record.created_at).unwrap();
    }
}

#[tokio::test]
async fn live_stream_preserves_order_and_skips_malformed_payloads() {
    let publisher = Arc::new(RecordingPublisher::default());
    let listener = Arc::new(StatusListener::new(publisher.clone() as Arc<dyn StatusPublisher>));
    let (_handle, token) = shutdown_channel();
    let (feed, events) = mpsc::channel(8);

    let mut source = create_stream_source(FeedSelection::Live { events }, listener, token).unwrap();
    let task = tokio::spawn(async move { source.run().await });

    for id in [1i64, 2, 3] {
        let payload = format!(
            r#"{{"created_at":"Tue Aug 04 09:15:02 +0000 2026","id":"{}","text":"status {}","user":{{"id":"{}"}}}}"#,
            id,
            id,
            id * 10,
        );
        feed.send(payload).await.unwrap();
    }
    feed.send("{broken".to_string()).await.unwrap();
    drop(feed);

    timeout(Duration::from_secs(1), task)
        .await
        .expect("live stream did not stop on channel close")
        .unwrap()
        .unwrap();

    let ids: Vec<i64> = publisher.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(publisher.keys(), vec![Some(10), Some(20), Some(30)]);
}

#[tokio::test]
async fn factory_rejects_invalid_mock_configuration() {
    let publisher = Arc::new(RecordingPublisher::default());
    let listener = Arc::new(StatusListener::new(publisher as Arc<dyn StatusPublisher>));
    let (_handle, token) = shutdown_channel();

    let config = MockStreamConfig::new(vec![], 1, 2, Duration::ZERO);
    let err = create_stream_source(FeedSelection::Mock(config), listener, token).unwrap_err();
    assert!(matches!(err, FeedError::Config(_)));
}

#[tokio::test]
async fn failed_send_resolves_once_with_topic_and_no_metadata() {
    let producer = failing_producer("t");
    let handle = producer.send("t", Some(42), &sample_record(1)).unwrap();

    let result = timeout(Duration::from_secs(10), handle.wait())
        .await
        .expect("delivery result never arrived");

    match result {
        Err(FeedError::Delivery { topic, .. }) => assert_eq!(topic, "t"),
        other => panic!("expected a delivery failure, got {:?}", other.map(|m| m.topic)),
    }
}

#[tokio::test]
async fn every_send_gets_exactly_one_terminal_result() {
    let producer = failing_producer("statuses");

    let mut handles = Vec::with_capacity(1000);
    for i in 0..1000 {
        handles.push(producer.send("statuses", Some(i), &sample_record(i)).unwrap());
    }

    let mut terminal = 0usize;
    for handle in handles {
        let result = timeout(Duration::from_secs(30), handle.wait())
            .await
            .expect("a send never reached a terminal result");
        assert!(result.is_err());
        terminal += 1;
    }
    assert_eq!(terminal, 1000);
}

#[tokio::test]
async fn close_is_idempotent_and_rejects_later_sends() {
    let producer = failing_producer("statuses");

    producer.close(Duration::from_millis(100)).unwrap();
    producer.close(Duration::from_millis(100)).unwrap();
    assert!(producer.is_closed());

    let err = producer.send("statuses", None, &sample_record(1)).unwrap_err();
    assert!(matches!(err, FeedError::ProducerClosed));
}

#[tokio::test]
async fn close_is_safe_without_any_sends() {
    let config = ProducerConfig::new(UNREACHABLE_BROKER, "statuses");
    let producer = KafkaStatusProducer::new(&config).unwrap();
    producer.close(Duration::from_millis(100)).unwrap();
}

#[tokio::test]
async fn orchestrator_walks_the_lifecycle() {
    let producer_config = ProducerConfig::new(UNREACHABLE_BROKER, "statuses")
        .with_message_timeout(Duration::from_millis(300));
    let stream_config =
        MockStreamConfig::new(vec!["rust".to_string()], 3, 6, Duration::from_millis(5));

    let mut orchestrator = Orchestrator::new(&producer_config).unwrap();
    assert_eq!(orchestrator.state(), OrchestratorState::Init);

    orchestrator.start(FeedSelection::Mock(stream_config.clone())).unwrap();
    assert_eq!(orchestrator.state(), OrchestratorState::Running);

    let err = orchestrator.start(FeedSelection::Mock(stream_config)).unwrap_err();
    assert!(matches!(err, FeedError::Config(_)));

    tokio::time::sleep(Duration::from_millis(50)).await;

    timeout(Duration::from_secs(5), orchestrator.shutdown(Duration::from_millis(500)))
        .await
        .expect("shutdown hung")
        .unwrap();
    assert_eq!(orchestrator.state(), OrchestratorState::Stopped);

    // A second shutdown is a no-op.
    orchestrator.shutdown(Duration::from_millis(100)).await.unwrap();

    let err = orchestrator
        .producer()
        .send("statuses", None, &sample_record(1))
        .unwrap_err();
    assert!(matches!(err, FeedError::ProducerClosed));
}

#[tokio::test]
async fn orchestrator_shutdown_from_init_closes_the_producer() {
    let producer_config = ProducerConfig::new(UNREACHABLE_BROKER, "statuses");
    let mut orchestrator = Orchestrator::new(&producer_config).unwrap();

    orchestrator.shutdown(Duration::from_millis(100)).await.unwrap();
    assert_eq!(orchestrator.state(), OrchestratorState::Stopped);
    assert!(orchestrator.producer().is_closed());
}
