//! Watcher service tying the pipeline together.
//!
//! This module wires the three pipeline stages: the Kafka consumer reads
//! raw records, the pipeline decodes each record and classifies its
//! payload, and matching events are dispatched to the alert sink. Records
//! are processed strictly one at a time; nothing outlives a single
//! iteration.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::classify::{Alert, AlertPatterns, EventClassifier, EventPayload};
use crate::config::WatchConfig;
use crate::consumer::{JournalConsumer, JournalRecord, KafkaConsumerConfig, RecordHandler};
use crate::error::BablwatchError;
use crate::notify::AlertSink;

/// Record pipeline: decode, classify, dispatch.
///
/// Implements [`RecordHandler`] so the consumer can drive it directly.
/// Decode failures propagate out and stop the watcher; an embedded
/// message that is not an event payload is skipped silently, and a failed
/// delivery is logged and ignored.
pub struct EventPipeline {
    classifier: EventClassifier,
    sink: Arc<dyn AlertSink>,
}

impl EventPipeline {
    /// Creates a pipeline from a classifier and an alert sink.
    pub fn new(classifier: EventClassifier, sink: Arc<dyn AlertSink>) -> Self {
        Self { classifier, sink }
    }

    /// Processes one raw record.
    ///
    /// # Returns
    ///
    /// The number of alerts dispatched for this record.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` when the envelope or its embedded message
    /// cannot be decoded; both are fatal to the watcher.
    pub async fn process(
        &self,
        offset: i64,
        raw: &[u8],
    ) -> Result<usize, crate::consumer::DecodeError> {
        let record = JournalRecord::from_bytes(raw)?;
        let message = record.message_text()?;

        let Some(payload) = EventPayload::parse(&message) else {
            debug!(offset, "Embedded message carries no event payload, skipping");
            return Ok(0);
        };

        let alerts = self.classifier.classify(&payload, &record.container_name);
        for alert in &alerts {
            self.dispatch(alert).await;
        }

        Ok(alerts.len())
    }

    /// Logs and delivers one alert.
    ///
    /// The alert is logged before the delivery attempt so classification
    /// activity stays observable even when the sink is unreachable.
    async fn dispatch(&self, alert: &Alert) {
        info!(cluster = %alert.cluster, message = %alert.message, "Module Error Event");

        if let Err(error) = self.sink.deliver(alert).await {
            warn!(error = %error, "Alert delivery failed");
        }
    }
}

#[async_trait::async_trait]
impl RecordHandler for EventPipeline {
    async fn handle(
        &self,
        offset: i64,
        payload: &[u8],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.process(offset, payload).await?;
        Ok(())
    }
}

/// Journal log watcher service.
///
/// Owns the consumer and the pipeline; [`Watcher::run`] tails the topic
/// from its newest offset until the transport ends or a fatal error
/// surfaces.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use bablwatch::config::WatchConfig;
/// use bablwatch::notify::BablEventsSink;
/// use bablwatch::watcher::Watcher;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = WatchConfig::new("kafka1.prod:9092");
/// let sink = Arc::new(BablEventsSink::new(config.notifier.clone()));
/// let watcher = Watcher::new(config, sink)?;
/// watcher.run().await?;
/// # Ok(())
/// # }
/// ```
pub struct Watcher {
    config: WatchConfig,
    consumer: JournalConsumer,
    pipeline: EventPipeline,
}

impl Watcher {
    /// Creates a watcher from configuration and an alert sink.
    ///
    /// Compiles the classifier patterns once, derives the cluster tag
    /// from the broker list, and creates the Kafka consumer.
    ///
    /// # Errors
    ///
    /// Returns `BablwatchError::Config` if the configuration is invalid,
    /// `BablwatchError::Pattern` if pattern compilation fails, and
    /// `BablwatchError::Consumer` if the consumer cannot be created.
    pub fn new(config: WatchConfig, sink: Arc<dyn AlertSink>) -> Result<Self, BablwatchError> {
        config.validate()?;

        let cluster = config.cluster_tag();
        info!(cluster = %cluster, brokers = %config.brokers, "Configuring journal watcher");

        let patterns = Arc::new(AlertPatterns::compile()?);
        let classifier = EventClassifier::new(cluster, patterns);

        let consumer_config = KafkaConsumerConfig::new(&config.brokers)
            .with_topic(&config.topic)
            .with_partition(config.partition);
        let consumer = JournalConsumer::new(&consumer_config)?;

        Ok(Self {
            config,
            consumer,
            pipeline: EventPipeline::new(classifier, sink),
        })
    }

    /// Runs the watcher until the transport ends or a fatal error occurs.
    ///
    /// # Errors
    ///
    /// Returns `BablwatchError::Consumer` on transport failure and on the
    /// first record that cannot be decoded.
    pub async fn run(&self) -> Result<(), BablwatchError> {
        let offset = self.consumer.assign_latest()?;
        info!(
            topic = %self.config.topic,
            partition = self.config.partition,
            offset,
            "Tailing journal events from newest offset"
        );

        self.consumer.run(&self.pipeline).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotifyError;
    use tokio::sync::Mutex;

    /// Sink that records every delivered alert.
    struct RecordingSink {
        delivered: Mutex<Vec<Alert>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                delivered: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl AlertSink for RecordingSink {
        async fn deliver(&self, alert: &Alert) -> Result<(), NotifyError> {
            self.delivered.lock().await.push(alert.clone());
            Ok(())
        }
    }

    /// Sink that rejects every delivery.
    struct FailingSink;

    #[async_trait::async_trait]
    impl AlertSink for FailingSink {
        async fn deliver(&self, _alert: &Alert) -> Result<(), NotifyError> {
            Err(NotifyError::StdinUnavailable)
        }
    }

    fn pipeline(cluster: &str, sink: Arc<dyn AlertSink>) -> EventPipeline {
        let patterns = Arc::new(AlertPatterns::compile().unwrap());
        EventPipeline::new(EventClassifier::new(cluster, patterns), sink)
    }

    #[tokio::test]
    async fn test_pipeline_dispatches_timeout_alert() {
        let sink = Arc::new(RecordingSink::new());
        let pipeline = pipeline("prod", sink.clone());

        let raw = br#"{"CONTAINER_NAME":"svc.1","MESSAGE":"{\"code\":\"completed\",\"status\":\"MODULE_RESPONSE_TIMEOUT\",\"module\":\"mailer\"}"}"#;
        let dispatched = pipeline.process(0, raw).await.unwrap();

        assert_eq!(dispatched, 1);
        let delivered = sink.delivered.lock().await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].cluster, "prod");
        assert_eq!(
            delivered[0].message,
            "[prod] mailer --> MODULE_RESPONSE_TIMEOUT"
        );
    }

    #[tokio::test]
    async fn test_pipeline_skips_plain_log_lines() {
        let sink = Arc::new(RecordingSink::new());
        let pipeline = pipeline("prod", sink.clone());

        let raw = br#"{"CONTAINER_NAME":"svc.1","MESSAGE":"GET /healthz 200"}"#;
        let dispatched = pipeline.process(7, raw).await.unwrap();

        assert_eq!(dispatched, 0);
        assert!(sink.delivered.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_skips_successful_executions() {
        let sink = Arc::new(RecordingSink::new());
        let pipeline = pipeline("prod", sink.clone());

        let raw = br#"{"CONTAINER_NAME":"svc.1","MESSAGE":"{\"code\":\"req-executed\",\"status\":\"SUCCESS\"}"}"#;
        let dispatched = pipeline.process(0, raw).await.unwrap();

        assert_eq!(dispatched, 0);
        assert!(sink.delivered.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_rejects_malformed_envelope() {
        let sink = Arc::new(RecordingSink::new());
        let pipeline = pipeline("prod", sink);

        let result = pipeline.process(0, b"not json").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_pipeline_survives_failed_delivery() {
        let pipeline = pipeline("prod", Arc::new(FailingSink));

        let raw = br#"{"CONTAINER_NAME":"svc.1","MESSAGE":"{\"code\":\"req-execution-canceled\",\"status\":\"CANCELED\"}"}"#;
        let dispatched = pipeline.process(0, raw).await.unwrap();

        // The alert was still produced; only delivery failed.
        assert_eq!(dispatched, 1);
    }

    #[tokio::test]
    async fn test_pipeline_handles_byte_array_message() {
        let sink = Arc::new(RecordingSink::new());
        let pipeline = pipeline("prod", sink.clone());

        let message = r#"{"code":"req-executed","status":"ERROR","stderr":"babl::moduleerror: x"}"#;
        let bytes = message
            .as_bytes()
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let raw = format!(
            r#"{{"CONTAINER_NAME":"app.worker.3","MESSAGE":[{}]}}"#,
            bytes
        );

        let dispatched = pipeline.process(0, raw.as_bytes()).await.unwrap();

        assert_eq!(dispatched, 1);
        let delivered = sink.delivered.lock().await;
        assert_eq!(
            delivered[0].message,
            "[prod] app.worker --> ERROR: Babl::ModuleError"
        );
    }

    #[test]
    fn test_watcher_rejects_empty_brokers() {
        let config = WatchConfig::new("");
        let result = Watcher::new(config, Arc::new(FailingSink));
        assert!(matches!(result, Err(BablwatchError::Config(_))));
    }

    #[tokio::test]
    async fn test_watcher_creation_with_valid_config() {
        let config = WatchConfig::new("localhost:9092");
        let result = Watcher::new(config, Arc::new(FailingSink));
        assert!(result.is_ok());
    }
}
