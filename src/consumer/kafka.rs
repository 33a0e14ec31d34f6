//! Kafka consumer for the journal log topic.
//!
//! This module provides the consumer that tails a single topic/partition
//! starting at the newest available offset and feeds every record to a
//! [`RecordHandler`] in arrival order, one at a time.
//!
//! # Example
//!
//! ```rust,no_run
//! use bablwatch::consumer::{JournalConsumer, KafkaConsumerConfig, RecordHandler};
//!
//! struct CountingHandler;
//!
//! #[async_trait::async_trait]
//! impl RecordHandler for CountingHandler {
//!     async fn handle(
//!         &self,
//!         offset: i64,
//!         _payload: &[u8],
//!     ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!         println!("offset {}", offset);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = KafkaConsumerConfig::new("localhost:9092");
//!     let consumer = JournalConsumer::new(&config)?;
//!     consumer.assign_latest()?;
//!     consumer.run(&CountingHandler).await?;
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::message::Message;
use rdkafka::topic_partition_list::{Offset, TopicPartitionList};
use thiserror::Error;
use tracing::{debug, info};

use super::config::KafkaConsumerConfig;

/// Timeout for the watermark lookup performed at startup.
const WATERMARK_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur during consumer operations.
///
/// All of these are fatal: the watcher cannot trust its pipeline state
/// after a transport or record failure and terminates instead of risking
/// silently dropped events.
#[derive(Error, Debug)]
pub enum ConsumerError {
    /// Error from the Kafka client.
    #[error("Kafka error: {0}")]
    Kafka(#[from] KafkaError),

    /// Offset lookup or partition assignment failed.
    #[error("Subscription error: {0}")]
    Subscription(String),

    /// A record could not be processed.
    #[error("Record error at offset {offset}: {source}")]
    Record {
        /// Offset of the failing record.
        offset: i64,
        /// Underlying handler failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Handler trait for processing journal records.
///
/// Implement this trait to define how raw records should be processed.
/// The handler is called once per record, in arrival order; returning
/// `Err` aborts the consumer loop.
#[async_trait::async_trait]
pub trait RecordHandler: Send + Sync {
    /// Process a raw record delivered by the transport.
    ///
    /// Return `Ok(())` once the record has been handled (including the
    /// case where it carried nothing classifiable). Return `Err` only for
    /// conditions that must stop the watcher.
    async fn handle(
        &self,
        offset: i64,
        payload: &[u8],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Journal log Kafka consumer.
///
/// Tails a single topic/partition. The consumer is assigned directly to
/// the partition at its high watermark, so only records produced after
/// startup are observed; there is no replay of history.
pub struct JournalConsumer {
    consumer: StreamConsumer,
    topic: String,
    partition: i32,
}

impl JournalConsumer {
    /// Creates a new consumer from configuration.
    ///
    /// Creating the client does not connect yet; the connection is
    /// established on the first broker operation.
    ///
    /// # Arguments
    ///
    /// * `config` - Kafka consumer configuration
    ///
    /// # Errors
    ///
    /// Returns `ConsumerError::Kafka` if the client cannot be created.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bablwatch::consumer::{JournalConsumer, KafkaConsumerConfig};
    ///
    /// let config = KafkaConsumerConfig::new("localhost:9092");
    /// let consumer = JournalConsumer::new(&config).unwrap();
    /// ```
    pub fn new(config: &KafkaConsumerConfig) -> Result<Self, ConsumerError> {
        info!(
            brokers = %config.brokers,
            topic = %config.topic,
            partition = config.partition,
            group_id = %config.group_id,
            "Creating journal consumer"
        );

        let mut client_config = ClientConfig::new();
        for (key, value) in config.settings() {
            client_config.set(key, value);
        }
        let consumer: StreamConsumer = client_config.create()?;

        Ok(Self {
            consumer,
            topic: config.topic.clone(),
            partition: config.partition,
        })
    }

    /// Returns the topic this consumer tails.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns the partition this consumer tails.
    pub fn partition(&self) -> i32 {
        self.partition
    }

    /// Assigns the consumer to the partition at its current high watermark.
    ///
    /// # Returns
    ///
    /// The offset the consumer will start reading from.
    ///
    /// # Errors
    ///
    /// Returns `ConsumerError::Kafka` if the watermark lookup fails and
    /// `ConsumerError::Subscription` if the partition assignment fails.
    pub fn assign_latest(&self) -> Result<i64, ConsumerError> {
        let (low, high) =
            self.consumer
                .fetch_watermarks(&self.topic, self.partition, WATERMARK_TIMEOUT)?;

        debug!(
            topic = %self.topic,
            partition = self.partition,
            low,
            high,
            "Fetched partition watermarks"
        );

        let mut assignment = TopicPartitionList::new();
        assignment
            .add_partition_offset(&self.topic, self.partition, Offset::Offset(high))
            .map_err(|e| self.subscription_error(e))?;
        self.consumer
            .assign(&assignment)
            .map_err(|e| self.subscription_error(e))?;

        Ok(high)
    }

    fn subscription_error(&self, error: KafkaError) -> ConsumerError {
        ConsumerError::Subscription(format!("{}/{}: {}", self.topic, self.partition, error))
    }

    /// Runs the consumer with the given record handler.
    ///
    /// Blocks until the transport errors or the handler fails; records are
    /// processed strictly one at a time, in arrival order. Waiting for the
    /// next record is the loop's only suspension point and has no timeout.
    ///
    /// # Arguments
    ///
    /// * `handler` - Handler invoked for each record
    ///
    /// # Errors
    ///
    /// Returns `ConsumerError::Kafka` on transport failure and
    /// `ConsumerError::Record` when the handler rejects a record.
    pub async fn run<H: RecordHandler>(&self, handler: &H) -> Result<(), ConsumerError> {
        loop {
            let message = self.consumer.recv().await?;
            let offset = message.offset();
            let payload = message.payload().unwrap_or_default();

            debug!(offset, bytes = payload.len(), "Received journal record");

            handler
                .handle(offset, payload)
                .await
                .map_err(|source| ConsumerError::Record { offset, source })?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_consumer_new() {
        let config = KafkaConsumerConfig::new("localhost:9092")
            .with_topic("logs.test")
            .with_partition(1);
        let consumer = JournalConsumer::new(&config).unwrap();

        assert_eq!(consumer.topic(), "logs.test");
        assert_eq!(consumer.partition(), 1);
    }

    #[test]
    fn test_consumer_error_display() {
        let error = ConsumerError::Subscription("logs.raw/0: boom".to_string());
        assert_eq!(error.to_string(), "Subscription error: logs.raw/0: boom");

        let error = ConsumerError::Record {
            offset: 42,
            source: "bad record".into(),
        };
        assert_eq!(error.to_string(), "Record error at offset 42: bad record");
    }

    #[test]
    fn test_consumer_error_is_error_trait() {
        let error = ConsumerError::Subscription("test".to_string());
        let _: &dyn std::error::Error = &error;
    }
}
