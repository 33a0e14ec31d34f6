//! Kafka consumer configuration for the journal log topic.
//!
//! This module provides the configuration struct for connecting to Kafka
//! and the translation into librdkafka settings.
//!
//! # Example
//!
//! ```rust
//! use bablwatch::consumer::KafkaConsumerConfig;
//!
//! // Create configuration with defaults
//! let config = KafkaConsumerConfig::new("localhost:9092");
//! assert_eq!(config.topic, "logs.raw");
//!
//! // Or tail a different topic/partition
//! let config = KafkaConsumerConfig::new("localhost:9092")
//!     .with_topic("logs.staging")
//!     .with_partition(2);
//! ```

use std::time::Duration;

use crate::config::{CLIENT_NAME, TOPIC_EVENTS};

/// Kafka consumer configuration.
///
/// Configuration for tailing a single topic/partition as the journal log
/// consumer. The group and client identity default to the service name
/// used by the production deployment.
///
/// # Example
///
/// ```rust
/// use bablwatch::consumer::KafkaConsumerConfig;
///
/// let config = KafkaConsumerConfig::new("localhost:9092").with_group_id("custom-group");
/// assert_eq!(config.group_id, "custom-group");
/// ```
#[derive(Debug, Clone)]
pub struct KafkaConsumerConfig {
    /// Kafka broker addresses (comma-separated).
    pub brokers: String,

    /// Topic to consume from.
    pub topic: String,

    /// Partition to consume from.
    pub partition: i32,

    /// Consumer group ID.
    pub group_id: String,

    /// Session timeout duration.
    pub session_timeout: Duration,
}

impl KafkaConsumerConfig {
    /// Creates a new configuration with the journal log defaults.
    ///
    /// # Arguments
    ///
    /// * `brokers` - Comma-separated list of Kafka broker addresses
    ///
    /// # Example
    ///
    /// ```rust
    /// use bablwatch::consumer::KafkaConsumerConfig;
    ///
    /// let config = KafkaConsumerConfig::new("localhost:9092");
    /// assert_eq!(config.group_id, "babl-errors");
    /// assert_eq!(config.partition, 0);
    /// ```
    pub fn new(brokers: &str) -> Self {
        Self {
            brokers: brokers.to_string(),
            topic: TOPIC_EVENTS.to_string(),
            partition: 0,
            group_id: CLIENT_NAME.to_string(),
            session_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the topic to consume from.
    pub fn with_topic(mut self, topic: &str) -> Self {
        self.topic = topic.to_string();
        self
    }

    /// Sets the partition to consume from.
    pub fn with_partition(mut self, partition: i32) -> Self {
        self.partition = partition;
        self
    }

    /// Sets a custom consumer group ID.
    pub fn with_group_id(mut self, group_id: &str) -> Self {
        self.group_id = group_id.to_string();
        self
    }

    /// Returns the librdkafka settings for this configuration.
    ///
    /// The offset reset policy is pinned to `latest`: the watcher only
    /// ever reports events that happen after startup, never history.
    pub fn settings(&self) -> Vec<(String, String)> {
        vec![
            ("bootstrap.servers".to_string(), self.brokers.clone()),
            ("group.id".to_string(), self.group_id.clone()),
            ("client.id".to_string(), self.group_id.clone()),
            ("enable.auto.commit".to_string(), "true".to_string()),
            ("auto.offset.reset".to_string(), "latest".to_string()),
            (
                "session.timeout.ms".to_string(),
                self.session_timeout.as_millis().to_string(),
            ),
        ]
    }
}
