//! Configuration management for bablwatch
//!
//! This module holds the watch configuration assembled from the command
//! line, the notifier settings with their production defaults, and the
//! cluster tag derivation used to label outgoing alerts.

use serde::{Deserialize, Serialize};

use crate::error::BablwatchError;

/// Topic carrying raw journald log events.
pub const TOPIC_EVENTS: &str = "logs.raw";

/// Group and client identity used when connecting to Kafka.
pub const CLIENT_NAME: &str = "babl-errors";

/// Watch configuration
///
/// Everything the watcher needs to tail the journal log topic and
/// dispatch alerts: the broker list, the topic/partition to tail, and
/// the notifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Kafka broker addresses (comma-separated)
    pub brokers: String,

    /// Topic to tail
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Partition to tail
    #[serde(default)]
    pub partition: i32,

    /// Notifier settings
    #[serde(default)]
    pub notifier: NotifierConfig,
}

fn default_topic() -> String {
    TOPIC_EVENTS.to_string()
}

impl WatchConfig {
    /// Creates a watch configuration for the given broker list with
    /// default topic, partition, and notifier settings.
    ///
    /// # Arguments
    ///
    /// * `brokers` - Comma-separated list of Kafka broker addresses
    ///
    /// # Example
    ///
    /// ```rust
    /// use bablwatch::config::WatchConfig;
    ///
    /// let config = WatchConfig::new("kafka1.prod:9092,kafka2.prod:9092");
    /// assert_eq!(config.topic, "logs.raw");
    /// assert_eq!(config.partition, 0);
    /// ```
    pub fn new(brokers: &str) -> Self {
        Self {
            brokers: brokers.to_string(),
            topic: default_topic(),
            partition: 0,
            notifier: NotifierConfig::default(),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `BablwatchError::Config` if the broker list is empty.
    pub fn validate(&self) -> Result<(), BablwatchError> {
        if self.brokers.trim().is_empty() {
            return Err(BablwatchError::Config(
                "broker list must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the cluster tag derived from the broker list.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bablwatch::config::WatchConfig;
    ///
    /// let config = WatchConfig::new("kafka1.prod.example.com:9092");
    /// assert_eq!(config.cluster_tag(), "kafka1");
    /// ```
    pub fn cluster_tag(&self) -> String {
        cluster_tag(&self.brokers).to_string()
    }
}

/// Notifier settings for the babl events integration.
///
/// The defaults match the production deployment; every field can be
/// overridden, which the tests use to point the sink at local commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Path of the notifier command
    #[serde(default = "default_command")]
    pub command: String,

    /// Endpoint the notifier command connects to
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Module the notifier command invokes
    #[serde(default = "default_module")]
    pub module: String,

    /// Event tag passed to the invoked module
    #[serde(default = "default_event_tag")]
    pub event_tag: String,
}

fn default_command() -> String {
    "/bin/babl".to_string()
}

fn default_endpoint() -> String {
    "sandbox.babl.sh:4445".to_string()
}

fn default_module() -> String {
    "babl/events".to_string()
}

fn default_event_tag() -> String {
    "EVENT=babl:error".to_string()
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            endpoint: default_endpoint(),
            module: default_module(),
            event_tag: default_event_tag(),
        }
    }
}

/// Derives the cluster tag from a comma-separated broker list.
///
/// The tag is the first broker's hostname truncated at the first `.`;
/// when the hostname carries no `.`, the hostname is used as-is with
/// any `:port` suffix removed.
///
/// # Example
///
/// ```rust
/// use bablwatch::config::cluster_tag;
///
/// assert_eq!(cluster_tag("kafka1.prod.example.com:9092,kafka2.prod.example.com:9092"), "kafka1");
/// assert_eq!(cluster_tag("localhost:9092"), "localhost");
/// ```
pub fn cluster_tag(brokers: &str) -> &str {
    let first = brokers.split(',').next().unwrap_or_default();
    match first.find('.') {
        Some(index) => &first[..index],
        None => first.split(':').next().unwrap_or(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_config_defaults() {
        let config = WatchConfig::new("localhost:9092");

        assert_eq!(config.brokers, "localhost:9092");
        assert_eq!(config.topic, TOPIC_EVENTS);
        assert_eq!(config.partition, 0);
        assert_eq!(config.notifier.command, "/bin/babl");
    }

    #[test]
    fn test_watch_config_validate_ok() {
        let config = WatchConfig::new("localhost:9092");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_watch_config_validate_empty_brokers() {
        let config = WatchConfig::new("  ");
        let result = config.validate();
        assert!(matches!(result, Err(BablwatchError::Config(_))));
    }

    #[test]
    fn test_notifier_config_defaults() {
        let config = NotifierConfig::default();

        assert_eq!(config.command, "/bin/babl");
        assert_eq!(config.endpoint, "sandbox.babl.sh:4445");
        assert_eq!(config.module, "babl/events");
        assert_eq!(config.event_tag, "EVENT=babl:error");
    }

    #[test]
    fn test_cluster_tag_from_qualified_hostname() {
        assert_eq!(cluster_tag("kafka1.prod.example.com:9092"), "kafka1");
    }

    #[test]
    fn test_cluster_tag_uses_first_broker() {
        assert_eq!(
            cluster_tag("staging.example.com:9092,other.example.com:9092"),
            "staging"
        );
    }

    #[test]
    fn test_cluster_tag_without_domain_strips_port() {
        assert_eq!(cluster_tag("localhost:9092"), "localhost");
    }

    #[test]
    fn test_cluster_tag_bare_hostname() {
        assert_eq!(cluster_tag("kafka"), "kafka");
    }

    #[test]
    fn test_cluster_tag_empty_input() {
        assert_eq!(cluster_tag(""), "");
    }

    #[test]
    fn test_watch_config_deserializes_with_defaults() {
        let json = r#"{"brokers": "kafka1.prod:9092"}"#;
        let config: WatchConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.brokers, "kafka1.prod:9092");
        assert_eq!(config.topic, TOPIC_EVENTS);
        assert_eq!(config.partition, 0);
        assert_eq!(config.notifier.event_tag, "EVENT=babl:error");
    }
}
