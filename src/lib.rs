//! Bablwatch - Kafka journal log watcher library
//!
//! This library provides the core functionality for the bablwatch service,
//! which tails a journald log topic on Kafka, extracts failure conditions
//! from embedded application-log payloads, and dispatches alerts to the
//! babl events integration.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `consumer`: Kafka consumer, journal record envelope, and decoding
//! - `classify`: Event classification rules and alert formatting
//! - `notify`: Alert sink abstraction and the babl events implementation
//! - `watcher`: Pipeline wiring consumer, classifier, and sink together
//! - `config`: Watch configuration and cluster tag derivation
//! - `error`: Error types and result alias
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bablwatch::config::WatchConfig;
//! use bablwatch::notify::BablEventsSink;
//! use bablwatch::watcher::Watcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = WatchConfig::new("kafka1.prod.example.com:9092");
//!     let sink = Arc::new(BablEventsSink::new(config.notifier.clone()));
//!     let watcher = Watcher::new(config, sink)?;
//!     watcher.run().await?;
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod consumer;
pub mod error;
pub mod notify;
pub mod watcher;

// Re-export commonly used types
pub use classify::{Alert, AlertPatterns, EventClassifier, EventPayload};
pub use config::{NotifierConfig, WatchConfig};
pub use consumer::{JournalConsumer, JournalRecord, KafkaConsumerConfig, RecordHandler};
pub use error::{BablwatchError, Result};
pub use notify::{AlertSink, BablEventsSink, NotifyError};
pub use watcher::{EventPipeline, Watcher};
