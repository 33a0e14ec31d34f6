//! Journal log consumer module
//!
//! This module provides everything needed to tail the journal log topic:
//!
//! - **Kafka Consumer**: connects to the broker list and streams records
//!   from a single topic/partition, starting at the newest offset
//! - **Journal Record**: the journald export envelope with its embedded
//!   message decoding (string or byte-array form)
//! - **Record Handler**: trait invoked for each record in arrival order
//!
//! # Example
//!
//! ```rust,no_run
//! use bablwatch::consumer::{JournalConsumer, KafkaConsumerConfig, RecordHandler};
//!
//! struct PrintHandler;
//!
//! #[async_trait::async_trait]
//! impl RecordHandler for PrintHandler {
//!     async fn handle(
//!         &self,
//!         offset: i64,
//!         payload: &[u8],
//!     ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!         println!("record at offset {}: {} bytes", offset, payload.len());
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = KafkaConsumerConfig::new("localhost:9092");
//!     let consumer = JournalConsumer::new(&config)?;
//!     consumer.assign_latest()?;
//!     consumer.run(&PrintHandler).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod kafka;
pub mod record;

pub use config::KafkaConsumerConfig;
pub use kafka::{ConsumerError, JournalConsumer, RecordHandler};
pub use record::{DecodeError, EmbeddedMessage, JournalRecord};
