//! Error types for bablwatch
//!
//! This module defines the application-level error type, using `thiserror`
//! for ergonomic error handling. Fatal pipeline conditions (transport
//! failures, malformed envelopes) surface through these types and terminate
//! the process; recoverable conditions never reach them.

use thiserror::Error;

use crate::consumer::ConsumerError;

/// Main error type for bablwatch operations
///
/// This enum encompasses all errors that can abort the watch pipeline:
/// configuration problems, consumer/transport failures, and pattern
/// compilation failures at startup.
#[derive(Error, Debug)]
pub enum BablwatchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Kafka consumer errors (connection, offset lookup, record processing)
    #[error("Consumer error: {0}")]
    Consumer(#[from] ConsumerError),

    /// Alert pattern compilation errors
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type alias for bablwatch operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
