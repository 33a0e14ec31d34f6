//! Alert delivery.
//!
//! This module defines the alert sink capability and its production
//! implementation. Delivery is fire-and-forget: the caller logs every
//! alert before handing it to the sink, and a failed delivery is reported
//! to the caller but never retried.
//!
//! # Example
//!
//! ```rust,no_run
//! use bablwatch::classify::Alert;
//! use bablwatch::config::NotifierConfig;
//! use bablwatch::notify::{AlertSink, BablEventsSink};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sink = BablEventsSink::new(NotifierConfig::default());
//!     let alert = Alert {
//!         cluster: "prod".to_string(),
//!         message: "[prod] mailer --> MODULE_RESPONSE_TIMEOUT".to_string(),
//!     };
//!     if let Err(e) = sink.deliver(&alert).await {
//!         eprintln!("delivery failed: {}", e);
//!     }
//! }
//! ```

pub mod babl;

pub use babl::BablEventsSink;

use thiserror::Error;

use crate::classify::Alert;

/// Errors that can occur while delivering an alert.
///
/// Delivery failures are always recoverable from the pipeline's point of
/// view: they are logged as warnings and processing continues.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The notifier command could not be launched or written to.
    #[error("notifier I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The notifier command ran but exited unsuccessfully.
    #[error("notifier command exited with {status}")]
    CommandFailed {
        /// Exit status reported by the command.
        status: std::process::ExitStatus,
    },

    /// The notifier command's stdin handle was not captured.
    #[error("notifier command stdin was not captured")]
    StdinUnavailable,
}

/// Capability for delivering alerts to an external channel.
///
/// Implementations accept a cluster-tagged alert and report success or
/// failure; the concrete delivery mechanism (process exec, HTTP call,
/// message publish) is swappable without touching classification logic.
#[async_trait::async_trait]
pub trait AlertSink: Send + Sync {
    /// Delivers an alert.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` when delivery fails; the caller treats this
    /// as non-fatal.
    async fn deliver(&self, alert: &Alert) -> Result<(), NotifyError>;
}
