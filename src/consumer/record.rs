//! Journal record envelope and embedded message decoding.
//!
//! This module provides the Rust structs to deserialize the journald
//! export records delivered on the journal log topic, including the
//! embedded `MESSAGE` field that arrives in one of two encodings.
//!
//! # Example
//!
//! ```rust
//! use bablwatch::consumer::JournalRecord;
//!
//! let json = r#"{
//!   "_HOSTNAME": "node-1",
//!   "_SYSTEMD_UNIT": "docker.service",
//!   "SYSLOG_IDENTIFIER": "docker",
//!   "CONTAINER_NAME": "svc.worker.1",
//!   "MESSAGE": "{\"code\":\"req-executed\",\"status\":\"SUCCESS\"}"
//! }"#;
//!
//! let record = JournalRecord::from_bytes(json.as_bytes()).unwrap();
//! assert_eq!(record.container_name, "svc.worker.1");
//! assert!(record.message_text().unwrap().starts_with("{\"code\""));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while decoding a journal record.
///
/// Every variant is fatal to processing: a record that cannot be decoded
/// means the upstream format contract is broken, and continuing would risk
/// silently dropping events.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The outer envelope is not the expected JSON object.
    #[error("malformed journal envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    /// The embedded message decoded to bytes that are not valid UTF-8.
    #[error("embedded message is not valid UTF-8: {0}")]
    MessageEncoding(#[from] std::string::FromUtf8Error),
}

/// A journald export record from the journal log topic.
///
/// All metadata fields are optional on the wire and default to empty
/// strings; the embedded `MESSAGE` field is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalRecord {
    /// Host the record originated from.
    #[serde(rename = "_HOSTNAME", default)]
    pub hostname: String,

    /// Systemd unit that produced the record.
    #[serde(rename = "_SYSTEMD_UNIT", default)]
    pub systemd_unit: String,

    /// Syslog identifier of the producer.
    #[serde(rename = "SYSLOG_IDENTIFIER", default)]
    pub syslog_identifier: String,

    /// Name of the container the record was emitted from.
    #[serde(rename = "CONTAINER_NAME", default)]
    pub container_name: String,

    /// The embedded application log line.
    #[serde(rename = "MESSAGE")]
    pub message: EmbeddedMessage,
}

/// The embedded `MESSAGE` field of a journal record.
///
/// MESSAGE arrives either as a JSON string or as a JSON array of byte
/// values representing a string; an encoding inconsistency in the
/// journald-to-Kafka bridge. The decode strategies are tried in order:
/// string first, then byte array. Any other shape fails the envelope
/// decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddedMessage {
    /// Message encoded as a JSON string.
    Text(String),
    /// Message encoded as a JSON array of byte values.
    Bytes(Vec<u8>),
}

impl JournalRecord {
    /// Decodes a journal record from its raw transport bytes.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Envelope` if the bytes are not the expected
    /// JSON object, including when `MESSAGE` is neither a string nor a
    /// byte array.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// Returns the embedded message as text.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::MessageEncoding` if the byte-array form does
    /// not hold valid UTF-8.
    pub fn message_text(&self) -> Result<String, DecodeError> {
        match &self.message {
            EmbeddedMessage::Text(text) => Ok(text.clone()),
            EmbeddedMessage::Bytes(bytes) => Ok(String::from_utf8(bytes.clone())?),
        }
    }
}
