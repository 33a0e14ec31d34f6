//! Event classification rules and alert formatting.
//!
//! This module decides whether a decoded log payload represents a failed
//! module execution, a canceled execution, or a global timeout, and
//! formats the human-readable alert text for each match. All three rules
//! are checked on every payload; their conditions are mutually exclusive
//! on the event code, but each rule fires independently.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use bablwatch::classify::{AlertPatterns, EventClassifier, EventPayload};
//!
//! let patterns = Arc::new(AlertPatterns::compile().unwrap());
//! let classifier = EventClassifier::new("prod", patterns);
//!
//! let payload = EventPayload::parse(
//!     r#"{"code":"completed","status":"MODULE_RESPONSE_TIMEOUT","module":"mailer"}"#,
//! )
//! .unwrap();
//!
//! let alerts = classifier.classify(&payload, "svc.1");
//! assert_eq!(alerts[0].message, "[prod] mailer --> MODULE_RESPONSE_TIMEOUT");
//! ```

use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

/// Stable category label substituted for verbose module error text.
pub const MODULE_ERROR_LABEL: &str = "Babl::ModuleError";

/// Compiled patterns used by the classifier.
///
/// Built once at startup and shared by reference; never recreated per
/// record.
#[derive(Debug)]
pub struct AlertPatterns {
    module_error: Regex,
}

impl AlertPatterns {
    /// Compiles the classifier patterns.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if a pattern fails to compile.
    pub fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            module_error: Regex::new(r"(?i)Babl::ModuleError")?,
        })
    }

    /// Collapses verbose module error text into its category label.
    ///
    /// A stderr value that contains `Babl::ModuleError` in any casing is
    /// replaced with the literal label; anything else passes through
    /// unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bablwatch::classify::AlertPatterns;
    ///
    /// let patterns = AlertPatterns::compile().unwrap();
    /// assert_eq!(
    ///     patterns.normalize_stderr("babl::moduleerror: boom"),
    ///     "Babl::ModuleError"
    /// );
    /// assert_eq!(patterns.normalize_stderr("disk full"), "disk full");
    /// ```
    pub fn normalize_stderr<'a>(&self, stderr: &'a str) -> &'a str {
        if self.module_error.is_match(stderr) {
            MODULE_ERROR_LABEL
        } else {
            stderr
        }
    }
}

/// A decoded application event payload.
///
/// Wraps the JSON object parsed from a record's embedded message. The
/// recognized keys are all optional and their types vary by event, so
/// every accessor is defensive: a missing key or a non-string value reads
/// as absent.
#[derive(Debug, Clone, Default)]
pub struct EventPayload(Map<String, Value>);

impl EventPayload {
    /// Parses an embedded message string into an event payload.
    ///
    /// Returns `None` when the string is not a JSON object; plenty of
    /// records carry plain log lines, which simply hold no classifiable
    /// event.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bablwatch::classify::EventPayload;
    ///
    /// assert!(EventPayload::parse(r#"{"code":"completed"}"#).is_some());
    /// assert!(EventPayload::parse("GET /healthz 200").is_none());
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str::<Map<String, Value>>(text).ok().map(Self)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Event code discriminator.
    pub fn code(&self) -> Option<&str> {
        self.str_field("code")
    }

    /// Outcome status code.
    pub fn status(&self) -> Option<&str> {
        self.str_field("status")
    }

    /// Free-form error text.
    pub fn stderr(&self) -> Option<&str> {
        self.str_field("stderr")
    }

    /// Module identifier.
    pub fn module(&self) -> Option<&str> {
        self.str_field("module")
    }
}

/// An alert produced by the classifier.
///
/// Ephemeral: created per matching event, forwarded immediately, never
/// retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Cluster tag the alert is labeled with.
    pub cluster: String,
    /// Formatted alert text.
    pub message: String,
}

/// Event classifier.
///
/// Applies the three failure rules to a payload and formats an alert for
/// each match, labeled with the cluster tag fixed at startup.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    cluster: String,
    patterns: Arc<AlertPatterns>,
}

impl EventClassifier {
    /// Creates a classifier for the given cluster tag.
    ///
    /// # Arguments
    ///
    /// * `cluster` - Cluster tag used to label alerts
    /// * `patterns` - Compiled patterns shared across the process
    pub fn new(cluster: impl Into<String>, patterns: Arc<AlertPatterns>) -> Self {
        Self {
            cluster: cluster.into(),
            patterns,
        }
    }

    /// Returns the cluster tag this classifier labels alerts with.
    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    /// Classifies a payload, returning one alert per matching rule.
    ///
    /// # Arguments
    ///
    /// * `payload` - Decoded event payload
    /// * `container_name` - Container name from the record envelope
    pub fn classify(&self, payload: &EventPayload, container_name: &str) -> Vec<Alert> {
        let code = payload.code();
        let status = payload.status();
        let stderr = payload.stderr().map(|s| self.patterns.normalize_stderr(s));

        let mut alerts = Vec::new();

        // catch execution errors
        if code == Some("req-executed") && status != Some("SUCCESS") {
            alerts.push(self.alert(format!(
                "{} --> {}: {}",
                strip_container_suffix(container_name),
                status.unwrap_or_default(),
                stderr.unwrap_or_default(),
            )));
        }

        // catch execution canceling
        if code == Some("req-execution-canceled") && status != Some("SUCCESS") {
            alerts.push(self.alert(format!(
                "{} --> EXECUTION CANCELED",
                strip_container_suffix(container_name),
            )));
        }

        // catch global module timeout
        if code == Some("completed") && status == Some("MODULE_RESPONSE_TIMEOUT") {
            alerts.push(self.alert(format!(
                "{} --> {}",
                payload.module().unwrap_or_default(),
                status.unwrap_or_default(),
            )));
        }

        alerts
    }

    fn alert(&self, body: String) -> Alert {
        Alert {
            cluster: self.cluster.clone(),
            message: format!("[{}] {}", self.cluster, body),
        }
    }
}

/// Strips the trailing `.`-separated segment from a container name.
///
/// Container names are composite identifiers like `app.worker.3`; alerts
/// use the name without its final segment. A name without a separator is
/// returned unchanged.
///
/// # Example
///
/// ```rust
/// use bablwatch::classify::strip_container_suffix;
///
/// assert_eq!(strip_container_suffix("app.worker.3"), "app.worker");
/// assert_eq!(strip_container_suffix("standalone"), "standalone");
/// ```
pub fn strip_container_suffix(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) => &name[..index],
        None => name,
    }
}
