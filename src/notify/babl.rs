//! Babl events alert sink.
//!
//! Delivers alerts by invoking the babl CLI against the events module,
//! passing the alert message on standard input. The call is synchronous
//! with respect to the pipeline and carries no retry logic.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::{AlertSink, NotifyError};
use crate::classify::Alert;
use crate::config::NotifierConfig;

/// Alert sink that invokes the babl events module.
///
/// Spawns `<command> -c <endpoint> <module> -e <event-tag>` per alert and
/// writes the alert message to the child's stdin.
pub struct BablEventsSink {
    config: NotifierConfig,
}

impl BablEventsSink {
    /// Creates a sink from notifier configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bablwatch::config::NotifierConfig;
    /// use bablwatch::notify::BablEventsSink;
    ///
    /// let sink = BablEventsSink::new(NotifierConfig::default());
    /// ```
    pub fn new(config: NotifierConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl AlertSink for BablEventsSink {
    async fn deliver(&self, alert: &Alert) -> Result<(), NotifyError> {
        debug!(
            command = %self.config.command,
            endpoint = %self.config.endpoint,
            module = %self.config.module,
            "Invoking notifier command"
        );

        let mut child = Command::new(&self.config.command)
            .arg("-c")
            .arg(&self.config.endpoint)
            .arg(&self.config.module)
            .arg("-e")
            .arg(&self.config.event_tag)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let mut stdin = child.stdin.take().ok_or(NotifyError::StdinUnavailable)?;
        stdin.write_all(alert.message.as_bytes()).await?;
        stdin.shutdown().await?;
        drop(stdin);

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(NotifyError::CommandFailed { status })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn script_sink(dir: &tempfile::TempDir, script: &str) -> BablEventsSink {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("notifier.sh");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = NotifierConfig {
            command: path.to_string_lossy().to_string(),
            ..NotifierConfig::default()
        };
        BablEventsSink::new(config)
    }

    fn alert() -> Alert {
        Alert {
            cluster: "prod".to_string(),
            message: "[prod] app.worker --> ERROR: Babl::ModuleError".to_string(),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_deliver_success_writes_message_to_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("received.txt");
        let sink = script_sink(
            &dir,
            &format!("#!/bin/sh\ncat > {}\nexit 0\n", out.display()),
        );

        sink.deliver(&alert()).await.unwrap();

        let received = std::fs::read_to_string(&out).unwrap();
        assert_eq!(received, "[prod] app.worker --> ERROR: Babl::ModuleError");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_deliver_reports_command_failure() {
        let dir = tempfile::tempdir().unwrap();
        let sink = script_sink(&dir, "#!/bin/sh\ncat > /dev/null\nexit 3\n");

        let result = sink.deliver(&alert()).await;
        assert!(matches!(result, Err(NotifyError::CommandFailed { .. })));
    }

    #[tokio::test]
    async fn test_deliver_reports_missing_command() {
        let config = NotifierConfig {
            command: "/nonexistent/babl".to_string(),
            ..NotifierConfig::default()
        };
        let sink = BablEventsSink::new(config);

        let result = sink.deliver(&alert()).await;
        assert!(matches!(result, Err(NotifyError::Io(_))));
    }
}
