use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use super::NotificationSink;

/// macOS notification centre via `osascript`.
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn script(title: &str, message: &str) -> String {
        format!(
            "display notification \"{}\" with title \"{}\"",
            escape_applescript(message),
            escape_applescript(title)
        )
    }
}

#[async_trait]
impl NotificationSink for DesktopNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<()> {
        let output = Command::new("osascript")
            .arg("-e")
            .arg(Self::script(title, message))
            .output()
            .await?;

        if !output.status.success() {
            return Err(anyhow!(
                "osascript exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(())
    }
}

pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<()> {
        info!("🔔 {}: {}", title, message);
        Ok(())
    }
}

fn escape_applescript(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_escapes_quotes_in_message() {
        let script = DesktopNotifier::script("Upload Complete", "File \"a\\b\" done");
        assert_eq!(
            script,
            r#"display notification "File \"a\\b\" done" with title "Upload Complete""#
        );
    }

    #[tokio::test]
    async fn log_notifier_never_fails() {
        assert!(LogNotifier.notify("Upload Complete", "ok").await.is_ok());
    }
}
