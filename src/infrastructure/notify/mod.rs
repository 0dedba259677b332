use async_trait::async_trait;
use std::sync::Arc;

use crate::config::settings::NotifierKind;

pub mod desktop;

pub use desktop::{DesktopNotifier, LogNotifier};

/// Receives a short title/message pair when a job reaches a terminal state.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, title: &str, message: &str) -> anyhow::Result<()>;
}

pub fn build_notifier(kind: NotifierKind) -> Arc<dyn NotificationSink> {
    match kind {
        NotifierKind::Desktop => Arc::new(DesktopNotifier),
        NotifierKind::Log => Arc::new(LogNotifier),
    }
}
