use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

/// Shared handle to whichever spinner is currently on screen.
///
/// Also the log writer: each log line is printed with the spinner suspended
/// so the two never share a terminal line.
#[derive(Debug, Clone, Default)]
pub struct ProgressSlot {
    active: Arc<Mutex<Option<ProgressBar>>>,
}

impl ProgressSlot {
    pub fn start(&self, message: &str) -> ProgressIndicator {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.attach(bar)
    }

    fn attach(&self, bar: ProgressBar) -> ProgressIndicator {
        *self.lock() = Some(bar.clone());
        ProgressIndicator {
            bar: Some(bar),
            slot: Some(self.clone()),
        }
    }

    fn active_bar(&self) -> Option<ProgressBar> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<'a> MakeWriter<'a> for ProgressSlot {
    type Writer = SuspendingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendingWriter {
            slot: self.clone(),
        }
    }
}

/// stderr writer that clears the spinner while a log line is printed.
pub struct SuspendingWriter {
    slot: ProgressSlot,
}

impl Write for SuspendingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.slot.active_bar() {
            Some(bar) => bar.suspend(|| io::stderr().write_all(buf))?,
            None => io::stderr().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Indeterminate "in progress" indicator owned by the interactive task.
///
/// `stop` may be called any number of times; only the first call clears the
/// spinner.
pub struct ProgressIndicator {
    bar: Option<ProgressBar>,
    slot: Option<ProgressSlot>,
}

impl ProgressIndicator {
    /// A spinner that draws nothing, for non-terminal output.
    pub fn hidden() -> Self {
        Self {
            bar: Some(ProgressBar::hidden()),
            slot: None,
        }
    }

    pub fn stop(&mut self) {
        if let Some(bar) = self.bar.take() {
            if let Some(slot) = self.slot.take() {
                *slot.lock() = None;
            }
            bar.finish_and_clear();
        }
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_idempotent() {
        let mut progress = ProgressIndicator::hidden();
        progress.stop();
        progress.stop();
        assert!(progress.bar.is_none());
    }

    #[test]
    fn log_writes_go_through_the_active_spinner() {
        let slot = ProgressSlot::default();
        let mut progress = slot.attach(ProgressBar::hidden());
        assert!(slot.active_bar().is_some());

        let line = b"INFO upload started\n";
        let written = slot.make_writer().write(line).unwrap();
        assert_eq!(written, line.len());

        progress.stop();
        assert!(slot.active_bar().is_none());
        assert_eq!(slot.make_writer().write(line).unwrap(), line.len());
    }

    #[test]
    fn dropping_the_indicator_releases_the_slot() {
        let slot = ProgressSlot::default();
        drop(slot.attach(ProgressBar::hidden()));
        assert!(slot.active_bar().is_none());
    }
}
