use async_trait::async_trait;
use std::ffi::OsString;

pub mod ffmpeg;

/// Exit status and diagnostics of one encoder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderOutput {
    /// `None` when the process was killed by a signal.
    pub status_code: Option<i32>,
    pub stderr: String,
}

impl EncoderOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

/// Runs the external encoder binary once with the given arguments.
///
/// Arguments are OS strings so non-UTF-8 paths reach the encoder untouched.
#[async_trait]
pub trait EncoderRunner: Send + Sync {
    async fn run_pass(&self, args: &[OsString]) -> std::io::Result<EncoderOutput>;
}
