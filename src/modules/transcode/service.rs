use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{error, info};

use super::model::TranscodeSpec;
use crate::common::error::TranscodeError;
use crate::infrastructure::encoder::EncoderRunner;

// ffmpeg prints its banner first; the cause is at the end.
const DIAGNOSTIC_TAIL_LINES: usize = 20;

pub struct TranscodeEngine {
    runner: Arc<dyn EncoderRunner>,
}

impl TranscodeEngine {
    pub fn new(runner: Arc<dyn EncoderRunner>) -> Self {
        Self { runner }
    }

    /// Two-pass constant-bitrate speed-up of `input_path`.
    ///
    /// Partial output from a failed pass 2 is left on disk.
    pub async fn transcode(
        &self,
        input_path: &Path,
        spec: &TranscodeSpec,
    ) -> Result<PathBuf, TranscodeError> {
        fs::create_dir_all(spec.output_dir()).await.map_err(|e| {
            TranscodeError::new(
                1,
                format!("cannot create {}: {}", spec.output_dir().display(), e),
            )
        })?;

        info!("🎥 Speeding up {} (pass 1/2)", input_path.display());
        self.run_pass(spec, 1).await?;

        info!("🎥 Writing {} (pass 2/2)", spec.output_path.display());
        self.run_pass(spec, 2).await?;

        info!("✅ Transcoded {}", spec.output_path.display());
        Ok(spec.output_path.clone())
    }

    async fn run_pass(&self, spec: &TranscodeSpec, pass: u8) -> Result<(), TranscodeError> {
        let output = self
            .runner
            .run_pass(&spec.pass_args(pass))
            .await
            .map_err(|e| {
                TranscodeError::new(pass, format!("failed to start encoder: {}", e))
            })?;

        if output.success() {
            return Ok(());
        }

        let status = match output.status_code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        let diagnostic = format!(
            "{}: {}",
            status,
            tail_lines(&output.stderr, DIAGNOSTIC_TAIL_LINES)
        );
        error!("❌ Encoder pass {} failed: {}", pass, diagnostic);
        Err(TranscodeError::new(pass, diagnostic))
    }
}

fn tail_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}
