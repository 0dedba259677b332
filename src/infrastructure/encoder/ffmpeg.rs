use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::{EncoderOutput, EncoderRunner};

pub struct FfmpegRunner {
    binary: PathBuf,
}

impl FfmpegRunner {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl EncoderRunner for FfmpegRunner {
    async fn run_pass(&self, args: &[OsString]) -> std::io::Result<EncoderOutput> {
        let printable: Vec<_> = args.iter().map(|a| a.to_string_lossy()).collect();
        debug!("{} {}", self.binary.display(), printable.join(" "));

        // stdin closed so ffmpeg never waits on an interactive prompt
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(EncoderOutput {
            status_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
