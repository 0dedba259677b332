use thiserror::Error;

/// Errors surfaced to the interactive caller before or instead of a job run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A job is already running")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Worker(String),
}

/// A failed encoder pass. Pass 2 is never attempted after pass 1 fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Video processing failed in pass {pass}: {diagnostic}")]
pub struct TranscodeError {
    pub pass: u8,
    pub diagnostic: String,
}

impl TranscodeError {
    pub fn new(pass: u8, diagnostic: impl Into<String>) -> Self {
        Self {
            pass,
            diagnostic: diagnostic.into(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to upload file: {diagnostic}")]
pub struct UploadError {
    pub diagnostic: String,
}

impl UploadError {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
        }
    }
}
