use clap::Parser;
use dotenvy::dotenv;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod infrastructure;
mod modules;
mod state;
mod workers;

use crate::common::error::AppError;
use crate::common::progress::ProgressSlot;
use crate::config::settings::{AppConfig, DEFAULT_FOLDER};
use crate::modules::job::model::JobOutcome;
use crate::state::AppState;

#[derive(Parser)]
#[command(
    name = "s3-uploader",
    version,
    about = "Upload a recording to S3, optionally sped up 1.4x first"
)]
struct Cli {
    /// File to upload
    file: PathBuf,

    /// Re-encode at 1.4x speed (two-pass, 1400 kbps) before uploading
    #[arg(short, long)]
    speed_up: bool,

    /// Logical folder (key prefix) in the bucket
    #[arg(short, long, default_value = DEFAULT_FOLDER)]
    folder: String,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    // Log lines suspend the spinner instead of landing on its line.
    let progress = ProgressSlot::default();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(progress.clone())
        .init();

    info!("Starting s3-uploader v{}", env!("CARGO_PKG_VERSION"));

    let config = match AppConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };
    let state = AppState::from_config(config);

    let args = app::RunArgs {
        file: cli.file,
        speed_up: cli.speed_up,
        folder: cli.folder,
        progress: std::io::stderr().is_terminal().then_some(progress),
    };

    match app::run(state, args).await {
        Ok(outcome) => {
            print_outcome(&outcome, cli.json);
            if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e @ AppError::InvalidInput(_)) => {
            error!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_outcome(outcome: &JobOutcome, json: bool) {
    if json {
        match serde_json::to_string(outcome) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to serialize outcome: {}", e),
        }
        return;
    }

    match outcome {
        JobOutcome::Success { uploaded_key } => println!("Uploaded {}", uploaded_key),
        JobOutcome::TranscodeFailed { pass, reason } => {
            eprintln!("Video processing failed (pass {}): {}", pass, reason)
        }
        JobOutcome::UploadFailed { reason } => eprintln!("Failed to upload file: {}", reason),
    }
}
