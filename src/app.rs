use std::path::PathBuf;
use tracing::warn;

use crate::common::error::AppError;
use crate::common::progress::{ProgressIndicator, ProgressSlot};
use crate::config::settings::AppConfig;
use crate::modules::job::model::{JobOutcome, JobRequest, VIDEO_EXTENSIONS};
use crate::modules::job::service::JobOrchestrator;
use crate::state::AppState;
use crate::workers::job_runner::{JobDispatcher, JobHandle};

/// What the user asked for on the command line.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub file: PathBuf,
    pub speed_up: bool,
    pub folder: String,
    /// Spinner shown while the job runs; `None` when stderr is not a terminal.
    pub progress: Option<ProgressSlot>,
}

pub fn create_dispatcher(state: &AppState) -> JobDispatcher {
    JobDispatcher::new(JobOrchestrator::new(state))
}

/// Validates the request and hands it to a worker. Nothing is spawned when
/// validation fails.
pub fn submit(
    dispatcher: &JobDispatcher,
    config: &AppConfig,
    args: &RunArgs,
) -> Result<JobHandle, AppError> {
    let request = JobRequest::validated(&args.file, args.speed_up, &args.folder, config)?;

    if !request.has_video_extension() {
        warn!(
            "{} is not one of {:?}; uploading anyway",
            request.source_path.display(),
            VIDEO_EXTENSIONS
        );
    }

    dispatcher.start(request)
}

/// Runs one job to completion while the spinner ticks.
pub async fn run(state: AppState, args: RunArgs) -> Result<JobOutcome, AppError> {
    let dispatcher = create_dispatcher(&state);
    let handle = submit(&dispatcher, &state.config, &args)?;

    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut progress = match &args.progress {
        Some(slot) => {
            let verb = if args.speed_up {
                "Speeding up and uploading"
            } else {
                "Uploading"
            };
            slot.start(&format!("{} {} to '{}'", verb, name, args.folder))
        }
        None => ProgressIndicator::hidden(),
    };

    let outcome = handle.wait(|| progress.stop()).await;
    progress.stop();
    outcome
}
