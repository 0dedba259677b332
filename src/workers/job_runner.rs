use async_channel::{Receiver, Sender};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::common::error::AppError;
use crate::modules::job::events::JobEvent;
use crate::modules::job::model::{JobOutcome, JobRequest};
use crate::modules::job::service::JobOrchestrator;

/// Starts jobs on a worker task, one at a time.
///
/// A second `start` while a job is in flight is rejected with
/// [`AppError::Busy`] rather than queued.
pub struct JobDispatcher {
    orchestrator: Arc<JobOrchestrator>,
    busy: Arc<AtomicBool>,
}

/// Interactive-side end of a running job.
pub struct JobHandle {
    pub events: Receiver<JobEvent>,
    pub worker: JoinHandle<()>,
}

struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl JobDispatcher {
    pub fn new(orchestrator: JobOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn start(&self, request: JobRequest) -> Result<JobHandle, AppError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AppError::Busy);
        }
        let guard = BusyGuard(self.busy.clone());

        // Room for both events so the worker never waits on the reader.
        let (tx, rx) = async_channel::bounded(2);
        let orchestrator = self.orchestrator.clone();

        info!(job_id = %request.job_id, "🚀 Dispatching job to worker");
        let worker = tokio::spawn(async move {
            let outcome = orchestrator.run(&request).await;
            drop(guard);

            // Progress stops before the notifier runs, as a notification
            // can take a while to display.
            send(&tx, JobEvent::Finished).await;
            orchestrator.notify(&request, &outcome).await;
            send(&tx, JobEvent::Outcome(outcome)).await;
        });

        Ok(JobHandle { events: rx, worker })
    }
}

async fn send(tx: &Sender<JobEvent>, event: JobEvent) {
    if let Err(e) = tx.send(event).await {
        error!("Failed to deliver job event: {}", e);
    }
}

impl JobHandle {
    /// Waits for the outcome, calling `on_finished` once when the worker
    /// signals it is done.
    pub async fn wait(self, mut on_finished: impl FnMut()) -> Result<JobOutcome, AppError> {
        let mut finished = false;
        while let Ok(event) = self.events.recv().await {
            match event {
                JobEvent::Finished if !finished => {
                    finished = true;
                    on_finished();
                }
                JobEvent::Finished => {}
                JobEvent::Outcome(outcome) => {
                    if !finished {
                        on_finished();
                    }
                    return Ok(outcome);
                }
            }
        }

        // Channel closed without an outcome: the worker died.
        let reason = match self.worker.await {
            Err(e) if e.is_panic() => "job worker panicked".to_string(),
            Err(e) => format!("job worker failed: {}", e),
            Ok(()) => "job worker exited without an outcome".to_string(),
        };
        if !finished {
            on_finished();
        }
        Err(AppError::Worker(reason))
    }
}
