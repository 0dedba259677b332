use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::model::{JobOutcome, JobRequest, JobState};
use crate::infrastructure::notify::NotificationSink;
use crate::modules::transcode::model::TranscodeSpec;
use crate::modules::transcode::service::TranscodeEngine;
use crate::modules::upload::model::UploadTarget;
use crate::modules::upload::service::UploadClient;
use crate::state::AppState;

/// Sequences the optional speed-up and the upload for one request.
///
/// Keeps nothing between runs; running the same request twice transcodes
/// and uploads twice, replacing the remote object.
pub struct JobOrchestrator {
    bucket: String,
    output_dir: PathBuf,
    transcoder: TranscodeEngine,
    uploader: UploadClient,
    notifier: Arc<dyn NotificationSink>,
}

impl JobOrchestrator {
    pub fn new(state: &AppState) -> Self {
        Self {
            bucket: state.config.s3_bucket.clone(),
            output_dir: state.config.transcode_output_dir.clone(),
            transcoder: TranscodeEngine::new(state.encoder.clone()),
            uploader: UploadClient::new(state.storage.clone()),
            notifier: state.notifier.clone(),
        }
    }

    /// Produces the job's terminal outcome. Does not notify; see [`Self::notify`].
    pub async fn run(&self, request: &JobRequest) -> JobOutcome {
        let job_id = request.job_id;
        info!(%job_id, "📦 Job started: {}", request.source_path.display());

        let upload_path = if request.speed_up {
            transition(request, JobState::Idle, JobState::Transcoding);
            let spec = TranscodeSpec::for_input(&request.source_path, &self.output_dir);
            match self.transcoder.transcode(&request.source_path, &spec).await {
                Ok(path) => path,
                Err(e) => {
                    transition(request, JobState::Transcoding, JobState::Failed);
                    let outcome = JobOutcome::TranscodeFailed {
                        pass: e.pass,
                        reason: e.diagnostic,
                    };
                    return finish(request, outcome);
                }
            }
        } else {
            request.source_path.clone()
        };

        let from = if request.speed_up {
            JobState::Transcoding
        } else {
            JobState::Idle
        };
        transition(request, from, JobState::Uploading);

        let target = UploadTarget::for_file(
            &self.bucket,
            &request.target_folder,
            &upload_path,
        );
        let outcome = match target {
            Ok(target) => match self.uploader.upload(&upload_path, &target).await {
                Ok(()) => JobOutcome::Success {
                    uploaded_key: target.key,
                },
                Err(e) => JobOutcome::UploadFailed {
                    reason: e.diagnostic,
                },
            },
            Err(e) => JobOutcome::UploadFailed {
                reason: e.diagnostic,
            },
        };

        let to = if outcome.is_success() {
            JobState::Succeeded
        } else {
            JobState::Failed
        };
        transition(request, JobState::Uploading, to);
        finish(request, outcome)
    }

    /// Best effort; a broken notifier never changes the outcome.
    pub async fn notify(&self, request: &JobRequest, outcome: &JobOutcome) {
        let title = outcome.notification_title();
        let message = outcome.notification_message(&request.target_folder);
        if let Err(e) = self.notifier.notify(title, &message).await {
            warn!(job_id = %request.job_id, "Failed to send notification: {:#}", e);
        }
    }
}

fn finish(request: &JobRequest, outcome: JobOutcome) -> JobOutcome {
    match &outcome {
        JobOutcome::Success { uploaded_key } => {
            info!(job_id = %request.job_id, "✅ Job completed: {}", uploaded_key)
        }
        other => error!(job_id = %request.job_id, "❌ Job failed: {:?}", other),
    }
    outcome
}

fn transition(request: &JobRequest, from: JobState, to: JobState) {
    info!(job_id = %request.job_id, "Job state {} -> {}", from, to);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::modules::job::model::tests::test_config;
    use crate::modules::transcode::service::tests::ScriptedEncoder;
    use crate::modules::upload::service::tests::RecordingStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub fail: bool,
        /// When set, `notify` waits for a permit before returning.
        pub gate: Option<Arc<tokio::sync::Semaphore>>,
        pub sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingNotifier {
        async fn notify(&self, title: &str, message: &str) -> anyhow::Result<()> {
            if let Some(gate) = &self.gate {
                gate.acquire().await?.forget();
            }
            self.sent
                .lock()
                .unwrap()
                .push((title.to_string(), message.to_string()));
            if self.fail {
                anyhow::bail!("notification centre unavailable");
            }
            Ok(())
        }
    }

    pub(crate) struct Fixture {
        pub dir: tempfile::TempDir,
        pub encoder: Arc<ScriptedEncoder>,
        pub store: Arc<RecordingStore>,
        pub notifier: Arc<RecordingNotifier>,
        pub state: AppState,
    }

    impl Fixture {
        pub(crate) fn new(
            exit_codes: &[i32],
            store: RecordingStore,
            notifier: RecordingNotifier,
        ) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let encoder = Arc::new(ScriptedEncoder::new(exit_codes));
            let store = Arc::new(store);
            let notifier = Arc::new(notifier);
            let state = AppState::new(
                test_config(&dir.path().join("recordings")),
                store.clone(),
                encoder.clone(),
                notifier.clone(),
            );
            Self {
                dir,
                encoder,
                store,
                notifier,
                state,
            }
        }

        pub(crate) fn source(&self, name: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            std::fs::write(&path, b"source bytes").unwrap();
            path
        }

        /// The scripted encoder writes nothing, so stand in for pass 2.
        fn fake_transcoded(&self, name: &str) -> PathBuf {
            let out_dir = self.dir.path().join("recordings");
            std::fs::create_dir_all(&out_dir).unwrap();
            let path = out_dir.join(name);
            std::fs::write(&path, b"faster bytes").unwrap();
            path
        }
    }

    #[tokio::test]
    async fn run_alone_sends_no_notification() {
        let fx = Fixture::new(&[], RecordingStore::default(), RecordingNotifier::default());
        let request = JobRequest::new(fx.source("clip.mp4"), false, "default");

        JobOrchestrator::new(&fx.state).run(&request).await;

        assert!(fx.notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn plain_upload_never_transcodes() {
        let fx = Fixture::new(&[], RecordingStore::default(), RecordingNotifier::default());
        let source = fx.source("clip.mp4");
        let request = JobRequest::new(source.clone(), false, "default");

        let outcome = JobOrchestrator::new(&fx.state).run(&request).await;

        assert_eq!(
            outcome,
            JobOutcome::Success {
                uploaded_key: "default/clip.mp4".to_string()
            }
        );
        assert_eq!(fx.encoder.call_count(), 0);
        let calls = fx.store.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].bucket, "public");
        assert_eq!(calls[0].key, "default/clip.mp4");
        assert_eq!(calls[0].path, source);
    }

    #[tokio::test]
    async fn speed_up_uploads_the_transcoded_file() {
        let fx = Fixture::new(&[0, 0], RecordingStore::default(), RecordingNotifier::default());
        let source = fx.source("clip.mov");
        let transcoded = fx.fake_transcoded("clip_1.4x.mov");
        let request = JobRequest::new(source, true, "ai-for-hr-mastermind");

        let outcome = JobOrchestrator::new(&fx.state).run(&request).await;

        assert_eq!(
            outcome,
            JobOutcome::Success {
                uploaded_key: "ai-for-hr-mastermind/clip_1.4x.mov".to_string()
            }
        );
        assert_eq!(fx.encoder.call_count(), 2);
        let calls = fx.store.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].key, "ai-for-hr-mastermind/clip_1.4x.mov");
        assert_eq!(calls[0].path, transcoded);
    }

    #[tokio::test]
    async fn first_pass_failure_skips_upload() {
        let fx = Fixture::new(&[1], RecordingStore::default(), RecordingNotifier::default());
        let request = JobRequest::new(fx.source("clip.mov"), true, "default");

        let orchestrator = JobOrchestrator::new(&fx.state);
        let outcome = orchestrator.run(&request).await;
        orchestrator.notify(&request, &outcome).await;

        assert!(matches!(outcome, JobOutcome::TranscodeFailed { pass: 1, .. }));
        assert_eq!(fx.encoder.call_count(), 1);
        assert!(fx.store.calls().is_empty());

        let sent = fx.notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "Video Processing Failed");
    }

    #[tokio::test]
    async fn upload_failure_after_transcode_is_not_retried() {
        let fx = Fixture::new(
            &[0, 0],
            RecordingStore::failing("connection reset"),
            RecordingNotifier::default(),
        );
        fx.fake_transcoded("clip_1.4x.mov");
        let request = JobRequest::new(fx.source("clip.mov"), true, "default");

        let outcome = JobOrchestrator::new(&fx.state).run(&request).await;

        match outcome {
            JobOutcome::UploadFailed { reason } => assert!(reason.contains("connection reset")),
            other => panic!("expected upload failure, got {:?}", other),
        }
        assert_eq!(fx.store.calls().len(), 1);
    }

    #[tokio::test]
    async fn notifier_failure_does_not_change_outcome() {
        let fx = Fixture::new(
            &[],
            RecordingStore::default(),
            RecordingNotifier {
                fail: true,
                ..Default::default()
            },
        );
        let request = JobRequest::new(fx.source("clip.mp4"), false, "default");
        let orchestrator = JobOrchestrator::new(&fx.state);

        let outcome = orchestrator.run(&request).await;
        orchestrator.notify(&request, &outcome).await;

        assert!(outcome.is_success());
        let sent = fx.notifier.sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![(
                "Upload Complete".to_string(),
                "File uploaded to folder 'default' successfully.".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn running_twice_uploads_twice_to_the_same_key() {
        let fx = Fixture::new(&[], RecordingStore::default(), RecordingNotifier::default());
        let request = JobRequest::new(fx.source("clip.mp4"), false, "default");
        let orchestrator = JobOrchestrator::new(&fx.state);

        orchestrator.run(&request).await;
        orchestrator.run(&request).await;

        let keys: Vec<String> = fx.store.calls().into_iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["default/clip.mp4", "default/clip.mp4"]);
    }
}
