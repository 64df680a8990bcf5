//! Media-processing job tracking.
//!
//! [`ProcessingTracker`] submits a media file for processing and drives
//! the job to a terminal state through the poll registry. Completion
//! refreshes the lecture surfaces (language availability, transcript,
//! analysis results); failures and timeouts surface a message on the
//! view. All effects are state transitions plus broadcast events.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use lectern_core::language::{LanguageAvailability, BASE_TRANSCRIPT_LANGUAGE};
use lectern_core::status::DEFAULT_STAGE;
use lectern_core::types::LectureId;
use lectern_gateway::types::MediaUpload;
use lectern_gateway::{GatewayError, LectureGateway};

use crate::error::JobError;
use crate::events::{EventBus, JobEvent};
use crate::key::JobKey;
use crate::poller::{PollOutcome, PollTick, PollerConfig};
use crate::registry::PollRegistry;
use crate::view::LectureView;

/// Message surfaced when the status poll budget runs out.
const PROCESSING_TIMEOUT_MESSAGE: &str = "Processing timed out. Please check back later.";

/// Tracks one lecture's media-processing job.
pub struct ProcessingTracker {
    gateway: Arc<dyn LectureGateway>,
    registry: Arc<PollRegistry>,
    view: Arc<Mutex<LectureView>>,
    events: Arc<EventBus>,
    config: PollerConfig,
}

impl ProcessingTracker {
    pub fn new(
        gateway: Arc<dyn LectureGateway>,
        registry: Arc<PollRegistry>,
        view: Arc<Mutex<LectureView>>,
        events: Arc<EventBus>,
    ) -> Self {
        Self::with_config(gateway, registry, view, events, PollerConfig::processing())
    }

    pub fn with_config(
        gateway: Arc<dyn LectureGateway>,
        registry: Arc<PollRegistry>,
        view: Arc<Mutex<LectureView>>,
        events: Arc<EventBus>,
        config: PollerConfig,
    ) -> Self {
        Self {
            gateway,
            registry,
            view,
            events,
            config,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> LectureView {
        self.view.lock().await.clone()
    }

    /// Language the next upload is submitted with.
    pub async fn set_preferred_language(&self, language: &str) -> Result<(), JobError> {
        let mut view = self.view.lock().await;
        view.availability.validate_supported(language)?;
        view.preferred_language = language.to_string();
        Ok(())
    }

    /// Language transcript downloads use, independent of the display
    /// language.
    pub async fn set_download_language(&self, language: &str) -> Result<(), JobError> {
        let mut view = self.view.lock().await;
        view.availability.validate_supported(language)?;
        view.download_language = language.to_string();
        Ok(())
    }

    /// Submit a media file for processing and start tracking the job.
    ///
    /// Passing `existing` re-uploads into the same lecture; otherwise
    /// the server creates a new one and returns its id.
    pub async fn submit(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        existing: Option<&str>,
    ) -> Result<LectureId, JobError> {
        if file_name.is_empty() || bytes.is_empty() {
            return Err(JobError::Validation("No file selected.".to_string()));
        }

        let preferred_language = self.view.lock().await.preferred_language.clone();
        let upload = MediaUpload {
            file_name: file_name.to_string(),
            bytes,
            preferred_language,
        };

        let accepted = self.gateway.upload_media(existing, upload).await?;
        let lecture_id = accepted.lecture_id;
        tracing::info!(lecture_id = %lecture_id, file_name, "Media upload accepted");

        self.view.lock().await.begin_processing(lecture_id.clone());
        self.start_status_poll(lecture_id.clone()).await;
        Ok(lecture_id)
    }

    /// Attach to an already-running job, e.g. when the view reloads
    /// while processing is still underway.
    pub async fn resume(&self, lecture_id: &str) {
        tracing::info!(lecture_id, "Resuming processing status poll");
        self.view
            .lock()
            .await
            .begin_processing(lecture_id.to_string());
        self.start_status_poll(lecture_id.to_string()).await;
    }

    /// Re-fetch availability, transcript, and analysis results for an
    /// already-processed lecture.
    pub async fn refresh(&self) -> Result<(), JobError> {
        let lecture_id = self.require_lecture().await?;
        refresh_surfaces(&self.gateway, &self.view, &lecture_id).await?;
        Ok(())
    }

    /// Fetch the transcript document in the download language.
    pub async fn download_transcript(&self) -> Result<Vec<u8>, JobError> {
        let lecture_id = self.require_lecture().await?;
        let language = self.view.lock().await.download_language.clone();
        let bytes = self
            .gateway
            .download_transcript(&lecture_id, &language)
            .await?;
        Ok(bytes)
    }

    async fn require_lecture(&self) -> Result<LectureId, JobError> {
        self.view
            .lock()
            .await
            .lecture_id
            .clone()
            .ok_or_else(|| JobError::Conflict("No lecture is loaded.".to_string()))
    }

    async fn start_status_poll(&self, lecture_id: LectureId) {
        let key = JobKey::Processing(lecture_id.clone());

        let check_gateway = Arc::clone(&self.gateway);
        let check_view = Arc::clone(&self.view);
        let check_events = Arc::clone(&self.events);
        let check_id = lecture_id.clone();
        let check = move || {
            let gateway = Arc::clone(&check_gateway);
            let view = Arc::clone(&check_view);
            let events = Arc::clone(&check_events);
            let lecture_id = check_id.clone();
            async move {
                let dto = gateway.processing_status(&lecture_id).await?;
                let mut view = view.lock().await;
                let tick = view.apply_processing_tick(&dto);
                if matches!(tick, PollTick::Continue) {
                    events.emit(JobEvent::ProcessingProgress {
                        lecture_id,
                        stage: view
                            .stage
                            .clone()
                            .unwrap_or_else(|| DEFAULT_STAGE.to_string()),
                        progress: view.progress,
                    });
                }
                Ok(tick)
            }
        };

        let gateway = Arc::clone(&self.gateway);
        let view = Arc::clone(&self.view);
        let events = Arc::clone(&self.events);
        let on_terminal = move |outcome: PollOutcome| async move {
            finish_processing(gateway, view, events, lecture_id, outcome).await;
        };

        self.registry
            .start(key, self.config, check, on_terminal)
            .await;
    }
}

/// Terminal handler for the processing poll.
async fn finish_processing(
    gateway: Arc<dyn LectureGateway>,
    view: Arc<Mutex<LectureView>>,
    events: Arc<EventBus>,
    lecture_id: LectureId,
    outcome: PollOutcome,
) {
    match outcome {
        PollOutcome::Completed => {
            // A refresh failure after completion is not a job failure;
            // an explicit refresh can still recover the surfaces.
            if let Err(e) = refresh_surfaces(&gateway, &view, &lecture_id).await {
                tracing::warn!(lecture_id = %lecture_id, error = %e, "Post-completion refresh failed");
            }
            let mut view = view.lock().await;
            view.end_processing();
            view.last_error = None;
            tracing::info!(lecture_id = %lecture_id, "Processing completed");
            events.emit(JobEvent::ProcessingCompleted { lecture_id });
        }
        PollOutcome::Failed(message) => {
            let mut view = view.lock().await;
            view.end_processing();
            view.last_error = Some(message.clone());
            tracing::warn!(lecture_id = %lecture_id, error = %message, "Processing failed");
            events.emit(JobEvent::ProcessingFailed {
                lecture_id,
                message,
            });
        }
        PollOutcome::TimedOut => {
            let mut view = view.lock().await;
            view.end_processing();
            view.last_error = Some(PROCESSING_TIMEOUT_MESSAGE.to_string());
            tracing::warn!(lecture_id = %lecture_id, "Processing status poll timed out");
            events.emit(JobEvent::ProcessingFailed {
                lecture_id,
                message: PROCESSING_TIMEOUT_MESSAGE.to_string(),
            });
        }
    }
}

/// Fetch availability, transcript(s), and analysis results, then apply
/// them to the view in one step.
pub(crate) async fn refresh_surfaces(
    gateway: &Arc<dyn LectureGateway>,
    view: &Arc<Mutex<LectureView>>,
    lecture_id: &str,
) -> Result<(), GatewayError> {
    let display_language = view.lock().await.display_language.clone();

    let availability: LanguageAvailability = gateway.translations(lecture_id).await?.into();
    let base = gateway
        .transcript(lecture_id, BASE_TRANSCRIPT_LANGUAGE)
        .await?;
    let localized = if display_language != BASE_TRANSCRIPT_LANGUAGE
        && availability.is_available(&display_language)
    {
        Some(gateway.transcript(lecture_id, &display_language).await?)
    } else {
        None
    };
    let results = gateway.results(lecture_id).await?;

    let mut view = view.lock().await;
    view.availability = availability;
    view.base_transcript = Some(base.clone());
    match localized {
        Some(text) => view.transcript = Some(text),
        // Display language has no finalized content; fall back to base.
        None => {
            view.transcript = Some(base);
            view.display_language = BASE_TRANSCRIPT_LANGUAGE.to_string();
        }
    }
    view.results = results.has_content().then_some(results);
    Ok(())
}
