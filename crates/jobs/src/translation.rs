//! Per-language transcript translation orchestration.
//!
//! Each `(lecture, language)` pair is one independent server-side
//! sub-job. [`TranslationOrchestrator::ensure_language`] guarantees at
//! most one in-flight request per pair: already-available languages are
//! fetched directly, running jobs get a poll attached without a second
//! request, and stored failures are surfaced without auto-retry.
//!
//! Only the language the user currently has selected may write to the
//! displayed transcript. A poll that completes after the user moved on
//! still refreshes the availability cache but leaves the display alone.

use std::sync::Arc;

use tokio::sync::Mutex;

use lectern_core::language::{LanguageAvailability, BASE_TRANSCRIPT_LANGUAGE};
use lectern_core::status::TranslationStatus;
use lectern_core::types::LectureId;
use lectern_gateway::types::TranslationStatusDto;
use lectern_gateway::LectureGateway;

use crate::error::JobError;
use crate::events::{EventBus, JobEvent};
use crate::key::JobKey;
use crate::poller::{PollOutcome, PollTick, PollerConfig};
use crate::registry::PollRegistry;
use crate::view::{LectureView, TranslationProgress};

/// Message surfaced when the server reports a failure without detail.
const TRANSLATION_FAILED_MESSAGE: &str = "Translation failed. Please try again.";

fn timeout_message(language: &str) -> String {
    format!("Translation to {language} timed out. Please try again later.")
}

/// Map one `/translation-status` payload onto the poll contract.
fn translation_tick(dto: &TranslationStatusDto) -> PollTick {
    match dto.status {
        TranslationStatus::Completed => PollTick::Terminal(PollOutcome::Completed),
        TranslationStatus::Error => {
            let message = dto
                .error
                .clone()
                .unwrap_or_else(|| TRANSLATION_FAILED_MESSAGE.to_string());
            PollTick::Terminal(PollOutcome::Failed(message))
        }
        TranslationStatus::NotStarted | TranslationStatus::Processing => PollTick::Continue,
    }
}

/// Drives transcript translations for one lecture view.
pub struct TranslationOrchestrator {
    gateway: Arc<dyn LectureGateway>,
    registry: Arc<PollRegistry>,
    view: Arc<Mutex<LectureView>>,
    events: Arc<EventBus>,
    config: PollerConfig,
}

impl TranslationOrchestrator {
    pub fn new(
        gateway: Arc<dyn LectureGateway>,
        registry: Arc<PollRegistry>,
        view: Arc<Mutex<LectureView>>,
        events: Arc<EventBus>,
    ) -> Self {
        Self::with_config(gateway, registry, view, events, PollerConfig::translation())
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

    /// Make the transcript available in `language`, requesting a
    /// translation job only when one is genuinely needed.
    ///
    /// Unsupported languages are rejected before any network call.
    /// Failures of a tracked job are surfaced through view state and
    /// events, not through the returned `Result`.
    pub async fn ensure_language(&self, language: &str) -> Result<(), JobError> {
        let (lecture_id, available) = {
            let view = self.view.lock().await;
            let lecture_id = view
                .lecture_id
                .clone()
                .ok_or_else(|| JobError::Conflict("No lecture is loaded.".to_string()))?;
            view.availability.validate_supported(language)?;
            (lecture_id, view.availability.is_available(language))
        };

        if available {
            return self.show_available(&lecture_id, language).await;
        }

        let status = self
            .gateway
            .translation_status(&lecture_id, language)
            .await?;
        match status.status {
            // Finished since the availability cache was last refreshed.
            TranslationStatus::Completed => {
                self.refresh_availability(&lecture_id).await;
                self.show_available(&lecture_id, language).await
            }
            TranslationStatus::Error => {
                let message = status
                    .error
                    .unwrap_or_else(|| TRANSLATION_FAILED_MESSAGE.to_string());
                tracing::warn!(lecture_id = %lecture_id, language, error = %message, "Stored translation failure");
                let mut view = self.view.lock().await;
                view.translating = None;
                view.last_error = Some(message.clone());
                self.events.emit(JobEvent::TranslationFailed {
                    lecture_id,
                    language: language.to_string(),
                    message,
                });
                Ok(())
            }
            TranslationStatus::NotStarted => {
                tracing::info!(lecture_id = %lecture_id, language, "Requesting translation");
                self.gateway
                    .request_translation(&lecture_id, language)
                    .await?;
                self.attach_poll(lecture_id, language.to_string()).await;
                Ok(())
            }
            // Already running; attach a poll, never a second request.
            TranslationStatus::Processing => {
                self.attach_poll(lecture_id, language.to_string()).await;
                Ok(())
            }
        }
    }

    /// Restore the held base transcript and base display language.
    /// Synchronous; operates only on already-held content.
    pub async fn reset_to_base(&self) {
        self.view.lock().await.reset_transcript_to_base();
    }

    /// Fetch and display an already-available language.
    async fn show_available(&self, lecture_id: &str, language: &str) -> Result<(), JobError> {
        let text = self.gateway.transcript(lecture_id, language).await?;
        let mut view = self.view.lock().await;
        if language == BASE_TRANSCRIPT_LANGUAGE {
            view.base_transcript = Some(text.clone());
        }
        view.transcript = Some(text);
        view.display_language = language.to_string();
        view.translating = None;
        Ok(())
    }

    async fn refresh_availability(&self, lecture_id: &str) {
        match self.gateway.translations(lecture_id).await {
            Ok(dto) => {
                self.view.lock().await.availability = LanguageAvailability::from(dto);
            }
            Err(e) => {
                tracing::warn!(lecture_id, error = %e, "Availability refresh failed");
            }
        }
    }

    async fn attach_poll(&self, lecture_id: LectureId, language: String) {
        // Mark the selection so only this language's terminal result may
        // write to the display. Re-selecting a language whose loop is
        // already running re-marks it without a second loop.
        self.view.lock().await.translating = Some(TranslationProgress {
            language: language.clone(),
            progress: None,
        });

        let key = JobKey::Translation {
            lecture_id: lecture_id.clone(),
            language: language.clone(),
        };

        let check_gateway = Arc::clone(&self.gateway);
        let check_view = Arc::clone(&self.view);
        let check_id = lecture_id.clone();
        let check_language = language.clone();
        let check = move || {
            let gateway = Arc::clone(&check_gateway);
            let view = Arc::clone(&check_view);
            let lecture_id = check_id.clone();
            let language = check_language.clone();
            async move {
                let dto = gateway.translation_status(&lecture_id, &language).await?;
                let tick = translation_tick(&dto);
                if matches!(tick, PollTick::Continue) {
                    let mut view = view.lock().await;
                    if view.is_requested_language(&language) {
                        if let Some(t) = view.translating.as_mut() {
                            t.progress = dto.progress.or(t.progress);
                        }
                    }
                }
                Ok(tick)
            }
        };

        let gateway = Arc::clone(&self.gateway);
        let view = Arc::clone(&self.view);
        let events = Arc::clone(&self.events);
        let on_terminal = move |outcome: PollOutcome| async move {
            finish_translation(gateway, view, events, lecture_id, language, outcome).await;
        };

        self.registry
            .start(key, self.config, check, on_terminal)
            .await;
    }
}

/// Terminal handler for one translation poll.
async fn finish_translation(
    gateway: Arc<dyn LectureGateway>,
    view: Arc<Mutex<LectureView>>,
    events: Arc<EventBus>,
    lecture_id: LectureId,
    language: String,
    outcome: PollOutcome,
) {
    let message = match outcome {
        PollOutcome::Completed => {
            // The availability cache is stale either way, even when the
            // user has since selected another language.
            match gateway.translations(&lecture_id).await {
                Ok(dto) => view.lock().await.availability = LanguageAvailability::from(dto),
                Err(e) => {
                    tracing::warn!(lecture_id = %lecture_id, error = %e, "Availability refresh failed")
                }
            }

            match gateway.transcript(&lecture_id, &language).await {
                Ok(text) => {
                    let mut view = view.lock().await;
                    if view.is_requested_language(&language) {
                        view.transcript = Some(text);
                        view.display_language = language.clone();
                        view.translating = None;
                        view.last_error = None;
                    } else {
                        tracing::debug!(
                            lecture_id = %lecture_id,
                            language,
                            "Translation finished for a language no longer selected"
                        );
                    }
                    tracing::info!(lecture_id = %lecture_id, language, "Translation completed");
                    events.emit(JobEvent::TranslationCompleted {
                        lecture_id,
                        language,
                    });
                    return;
                }
                Err(e) => e.to_string(),
            }
        }
        PollOutcome::Failed(message) => message,
        PollOutcome::TimedOut => timeout_message(&language),
    };

    // Failure path: the displayed transcript and language are never
    // corrupted by a failed translation.
    tracing::warn!(lecture_id = %lecture_id, language, error = %message, "Translation failed");
    {
        let mut view = view.lock().await;
        if view.is_requested_language(&language) {
            view.translating = None;
            view.last_error = Some(message.clone());
        }
    }
    events.emit(JobEvent::TranslationFailed {
        lecture_id,
        language,
        message,
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
