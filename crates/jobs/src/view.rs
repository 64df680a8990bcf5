//! Shared per-lecture view state.
//!
//! [`LectureView`] is the single mutable state owned by one lecture
//! screen. The processing tracker and translation orchestrator mutate
//! it under a lock; the gateway remains the source of truth and the
//! view reconciles on every terminal poll result or explicit fetch.
//!
//! The three language fields are deliberately independent: the language
//! the lecture was delivered in (preferred), the language the
//! transcript is shown in (display), and the language transcript
//! downloads use. A status payload carrying `preferred_language`
//! synchronizes all three exactly once per job.

use lectern_core::language::{LanguageAvailability, BASE_TRANSCRIPT_LANGUAGE};
use lectern_core::results::LectureResults;
use lectern_core::status::{humanize_stage, ProcessingStatus};
use lectern_core::types::LectureId;
use lectern_gateway::types::ProcessingStatusDto;

use crate::poller::{PollOutcome, PollTick};

/// An in-flight transcript translation, tracked on the view so terminal
/// results can tell whether they still match the user's selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationProgress {
    pub language: String,
    pub progress: Option<u8>,
}

/// State of one lecture screen.
#[derive(Debug, Clone)]
pub struct LectureView {
    pub lecture_id: Option<LectureId>,

    // ---- processing job ----
    pub processing: bool,
    /// Human-readable stage label, present only while processing.
    pub stage: Option<String>,
    pub progress: Option<u8>,
    pub last_error: Option<String>,

    // ---- languages ----
    pub preferred_language: String,
    pub display_language: String,
    pub download_language: String,
    /// Whether the one-time preferred-language sync already happened.
    pub(crate) language_synced: bool,
    pub availability: LanguageAvailability,

    // ---- lecture surfaces ----
    pub transcript: Option<String>,
    /// Base-language transcript, held so reset-to-base needs no network.
    pub(crate) base_transcript: Option<String>,
    pub results: Option<LectureResults>,

    /// The translation whose result may write to `transcript` and
    /// `display_language` when it completes. Selecting another language
    /// replaces it; a stale poll finding a mismatch leaves the display
    /// alone.
    pub translating: Option<TranslationProgress>,
}

impl Default for LectureView {
    fn default() -> Self {
        Self {
            lecture_id: None,
            processing: false,
            stage: None,
            progress: None,
            last_error: None,
            preferred_language: BASE_TRANSCRIPT_LANGUAGE.to_string(),
            display_language: BASE_TRANSCRIPT_LANGUAGE.to_string(),
            download_language: BASE_TRANSCRIPT_LANGUAGE.to_string(),
            language_synced: false,
            availability: LanguageAvailability::default(),
            transcript: None,
            base_transcript: None,
            results: None,
            translating: None,
        }
    }
}

impl LectureView {
    /// Put the view into the "job running" state for `lecture_id`.
    pub(crate) fn begin_processing(&mut self, lecture_id: LectureId) {
        self.lecture_id = Some(lecture_id);
        self.processing = true;
        self.stage = Some(humanize_stage(None));
        self.progress = None;
        self.last_error = None;
        self.language_synced = false;
    }

    /// Apply one `/status/{id}` payload.
    ///
    /// Non-terminal payloads update stage and progress; terminal ones
    /// leave those fields for the terminal handler to clear. The first
    /// payload carrying `preferred_language` also synchronizes the
    /// three language selections.
    pub(crate) fn apply_processing_tick(&mut self, dto: &ProcessingStatusDto) -> PollTick {
        if !self.language_synced {
            if let Some(language) = &dto.preferred_language {
                self.preferred_language = language.clone();
                self.display_language = language.clone();
                self.download_language = language.clone();
                self.language_synced = true;
            }
        }

        match dto.status {
            ProcessingStatus::Completed => PollTick::Terminal(PollOutcome::Completed),
            ProcessingStatus::Error => {
                let message = dto
                    .error
                    .clone()
                    .unwrap_or_else(|| "Processing failed.".to_string());
                PollTick::Terminal(PollOutcome::Failed(message))
            }
            ProcessingStatus::Uploading | ProcessingStatus::Processing => {
                self.stage = Some(humanize_stage(dto.stage.as_deref()));
                if dto.progress.is_some() {
                    self.progress = dto.progress;
                }
                PollTick::Continue
            }
        }
    }

    /// Leave the "job running" state.
    pub(crate) fn end_processing(&mut self) {
        self.processing = false;
        self.stage = None;
        self.progress = None;
    }

    /// Restore the held base transcript and base display language.
    /// Synchronous by design; never touches the network.
    pub(crate) fn reset_transcript_to_base(&mut self) {
        if let Some(base) = &self.base_transcript {
            self.transcript = Some(base.clone());
        }
        self.display_language = BASE_TRANSCRIPT_LANGUAGE.to_string();
        self.translating = None;
    }

    /// Whether a terminal result for `language` may still write to the
    /// displayed transcript.
    pub(crate) fn is_requested_language(&self, language: &str) -> bool {
        self.translating
            .as_ref()
            .is_some_and(|t| t.language == language)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
