//! Generated-artifact lifecycle management.
//!
//! [`ArtifactManager`] owns the single mutable notes-or-quiz view for a
//! lecture: current content, edit buffer, version history, supported
//! translation languages, and the chat transcript that drives
//! generation. Editing and translating are mutually exclusive modes,
//! enforced here rather than at any UI layer, because chat, history,
//! and translation can all request a content change.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use lectern_core::artifact::{ArtifactKind, ContentArtifact, Difficulty, QuizType};
use lectern_core::types::{LectureId, VersionId};
use lectern_core::version::{find_version, ArtifactVersion};
use lectern_gateway::types::{GenerateRequest, TranslateArtifactRequest, UpdateRequest};
use lectern_gateway::LectureGateway;

use crate::error::JobError;
use crate::events::{EventBus, JobEvent};

/// Who said what in the generation chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Bot,
}

/// One chat transcript entry.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// What to do with a selected historical version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionAction {
    /// Concatenate after the current content, blank-line separated.
    Append,
    /// Load into the edit buffer.
    Edit,
    /// Make it canonical server-side.
    Restore,
}

/// Snapshot of the artifact view.
#[derive(Debug, Clone)]
pub struct ArtifactState {
    pub artifact: ContentArtifact,
    /// Set while a historical version is loaded in the edit buffer.
    pub selected_version: Option<VersionId>,
    pub editing: bool,
    pub translating: bool,
    /// A delete was requested and awaits confirmation.
    pub pending_delete: bool,
    pub history: Vec<ArtifactVersion>,
    /// Translation language code to display name.
    pub supported_languages: HashMap<String, String>,
    pub messages: Vec<ChatMessage>,
}

/// Manages one lecture's notes or quiz document.
pub struct ArtifactManager {
    gateway: Arc<dyn LectureGateway>,
    events: Arc<EventBus>,
    kind: ArtifactKind,
    lecture_id: LectureId,
    state: Mutex<ArtifactState>,
}

impl ArtifactManager {
    pub fn new(
        gateway: Arc<dyn LectureGateway>,
        events: Arc<EventBus>,
        kind: ArtifactKind,
        lecture_id: LectureId,
    ) -> Self {
        let greeting = match kind {
            ArtifactKind::Notes => {
                "Hi! Describe the notes you want and I will generate them from the lecture."
            }
            ArtifactKind::Quiz => {
                "Hi! Describe the quiz you want and I will generate it from the lecture."
            }
        };
        Self {
            gateway,
            events,
            kind,
            lecture_id,
            state: Mutex::new(ArtifactState {
                artifact: ContentArtifact::empty(kind),
                selected_version: None,
                editing: false,
                translating: false,
                pending_delete: false,
                history: Vec::new(),
                supported_languages: HashMap::new(),
                messages: vec![ChatMessage {
                    role: ChatRole::Bot,
                    text: greeting.to_string(),
                }],
            }),
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub async fn snapshot(&self) -> ArtifactState {
        self.state.lock().await.clone()
    }

    /// Fetch the canonical current content. An artifact that does not
    /// exist yet is a normal empty state, not an error.
    pub async fn load_current(&self) -> Result<(), JobError> {
        let payload = self.gateway.artifact(self.kind, &self.lecture_id).await?;
        let mut state = self.state.lock().await;
        match payload {
            Some(payload) => {
                state.artifact.replace(payload.content, payload.language);
                if let Some(quiz_type) = payload.quiz_type {
                    state.artifact.quiz_type = quiz_type;
                }
                if let Some(difficulty) = payload.difficulty {
                    state.artifact.difficulty = difficulty;
                }
            }
            None => state.artifact.clear(),
        }
        Ok(())
    }

    /// Fetch the code-to-name map of translation languages.
    pub async fn load_supported_languages(&self) -> Result<(), JobError> {
        let languages = self.gateway.supported_artifact_languages(self.kind).await?;
        self.state.lock().await.supported_languages = languages;
        Ok(())
    }

    pub async fn load_history(&self) -> Result<(), JobError> {
        let history = self
            .gateway
            .artifact_history(self.kind, &self.lecture_id)
            .await?;
        self.state.lock().await.history = history;
        Ok(())
    }

    /// Quiz layout and difficulty for subsequent generations.
    pub async fn set_quiz_options(&self, quiz_type: QuizType, difficulty: Difficulty) {
        let mut state = self.state.lock().await;
        state.artifact.quiz_type = quiz_type;
        state.artifact.difficulty = difficulty;
    }

    /// Send `prompt` to the generation collaborator with the prior
    /// content as context.
    ///
    /// Generation failures are surfaced as a chat message and leave the
    /// prior content untouched; the returned `Result` only covers
    /// rejections that happen before the request is sent.
    pub async fn generate(&self, prompt: &str, transcript: Option<String>) -> Result<(), JobError> {
        if prompt.trim().is_empty() {
            return Err(JobError::Validation("Prompt must not be empty.".to_string()));
        }

        let request = {
            let mut state = self.state.lock().await;
            if state.editing {
                return Err(JobError::Conflict(
                    "Finish editing before generating.".to_string(),
                ));
            }
            state.messages.push(ChatMessage {
                role: ChatRole::User,
                text: prompt.to_string(),
            });

            let last_content = (!state.artifact.original_content.is_empty())
                .then(|| state.artifact.original_content.clone());
            let (quiz_type, difficulty) = match self.kind {
                ArtifactKind::Quiz => (
                    Some(state.artifact.quiz_type),
                    Some(state.artifact.difficulty),
                ),
                ArtifactKind::Notes => (None, None),
            };
            GenerateRequest {
                user_prompt: prompt.to_string(),
                lecture_id: self.lecture_id.clone(),
                transcript,
                last_notes: last_content,
                quiz_type,
                difficulty,
            }
        };

        match self.gateway.generate_artifact(self.kind, &request).await {
            Ok(payload) => {
                let mut state = self.state.lock().await;
                state.artifact.replace(payload.content.clone(), None);
                if let Some(quiz_type) = payload.quiz_type {
                    state.artifact.quiz_type = quiz_type;
                }
                if let Some(difficulty) = payload.difficulty {
                    state.artifact.difficulty = difficulty;
                }
                state.selected_version = None;
                state.messages.push(ChatMessage {
                    role: ChatRole::Bot,
                    text: payload.content,
                });
                tracing::info!(lecture_id = %self.lecture_id, kind = ?self.kind, "Artifact generated");
                self.events.emit(JobEvent::ArtifactChanged {
                    lecture_id: self.lecture_id.clone(),
                    kind: self.kind,
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(lecture_id = %self.lecture_id, kind = ?self.kind, error = %e, "Generation failed");
                self.state.lock().await.messages.push(ChatMessage {
                    role: ChatRole::Bot,
                    text: e.to_string(),
                });
                Ok(())
            }
        }
    }

    pub async fn begin_edit(&self) -> Result<(), JobError> {
        let mut state = self.state.lock().await;
        if state.translating {
            return Err(JobError::Conflict(
                "Cannot edit while a translation is in progress.".to_string(),
            ));
        }
        state.editing = true;
        Ok(())
    }

    /// Replace the edit buffer. Only meaningful in edit mode.
    pub async fn set_draft(&self, content: &str) -> Result<(), JobError> {
        let mut state = self.state.lock().await;
        if !state.editing {
            return Err(JobError::Conflict("Not in edit mode.".to_string()));
        }
        state.artifact.current_content = content.to_string();
        Ok(())
    }

    /// Drop the edit buffer and restore the last-saved content.
    pub async fn cancel_edit(&self) {
        let mut state = self.state.lock().await;
        state.artifact.current_content = state.artifact.original_content.clone();
        state.selected_version = None;
        state.editing = false;
    }

    /// Persist the edit buffer. On failure, edit mode and the buffer
    /// are kept so the user's text is not lost.
    pub async fn save_edit(&self) -> Result<(), JobError> {
        let request = {
            let state = self.state.lock().await;
            if !state.editing {
                return Err(JobError::Conflict("Not in edit mode.".to_string()));
            }
            let (quiz_type, difficulty) = match self.kind {
                ArtifactKind::Quiz => (
                    Some(state.artifact.quiz_type),
                    Some(state.artifact.difficulty),
                ),
                ArtifactKind::Notes => (None, None),
            };
            UpdateRequest {
                content: state.artifact.current_content.clone(),
                version_id: state.selected_version.clone(),
                quiz_type,
                difficulty,
            }
        };

        let saved = self
            .gateway
            .update_artifact(self.kind, &self.lecture_id, &request)
            .await?;

        let mut state = self.state.lock().await;
        state.artifact.original_content = state.artifact.current_content.clone();
        state.artifact.current_language = saved
            .language
            .unwrap_or_else(|| lectern_core::language::BASE_ARTIFACT_LANGUAGE.to_string());
        if let Some(quiz_type) = saved.quiz_type {
            state.artifact.quiz_type = quiz_type;
        }
        if let Some(difficulty) = saved.difficulty {
            state.artifact.difficulty = difficulty;
        }
        state.selected_version = None;
        state.editing = false;
        tracing::info!(lecture_id = %self.lecture_id, kind = ?self.kind, "Artifact saved");
        self.events.emit(JobEvent::ArtifactChanged {
            lecture_id: self.lecture_id.clone(),
            kind: self.kind,
        });
        Ok(())
    }

    /// Act on a version from the loaded history.
    pub async fn select_version(
        &self,
        version_id: &str,
        action: VersionAction,
    ) -> Result<(), JobError> {
        match action {
            VersionAction::Append => {
                let mut state = self.state.lock().await;
                let version = require_version(&state.history, version_id)?;
                let content = version.content.clone();
                state.artifact.append(&content);
                Ok(())
            }
            VersionAction::Edit => {
                let mut state = self.state.lock().await;
                if state.translating {
                    return Err(JobError::Conflict(
                        "Cannot edit while a translation is in progress.".to_string(),
                    ));
                }
                let version = require_version(&state.history, version_id)?;
                if !version.editable {
                    return Err(JobError::Conflict(
                        "This version cannot be edited.".to_string(),
                    ));
                }
                let content = version.content.clone();
                state.artifact.current_content = content;
                state.selected_version = Some(version_id.to_string());
                state.editing = true;
                Ok(())
            }
            VersionAction::Restore => {
                {
                    let state = self.state.lock().await;
                    require_version(&state.history, version_id)?;
                }
                let payload = self
                    .gateway
                    .restore_version(self.kind, &self.lecture_id, version_id)
                    .await?;
                let history = self
                    .gateway
                    .artifact_history(self.kind, &self.lecture_id)
                    .await?;

                let mut state = self.state.lock().await;
                state.artifact.replace(payload.content, payload.language);
                if let Some(quiz_type) = payload.quiz_type {
                    state.artifact.quiz_type = quiz_type;
                }
                if let Some(difficulty) = payload.difficulty {
                    state.artifact.difficulty = difficulty;
                }
                state.history = history;
                state.selected_version = None;
                state.editing = false;
                tracing::info!(
                    lecture_id = %self.lecture_id,
                    kind = ?self.kind,
                    version_id,
                    "Version restored"
                );
                self.events.emit(JobEvent::ArtifactChanged {
                    lecture_id: self.lecture_id.clone(),
                    kind: self.kind,
                });
                Ok(())
            }
        }
    }

    /// First phase of deletion: mark the delete as pending.
    pub async fn request_delete(&self) {
        self.state.lock().await.pending_delete = true;
    }

    pub async fn cancel_delete(&self) {
        self.state.lock().await.pending_delete = false;
    }

    /// Second phase: commit a previously requested delete.
    pub async fn confirm_delete(&self) -> Result<(), JobError> {
        {
            let state = self.state.lock().await;
            if !state.pending_delete {
                return Err(JobError::Conflict(
                    "No delete is awaiting confirmation.".to_string(),
                ));
            }
        }
        self.gateway
            .delete_artifact(self.kind, &self.lecture_id)
            .await?;

        let mut state = self.state.lock().await;
        state.artifact.clear();
        state.history.clear();
        state.selected_version = None;
        state.editing = false;
        state.pending_delete = false;
        tracing::info!(lecture_id = %self.lecture_id, kind = ?self.kind, "Artifact deleted");
        self.events.emit(JobEvent::ArtifactChanged {
            lecture_id: self.lecture_id.clone(),
            kind: self.kind,
        });
        Ok(())
    }

    /// Translate the displayed content into `language` (a short code
    /// from the supported-languages map).
    ///
    /// A failed translation leaves the displayed content and language
    /// exactly as they were.
    pub async fn translate(&self, language: &str) -> Result<(), JobError> {
        {
            let mut state = self.state.lock().await;
            if state.editing {
                return Err(JobError::Conflict(
                    "Finish editing before translating.".to_string(),
                ));
            }
            if !state.supported_languages.is_empty()
                && !state.supported_languages.contains_key(language)
            {
                return Err(JobError::Validation(format!(
                    "Language '{language}' is not supported for this artifact."
                )));
            }
            state.translating = true;
        }

        let request = TranslateArtifactRequest {
            language: language.to_string(),
            version_id: None,
        };
        let result = self
            .gateway
            .translate_artifact(self.kind, &self.lecture_id, &request)
            .await;

        let mut state = self.state.lock().await;
        state.translating = false;
        match result {
            Ok(translated) => {
                state
                    .artifact
                    .show_translation(translated.translated_content, language.to_string());
                tracing::info!(lecture_id = %self.lecture_id, kind = ?self.kind, language, "Artifact translated");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(lecture_id = %self.lecture_id, kind = ?self.kind, language, error = %e, "Artifact translation failed");
                Err(e.into())
            }
        }
    }

    /// Restore the last-saved content and the base language. No network.
    pub async fn reset_to_base(&self) {
        let mut state = self.state.lock().await;
        state.artifact.reset_to_base();
        state.selected_version = None;
    }
}

fn require_version<'a>(
    history: &'a [ArtifactVersion],
    version_id: &str,
) -> Result<&'a ArtifactVersion, JobError> {
    find_version(history, version_id)
        .ok_or_else(|| JobError::Validation(format!("Unknown version '{version_id}'.")))
}
