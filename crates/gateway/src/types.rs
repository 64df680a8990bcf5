//! Request and response types for the gateway endpoints.
//!
//! Response structs tolerate sparse payloads: the backend frequently
//! omits fields, and notes/quiz endpoints use kind-specific content
//! keys (`notes_content` / `quiz_content`) that deserialize into one
//! `content` field via serde aliases.

use serde::{Deserialize, Serialize};

use lectern_core::artifact::{Difficulty, QuizType};
use lectern_core::language::LanguageAvailability;
use lectern_core::status::{ProcessingStatus, TranslationStatus};
use lectern_core::types::LectureId;

// ---------------------------------------------------------------------------
// Media upload
// ---------------------------------------------------------------------------

/// A media file selected for upload, plus the language the lecture was
/// delivered in.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub preferred_language: String,
}

/// Response to a successful upload submission.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadAccepted {
    pub lecture_id: LectureId,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Processing status
// ---------------------------------------------------------------------------

/// Payload of `GET /status/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingStatusDto {
    pub status: ProcessingStatus,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub preferred_language: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Transcript translation
// ---------------------------------------------------------------------------

/// Payload of `GET /translations?lecture_id=`.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationsDto {
    #[serde(default)]
    pub available_languages: Vec<String>,
    #[serde(default)]
    pub supported_languages: Vec<String>,
}

impl From<TranslationsDto> for LanguageAvailability {
    /// Empty lists fall back to the defaults, matching the shell's
    /// behavior when the endpoint returns nothing useful.
    fn from(dto: TranslationsDto) -> Self {
        let defaults = LanguageAvailability::default();
        Self {
            available: if dto.available_languages.is_empty() {
                defaults.available
            } else {
                dto.available_languages
            },
            supported: if dto.supported_languages.is_empty() {
                defaults.supported
            } else {
                dto.supported_languages
            },
        }
    }
}

/// Payload of `GET /translation-status/{id}?language=`.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationStatusDto {
    pub status: TranslationStatus,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Generated artifacts
// ---------------------------------------------------------------------------

/// Raw artifact response envelope; `into_payload` resolves the
/// "exists or not" ambiguity (absent content or an explicit
/// `not_found` status both mean the artifact does not exist yet).
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactContentDto {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "notes_content", alias = "quiz_content")]
    pub content: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub quiz_type: Option<QuizType>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl ArtifactContentDto {
    pub fn into_payload(self) -> Option<ArtifactPayload> {
        if self.status.as_deref() == Some("not_found") {
            return None;
        }
        let content = self.content?;
        Some(ArtifactPayload {
            content,
            language: self.language,
            quiz_type: self.quiz_type,
            difficulty: self.difficulty,
        })
    }
}

/// Artifact content as delivered by get/generate/restore.
#[derive(Debug, Clone)]
pub struct ArtifactPayload {
    pub content: String,
    pub language: Option<String>,
    pub quiz_type: Option<QuizType>,
    pub difficulty: Option<Difficulty>,
}

/// Response to a content update; the server echoes metadata but not
/// the content itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactSaved {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub quiz_type: Option<QuizType>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// Body of `POST /{notes|quiz}/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub user_prompt: String,
    pub lecture_id: LectureId,
    /// Transcript excerpt given to the generator as context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    /// Prior content given to the generator as context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_type: Option<QuizType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

/// Body of `PUT /{notes|quiz}/update/{id}`. The content key is
/// kind-specific, so the HTTP layer builds the body itself.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub content: String,
    /// Set when editing a historical version rather than the live one.
    pub version_id: Option<String>,
    pub quiz_type: Option<QuizType>,
    pub difficulty: Option<Difficulty>,
}

/// Body of `POST /{notes|quiz}/translate/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct TranslateArtifactRequest {
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

/// Response to an artifact translation.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslatedArtifact {
    pub translated_content: String,
    #[serde(default)]
    pub language_name: Option<String>,
}

/// Payload of `GET /{notes|quiz}/supported-languages`.
#[derive(Debug, Clone, Deserialize)]
pub struct SupportedLanguagesDto {
    #[serde(default)]
    pub supported_languages: std::collections::HashMap<String, String>,
}

/// Payload of `GET /{notes|quiz}/history/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryDto {
    #[serde(default)]
    pub history: Vec<lectern_core::version::ArtifactVersion>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_content_key_maps_to_content() {
        let dto: ArtifactContentDto = serde_json::from_str(
            r##"{"status": "success", "notes_content": "# Notes", "language": "en"}"##,
        )
        .unwrap();
        let payload = dto.into_payload().unwrap();
        assert_eq!(payload.content, "# Notes");
        assert_eq!(payload.language.as_deref(), Some("en"));
    }

    #[test]
    fn quiz_content_key_maps_to_content() {
        let dto: ArtifactContentDto = serde_json::from_str(
            r#"{"quiz_content": "Q1", "quiz_type": "true-false", "difficulty": "hard"}"#,
        )
        .unwrap();
        let payload = dto.into_payload().unwrap();
        assert_eq!(payload.content, "Q1");
        assert_eq!(payload.quiz_type, Some(QuizType::TrueFalse));
        assert_eq!(payload.difficulty, Some(Difficulty::Hard));
    }

    #[test]
    fn not_found_status_means_no_payload() {
        let dto: ArtifactContentDto =
            serde_json::from_str(r#"{"status": "not_found"}"#).unwrap();
        assert!(dto.into_payload().is_none());
    }

    #[test]
    fn missing_content_means_no_payload() {
        let dto: ArtifactContentDto = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(dto.into_payload().is_none());
    }

    #[test]
    fn empty_translations_fall_back_to_defaults() {
        let dto = TranslationsDto {
            available_languages: vec![],
            supported_languages: vec![],
        };
        let avail: LanguageAvailability = dto.into();
        assert!(avail.is_available("english"));
        assert!(avail.is_supported("hindi"));
    }

    #[test]
    fn populated_translations_pass_through() {
        let dto = TranslationsDto {
            available_languages: vec!["english".into(), "hindi".into()],
            supported_languages: vec!["english".into(), "hindi".into(), "telugu".into()],
        };
        let avail: LanguageAvailability = dto.into();
        assert!(avail.is_available("hindi"));
        assert!(!avail.is_available("telugu"));
    }

    #[test]
    fn generate_request_omits_absent_quiz_fields() {
        let req = GenerateRequest {
            user_prompt: "summarize".into(),
            lecture_id: "lec-1".into(),
            transcript: None,
            last_notes: None,
            quiz_type: None,
            difficulty: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("quiz_type").is_none());
        assert!(json.get("last_notes").is_none());
    }
}
