//! Artifact version history.
//!
//! History entries are immutable point-in-time snapshots. The list order
//! on the wire is not guaranteed; consumers must rely on `created_at`
//! and `is_current`, never on position. At most one version is current,
//! matching the server's canonical content.

use serde::{Deserialize, Serialize};

use crate::artifact::{Difficulty, QuizType};
use crate::language::BASE_ARTIFACT_LANGUAGE;
use crate::types::{Timestamp, VersionId};

/// Prompt label used when the server recorded no user prompt (manual
/// edits have none).
pub const FALLBACK_PROMPT: &str = "Manual edit";

/// One immutable snapshot in an artifact's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactVersion {
    pub version_id: VersionId,
    pub created_at: Timestamp,
    /// Snapshot text. The wire uses a kind-specific key.
    #[serde(alias = "notes_content", alias = "quiz_content")]
    pub content: String,
    /// What produced this version.
    #[serde(default = "default_prompt")]
    pub user_prompt: String,
    /// Whether this version matches the server's canonical content.
    #[serde(default)]
    pub is_current: bool,
    /// Whether this version may be loaded into the edit buffer.
    #[serde(default = "default_editable")]
    pub editable: bool,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub language_name: Option<String>,
    /// Back-reference to the version this one was translated from.
    #[serde(default)]
    pub translated_from: Option<VersionId>,
    #[serde(default)]
    pub quiz_type: QuizType,
    #[serde(default)]
    pub difficulty: Difficulty,
}

fn default_prompt() -> String {
    FALLBACK_PROMPT.to_string()
}

fn default_editable() -> bool {
    true
}

fn default_language() -> String {
    BASE_ARTIFACT_LANGUAGE.to_string()
}

/// Find the canonical version, if the history has one.
pub fn find_current(history: &[ArtifactVersion]) -> Option<&ArtifactVersion> {
    history.iter().find(|v| v.is_current)
}

/// Find a version by id.
pub fn find_version<'a>(
    history: &'a [ArtifactVersion],
    version_id: &str,
) -> Option<&'a ArtifactVersion> {
    history.iter().find(|v| v.version_id == version_id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
