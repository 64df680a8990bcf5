//! Generated content artifacts (notes and quizzes).
//!
//! A [`ContentArtifact`] is the single mutable "current document" view
//! for one lecture. `original_content` is the last-saved server content;
//! translating only ever changes the displayed `current_content` and
//! `current_language`, never the original.

use serde::{Deserialize, Serialize};

use crate::language::BASE_ARTIFACT_LANGUAGE;

/// Which generated document an endpoint or view refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Notes,
    Quiz,
}

impl ArtifactKind {
    /// URL path segment for this kind (`/notes/...` or `/quiz/...`).
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Quiz => "quiz",
        }
    }
}

/// Quiz layout requested from the generation collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizType {
    #[default]
    Standard,
    MultipleChoice,
    TrueFalse,
    FillInBlank,
    Matching,
}

/// Quiz difficulty requested from the generation collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// The current artifact view for one lecture.
#[derive(Debug, Clone)]
pub struct ContentArtifact {
    /// Text currently shown (and edited, in edit mode).
    pub current_content: String,
    /// Last-saved server content, used to revert edits and translations.
    pub original_content: String,
    /// Language of `current_content`.
    pub current_language: String,
    pub kind: ArtifactKind,
    /// Quiz-only metadata; carries defaults for notes.
    pub quiz_type: QuizType,
    pub difficulty: Difficulty,
}

impl ContentArtifact {
    /// An empty artifact of the given kind, in the base language.
    pub fn empty(kind: ArtifactKind) -> Self {
        Self {
            current_content: String::new(),
            original_content: String::new(),
            current_language: BASE_ARTIFACT_LANGUAGE.to_string(),
            kind,
            quiz_type: QuizType::default(),
            difficulty: Difficulty::default(),
        }
    }

    /// Whether any content exists at all.
    pub fn is_empty(&self) -> bool {
        self.current_content.is_empty() && self.original_content.is_empty()
    }

    /// Replace both current and original content with freshly saved
    /// server content. Fresh content is always in the base language
    /// unless the server says otherwise.
    pub fn replace(&mut self, content: String, language: Option<String>) {
        self.current_content = content.clone();
        self.original_content = content;
        self.current_language =
            language.unwrap_or_else(|| BASE_ARTIFACT_LANGUAGE.to_string());
    }

    /// Show a translation: changes only the displayed content and
    /// language, leaving `original_content` untouched.
    pub fn show_translation(&mut self, content: String, language: String) {
        self.current_content = content;
        self.current_language = language;
    }

    /// Restore the last-saved content and the base language. Always
    /// succeeds; operates purely on already-held state.
    pub fn reset_to_base(&mut self) {
        self.current_content = self.original_content.clone();
        self.current_language = BASE_ARTIFACT_LANGUAGE.to_string();
    }

    /// Concatenate historical content after the current content,
    /// separated by a blank line.
    pub fn append(&mut self, content: &str) {
        if self.current_content.is_empty() {
            self.current_content = content.to_string();
        } else {
            self.current_content = format!("{}\n\n{}", self.current_content, content);
        }
    }

    /// Clear everything back to the empty base-language state.
    pub fn clear(&mut self) {
        self.current_content.clear();
        self.original_content.clear();
        self.current_language = BASE_ARTIFACT_LANGUAGE.to_string();
        self.quiz_type = QuizType::default();
        self.difficulty = Difficulty::default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
