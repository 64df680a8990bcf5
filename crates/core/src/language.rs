//! Language availability tracking for lecture transcripts and artifacts.
//!
//! Two naming schemes coexist on the wire: transcript endpoints use full
//! language names ("english", "hindi"), artifact endpoints use short codes
//! ("en", "hi") plus a code-to-name map from the supported-languages
//! endpoint. Both treat the base language as always available once the
//! base content exists.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Base language of transcripts, by full name.
pub const BASE_TRANSCRIPT_LANGUAGE: &str = "english";

/// Base language of generated artifacts, by short code.
pub const BASE_ARTIFACT_LANGUAGE: &str = "en";

/// Per-lecture sets of finalized ("available") versus offered
/// ("supported") translation languages, as reported by `/translations`.
///
/// Invariant: available is a subset of supported, and the base language
/// is always available once the base content exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageAvailability {
    pub available: Vec<String>,
    pub supported: Vec<String>,
}

impl Default for LanguageAvailability {
    fn default() -> Self {
        Self {
            available: vec![BASE_TRANSCRIPT_LANGUAGE.to_string()],
            supported: vec![
                BASE_TRANSCRIPT_LANGUAGE.to_string(),
                "hindi".to_string(),
                "telugu".to_string(),
            ],
        }
    }
}

impl LanguageAvailability {
    /// Whether finalized content exists in `language`.
    ///
    /// The base language counts as available regardless of what the
    /// server listed.
    pub fn is_available(&self, language: &str) -> bool {
        language == BASE_TRANSCRIPT_LANGUAGE || self.available.iter().any(|l| l == language)
    }

    /// Whether the system offers translation into `language` at all.
    pub fn is_supported(&self, language: &str) -> bool {
        language == BASE_TRANSCRIPT_LANGUAGE || self.supported.iter().any(|l| l == language)
    }

    /// Reject a translation target before any network call is made.
    pub fn validate_supported(&self, language: &str) -> Result<(), CoreError> {
        if self.is_supported(language) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Language '{language}' is not supported. Supported languages: {}",
                self.supported.join(", ")
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
