//! Job status enums and progress-stage formatting.
//!
//! Statuses mirror the values reported by the `/status/{id}` and
//! `/translation-status/{id}` endpoints. A poll loop keeps running on
//! non-terminal statuses and stops on terminal ones (or on its local
//! attempt-budget timeout, which the server never reports).

use serde::{Deserialize, Serialize};

/// Stage label shown before the first status payload arrives, or when a
/// payload carries no stage at all.
pub const DEFAULT_STAGE: &str = "preparing";

/// Status of a media-processing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Uploading,
    Processing,
    Completed,
    Error,
}

impl ProcessingStatus {
    /// Whether this status ends the poll loop.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// Status of one per-language translation sub-job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStatus {
    NotStarted,
    Processing,
    Completed,
    Error,
}

impl TranslationStatus {
    /// Whether this status ends the poll loop.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// Turn a raw stage label into a human-readable one by replacing
/// separator characters with spaces.
///
/// Falls back to [`DEFAULT_STAGE`] when the payload carried no stage.
pub fn humanize_stage(stage: Option<&str>) -> String {
    match stage {
        Some(raw) if !raw.is_empty() => raw.replace(['_', '-'], " "),
        _ => DEFAULT_STAGE.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
