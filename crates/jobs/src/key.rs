//! Poll loop keys.
//!
//! Dedup-by-key is the concurrency-control discipline of this crate: at
//! most one live poll loop exists per [`JobKey`], which is the only
//! mechanism preventing two logical operations from racing on the same
//! server-side job.

use std::fmt;

use lectern_core::types::LectureId;

/// Identifies one server-side job being observed by polling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobKey {
    /// The media-processing job of a lecture.
    Processing(LectureId),
    /// One per-language translation sub-job of a lecture's transcript.
    Translation {
        lecture_id: LectureId,
        language: String,
    },
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processing(id) => write!(f, "processing/{id}"),
            Self::Translation {
                lecture_id,
                language,
            } => write!(f, "translation/{lecture_id}/{language}"),
        }
    }
}
