//! Shared identifier and timestamp aliases.

/// Opaque lecture identifier assigned by the gateway on upload.
pub type LectureId = String;

/// Opaque identifier of one artifact version in the history list.
pub type VersionId = String;

/// UTC timestamp as used in version metadata.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
