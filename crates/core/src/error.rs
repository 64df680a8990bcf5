//! Domain-level error type.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input rejected before any network call (missing file, empty
    /// prompt, unsupported language, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The requested operation conflicts with the current view state
    /// (e.g. editing while a translation is in flight).
    #[error("Conflict: {0}")]
    Conflict(String),
}
