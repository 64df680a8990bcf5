//! Broadcast notifications for job and artifact state changes.
//!
//! Orchestration components mutate shared view state and then announce
//! the change on a broadcast channel. Subscribers (a UI shell, tests)
//! receive events without any direct coupling to the mutating code.

use tokio::sync::broadcast;

use lectern_core::artifact::ArtifactKind;
use lectern_core::types::LectureId;

/// Capacity of the event channel. Slow subscribers that fall further
/// behind than this lag and lose the oldest events.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Something observable happened to a job or an artifact.
#[derive(Debug, Clone)]
pub enum JobEvent {
    /// A processing status poll delivered a non-terminal update.
    ProcessingProgress {
        lecture_id: LectureId,
        stage: String,
        progress: Option<u8>,
    },
    /// The processing job finished and the lecture surfaces were
    /// refreshed.
    ProcessingCompleted { lecture_id: LectureId },
    /// The processing job failed or its poll budget ran out.
    ProcessingFailed {
        lecture_id: LectureId,
        message: String,
    },
    /// A transcript translation finished.
    TranslationCompleted {
        lecture_id: LectureId,
        language: String,
    },
    /// A transcript translation failed or timed out.
    TranslationFailed {
        lecture_id: LectureId,
        language: String,
        message: String,
    },
    /// The canonical content of an artifact changed (generate, save,
    /// restore, delete).
    ArtifactChanged {
        lecture_id: LectureId,
        kind: ArtifactKind,
    },
}

/// Shared broadcast sender for [`JobEvent`]s.
pub struct EventBus {
    tx: broadcast::Sender<JobEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.tx.subscribe()
    }

    /// Send an event. A send with no live subscribers is not an error.
    pub fn emit(&self, event: JobEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
