//! Asynchronous job and artifact orchestration for lecture views.
//!
//! The backend does the heavy lifting (transcription, translation,
//! content generation); this crate drives it from the client side. A
//! [`PollRegistry`](registry::PollRegistry) runs at most one bounded
//! poll loop per job key, the [`ProcessingTracker`](processing::ProcessingTracker)
//! tracks a media-processing job from upload to completion, the
//! [`TranslationOrchestrator`](translation::TranslationOrchestrator)
//! manages independent per-language translation sub-jobs, and the
//! [`ArtifactManager`](artifact::ArtifactManager) owns the versioned
//! notes/quiz document. [`LectureSession`](session::LectureSession)
//! bundles them for one screen and owns poll-loop teardown.

pub mod artifact;
pub mod error;
pub mod events;
pub mod key;
pub mod poller;
pub mod processing;
pub mod registry;
pub mod session;
pub mod translation;
pub mod view;

pub use artifact::{ArtifactManager, ArtifactState, ChatMessage, ChatRole, VersionAction};
pub use error::JobError;
pub use events::{EventBus, JobEvent};
pub use key::JobKey;
pub use poller::{PollOutcome, PollTick, PollerConfig};
pub use processing::ProcessingTracker;
pub use registry::PollRegistry;
pub use session::LectureSession;
pub use translation::TranslationOrchestrator;
pub use view::{LectureView, TranslationProgress};
