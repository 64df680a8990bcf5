//! One lecture screen's orchestration bundle.
//!
//! [`LectureSession`] wires the shared view, event bus, and poll
//! registry into a processing tracker and translation orchestrator,
//! and owns their teardown: dropping the screen must call
//! [`shutdown`](LectureSession::shutdown) so no poll loop keeps firing
//! network calls against a view nobody is looking at.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use lectern_core::artifact::ArtifactKind;
use lectern_core::types::LectureId;
use lectern_gateway::LectureGateway;

use crate::artifact::ArtifactManager;
use crate::events::{EventBus, JobEvent};
use crate::processing::ProcessingTracker;
use crate::registry::PollRegistry;
use crate::translation::TranslationOrchestrator;
use crate::view::LectureView;

pub struct LectureSession {
    gateway: Arc<dyn LectureGateway>,
    registry: Arc<PollRegistry>,
    view: Arc<Mutex<LectureView>>,
    events: Arc<EventBus>,
    processing: ProcessingTracker,
    translation: TranslationOrchestrator,
}

impl LectureSession {
    pub fn new(gateway: Arc<dyn LectureGateway>) -> Self {
        let registry = PollRegistry::new();
        let view = Arc::new(Mutex::new(LectureView::default()));
        let events = Arc::new(EventBus::new());
        let processing = ProcessingTracker::new(
            Arc::clone(&gateway),
            Arc::clone(&registry),
            Arc::clone(&view),
            Arc::clone(&events),
        );
        let translation = TranslationOrchestrator::new(
            Arc::clone(&gateway),
            Arc::clone(&registry),
            Arc::clone(&view),
            Arc::clone(&events),
        );
        Self {
            gateway,
            registry,
            view,
            events,
            processing,
            translation,
        }
    }

    pub fn processing(&self) -> &ProcessingTracker {
        &self.processing
    }

    pub fn translation(&self) -> &TranslationOrchestrator {
        &self.translation
    }

    /// Build the notes-or-quiz manager for `lecture_id`, sharing this
    /// session's gateway and event bus.
    pub fn artifact_manager(&self, kind: ArtifactKind, lecture_id: LectureId) -> ArtifactManager {
        ArtifactManager::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.events),
            kind,
            lecture_id,
        )
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> LectureView {
        self.view.lock().await.clone()
    }

    /// Cancel every outstanding poll loop. Must run on view teardown.
    pub async fn shutdown(&self) {
        self.registry.shutdown().await;
    }
}
