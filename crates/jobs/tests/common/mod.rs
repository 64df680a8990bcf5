//! Scripted in-memory gateway for orchestration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use lectern_core::artifact::ArtifactKind;
use lectern_core::results::LectureResults;
use lectern_core::version::ArtifactVersion;
use lectern_gateway::types::{
    ArtifactPayload, ArtifactSaved, GenerateRequest, MediaUpload, ProcessingStatusDto,
    TranslateArtifactRequest, TranslatedArtifact, TranslationStatusDto, TranslationsDto,
    UpdateRequest, UploadAccepted,
};
use lectern_gateway::{GatewayError, LectureGateway};
use lectern_jobs::{LectureView, PollerConfig};

pub const LECTURE: &str = "lec-1";

/// A poller config fast enough for tests.
pub fn fast_poller(max_attempts: u32) -> PollerConfig {
    PollerConfig {
        interval: Duration::from_millis(2),
        max_attempts,
    }
}

pub fn api_error(status: u16, message: &str) -> GatewayError {
    GatewayError::Api {
        status,
        message: message.to_string(),
    }
}

/// Spin until `predicate` holds or a bounded wait expires.
pub async fn wait_until<F>(mut predicate: F)
where
    F: FnMut() -> bool,
{
    for _ in 0..500 {
        if predicate() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("condition not reached in time");
}

/// Spin until the shared view satisfies `predicate`.
pub async fn wait_view<F>(view: &std::sync::Arc<tokio::sync::Mutex<LectureView>>, predicate: F)
where
    F: Fn(&LectureView) -> bool,
{
    for _ in 0..500 {
        if predicate(&*view.lock().await) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("view condition not reached in time");
}

/// Gateway double fed from per-endpoint scripts, with call counters for
/// asserting exactly how many network calls an operation made.
pub struct FakeGateway {
    pub statuses: Mutex<VecDeque<Result<ProcessingStatusDto, GatewayError>>>,
    pub translation_statuses: Mutex<VecDeque<Result<TranslationStatusDto, GatewayError>>>,
    pub translations: Mutex<TranslationsDto>,
    pub artifact_response: Mutex<Option<ArtifactPayload>>,
    pub generate_response: Mutex<Option<Result<ArtifactPayload, GatewayError>>>,
    pub update_response: Mutex<ArtifactSaved>,
    pub update_error: Mutex<Option<GatewayError>>,
    pub update_requests: Mutex<Vec<UpdateRequest>>,
    pub history: Mutex<Vec<ArtifactVersion>>,
    pub restore_response: Mutex<Option<ArtifactPayload>>,
    pub translate_artifact_response: Mutex<Option<Result<TranslatedArtifact, GatewayError>>>,
    pub artifact_languages: Mutex<HashMap<String, String>>,
    pub results: Mutex<LectureResults>,

    pub upload_calls: AtomicU32,
    pub status_calls: AtomicU32,
    pub translation_status_calls: AtomicU32,
    pub translate_posts: AtomicU32,
    pub transcript_calls: AtomicU32,
    pub results_calls: AtomicU32,
    pub generate_calls: AtomicU32,
    pub delete_calls: AtomicU32,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            statuses: Mutex::new(VecDeque::new()),
            translation_statuses: Mutex::new(VecDeque::new()),
            translations: Mutex::new(TranslationsDto {
                available_languages: vec![],
                supported_languages: vec![],
            }),
            artifact_response: Mutex::new(None),
            generate_response: Mutex::new(None),
            update_response: Mutex::new(ArtifactSaved {
                message: None,
                language: None,
                quiz_type: None,
                difficulty: None,
            }),
            update_error: Mutex::new(None),
            update_requests: Mutex::new(Vec::new()),
            history: Mutex::new(Vec::new()),
            restore_response: Mutex::new(None),
            translate_artifact_response: Mutex::new(None),
            artifact_languages: Mutex::new(HashMap::new()),
            results: Mutex::new(LectureResults::default()),

            upload_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            translation_status_calls: AtomicU32::new(0),
            translate_posts: AtomicU32::new(0),
            transcript_calls: AtomicU32::new(0),
            results_calls: AtomicU32::new(0),
            generate_calls: AtomicU32::new(0),
            delete_calls: AtomicU32::new(0),
        }
    }

    pub fn script_status(&self, status: Result<ProcessingStatusDto, GatewayError>) {
        self.statuses.lock().unwrap().push_back(status);
    }

    pub fn script_translation_status(&self, status: Result<TranslationStatusDto, GatewayError>) {
        self.translation_statuses.lock().unwrap().push_back(status);
    }

    pub fn set_languages(&self, available: &[&str], supported: &[&str]) {
        *self.translations.lock().unwrap() = TranslationsDto {
            available_languages: available.iter().map(|s| s.to_string()).collect(),
            supported_languages: supported.iter().map(|s| s.to_string()).collect(),
        };
    }
}

#[async_trait]
impl LectureGateway for FakeGateway {
    async fn upload_media(
        &self,
        _lecture_id: Option<&str>,
        _upload: MediaUpload,
    ) -> Result<UploadAccepted, GatewayError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        Ok(UploadAccepted {
            lecture_id: LECTURE.to_string(),
            message: None,
        })
    }

    async fn processing_status(
        &self,
        _lecture_id: &str,
    ) -> Result<ProcessingStatusDto, GatewayError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .expect("processing status script exhausted")
    }

    async fn translations(&self, _lecture_id: &str) -> Result<TranslationsDto, GatewayError> {
        Ok(self.translations.lock().unwrap().clone())
    }

    async fn translation_status(
        &self,
        _lecture_id: &str,
        _language: &str,
    ) -> Result<TranslationStatusDto, GatewayError> {
        self.translation_status_calls.fetch_add(1, Ordering::SeqCst);
        self.translation_statuses
            .lock()
            .unwrap()
            .pop_front()
            .expect("translation status script exhausted")
    }

    async fn request_translation(
        &self,
        _lecture_id: &str,
        _language: &str,
    ) -> Result<(), GatewayError> {
        self.translate_posts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn transcript(&self, _lecture_id: &str, language: &str) -> Result<String, GatewayError> {
        self.transcript_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{language} transcript"))
    }

    async fn download_transcript(
        &self,
        _lecture_id: &str,
        _language: &str,
    ) -> Result<Vec<u8>, GatewayError> {
        Ok(b"%PDF-1.4".to_vec())
    }

    async fn results(&self, _lecture_id: &str) -> Result<LectureResults, GatewayError> {
        self.results_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.lock().unwrap().clone())
    }

    async fn artifact(
        &self,
        _kind: ArtifactKind,
        _lecture_id: &str,
    ) -> Result<Option<ArtifactPayload>, GatewayError> {
        Ok(self.artifact_response.lock().unwrap().clone())
    }

    async fn generate_artifact(
        &self,
        _kind: ArtifactKind,
        _request: &GenerateRequest,
    ) -> Result<ArtifactPayload, GatewayError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.generate_response
            .lock()
            .unwrap()
            .take()
            .expect("no scripted generation response")
    }

    async fn update_artifact(
        &self,
        _kind: ArtifactKind,
        _lecture_id: &str,
        request: &UpdateRequest,
    ) -> Result<ArtifactSaved, GatewayError> {
        self.update_requests.lock().unwrap().push(request.clone());
        if let Some(e) = self.update_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(self.update_response.lock().unwrap().clone())
    }

    async fn delete_artifact(
        &self,
        _kind: ArtifactKind,
        _lecture_id: &str,
    ) -> Result<(), GatewayError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn artifact_history(
        &self,
        _kind: ArtifactKind,
        _lecture_id: &str,
    ) -> Result<Vec<ArtifactVersion>, GatewayError> {
        Ok(self.history.lock().unwrap().clone())
    }

    async fn restore_version(
        &self,
        _kind: ArtifactKind,
        _lecture_id: &str,
        _version_id: &str,
    ) -> Result<ArtifactPayload, GatewayError> {
        Ok(self
            .restore_response
            .lock()
            .unwrap()
            .clone()
            .expect("no scripted restore response"))
    }

    async fn translate_artifact(
        &self,
        _kind: ArtifactKind,
        _lecture_id: &str,
        _request: &TranslateArtifactRequest,
    ) -> Result<TranslatedArtifact, GatewayError> {
        self.translate_artifact_response
            .lock()
            .unwrap()
            .take()
            .expect("no scripted artifact translation response")
    }

    async fn supported_artifact_languages(
        &self,
        _kind: ArtifactKind,
    ) -> Result<HashMap<String, String>, GatewayError> {
        Ok(self.artifact_languages.lock().unwrap().clone())
    }
}
