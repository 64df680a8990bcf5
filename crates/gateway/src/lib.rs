//! REST gateway contract and HTTP client for the Lectern backend.
//!
//! [`LectureGateway`] is the seam between orchestration logic and the
//! network: the orchestration crate only ever talks to the trait, so
//! tests can substitute a scripted fake. [`HttpGateway`] is the real
//! implementation over [`reqwest`] with bearer authentication.

pub mod config;
pub mod error;
pub mod http;
pub mod types;

use std::collections::HashMap;

use async_trait::async_trait;
use lectern_core::artifact::ArtifactKind;
use lectern_core::results::LectureResults;
use lectern_core::version::ArtifactVersion;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpGateway;
use types::{
    ArtifactPayload, ArtifactSaved, GenerateRequest, MediaUpload, ProcessingStatusDto,
    TranslateArtifactRequest, TranslatedArtifact, TranslationStatusDto, TranslationsDto,
    UpdateRequest, UploadAccepted,
};

/// The REST API surface this client consumes.
///
/// One method per endpoint. All calls carry the session's bearer
/// credential; a `401` is passed through as an API error for the
/// surrounding shell to interpret.
#[async_trait]
pub trait LectureGateway: Send + Sync {
    // ---- media processing ----

    /// `POST /upload` (new job) or `POST /upload/{id}` (re-upload).
    async fn upload_media(
        &self,
        lecture_id: Option<&str>,
        upload: MediaUpload,
    ) -> Result<UploadAccepted, GatewayError>;

    /// `GET /status/{id}`.
    async fn processing_status(
        &self,
        lecture_id: &str,
    ) -> Result<ProcessingStatusDto, GatewayError>;

    // ---- transcript translation ----

    /// `GET /translations?lecture_id=`.
    async fn translations(&self, lecture_id: &str) -> Result<TranslationsDto, GatewayError>;

    /// `GET /translation-status/{id}?language=`.
    async fn translation_status(
        &self,
        lecture_id: &str,
        language: &str,
    ) -> Result<TranslationStatusDto, GatewayError>;

    /// `POST /translate`. Idempotent on the server for an already
    /// running `(lecture, language)` job.
    async fn request_translation(
        &self,
        lecture_id: &str,
        language: &str,
    ) -> Result<(), GatewayError>;

    /// `GET /transcript/{id}?language=`.
    async fn transcript(&self, lecture_id: &str, language: &str) -> Result<String, GatewayError>;

    /// `GET /transcript/{id}/download?language=` (binary document).
    async fn download_transcript(
        &self,
        lecture_id: &str,
        language: &str,
    ) -> Result<Vec<u8>, GatewayError>;

    /// `GET /results/{id}`.
    async fn results(&self, lecture_id: &str) -> Result<LectureResults, GatewayError>;

    // ---- generated artifacts ----

    /// `GET /{notes|quiz}/get/{id}`. `Ok(None)` when the artifact does
    /// not exist yet (404 or an explicit not-found body).
    async fn artifact(
        &self,
        kind: ArtifactKind,
        lecture_id: &str,
    ) -> Result<Option<ArtifactPayload>, GatewayError>;

    /// `POST /{notes|quiz}/generate`.
    async fn generate_artifact(
        &self,
        kind: ArtifactKind,
        request: &GenerateRequest,
    ) -> Result<ArtifactPayload, GatewayError>;

    /// `PUT /{notes|quiz}/update/{id}`.
    async fn update_artifact(
        &self,
        kind: ArtifactKind,
        lecture_id: &str,
        request: &UpdateRequest,
    ) -> Result<ArtifactSaved, GatewayError>;

    /// `DELETE /{notes|quiz}/delete/{id}`.
    async fn delete_artifact(&self, kind: ArtifactKind, lecture_id: &str)
        -> Result<(), GatewayError>;

    /// `GET /{notes|quiz}/history/{id}`.
    async fn artifact_history(
        &self,
        kind: ArtifactKind,
        lecture_id: &str,
    ) -> Result<Vec<ArtifactVersion>, GatewayError>;

    /// `POST /{notes|quiz}/restore/{id}/{versionId}`. Makes the version
    /// canonical server-side and returns the restored content.
    async fn restore_version(
        &self,
        kind: ArtifactKind,
        lecture_id: &str,
        version_id: &str,
    ) -> Result<ArtifactPayload, GatewayError>;

    /// `POST /{notes|quiz}/translate/{id}`.
    async fn translate_artifact(
        &self,
        kind: ArtifactKind,
        lecture_id: &str,
        request: &TranslateArtifactRequest,
    ) -> Result<TranslatedArtifact, GatewayError>;

    /// `GET /{notes|quiz}/supported-languages` (code -> display name).
    async fn supported_artifact_languages(
        &self,
        kind: ArtifactKind,
    ) -> Result<HashMap<String, String>, GatewayError>;
}
