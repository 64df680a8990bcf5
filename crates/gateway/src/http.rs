//! Reqwest-backed implementation of [`LectureGateway`].

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use lectern_core::artifact::ArtifactKind;
use lectern_core::results::LectureResults;
use lectern_core::version::ArtifactVersion;

use crate::config::GatewayConfig;
use crate::error::{api_message, GatewayError};
use crate::types::{
    ArtifactContentDto, ArtifactPayload, ArtifactSaved, GenerateRequest, HistoryDto, MediaUpload,
    ProcessingStatusDto, SupportedLanguagesDto, TranslateArtifactRequest, TranslatedArtifact,
    TranslationStatusDto, TranslationsDto, UpdateRequest, UploadAccepted,
};
use crate::LectureGateway;

/// HTTP client for the Lectern backend.
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling across
    /// gateways pointed at the same backend).
    pub fn with_client(client: reqwest::Client, config: GatewayConfig) -> Self {
        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .bearer_auth(&self.config.bearer_token)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .bearer_auth(&self.config.bearer_token)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, otherwise turn
    /// the body into a [`GatewayError::Api`] with the server message.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: api_message(status.as_u16(), &body),
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), GatewayError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl LectureGateway for HttpGateway {
    async fn upload_media(
        &self,
        lecture_id: Option<&str>,
        upload: MediaUpload,
    ) -> Result<UploadAccepted, GatewayError> {
        let path = match lecture_id {
            Some(id) => format!("/upload/{id}"),
            None => "/upload".to_string(),
        };

        tracing::info!(
            lecture_id = lecture_id.unwrap_or("<new>"),
            file = %upload.file_name,
            size = upload.bytes.len(),
            "Uploading media",
        );

        let form = Form::new()
            .part(
                "video",
                Part::bytes(upload.bytes).file_name(upload.file_name),
            )
            .text("language", upload.preferred_language);

        let response = self
            .client
            .post(self.url(&path))
            .bearer_auth(&self.config.bearer_token)
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn processing_status(
        &self,
        lecture_id: &str,
    ) -> Result<ProcessingStatusDto, GatewayError> {
        let response = self.get(&format!("/status/{lecture_id}")).send().await?;
        Self::parse_response(response).await
    }

    async fn translations(&self, lecture_id: &str) -> Result<TranslationsDto, GatewayError> {
        let response = self
            .get("/translations")
            .query(&[("lecture_id", lecture_id)])
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn translation_status(
        &self,
        lecture_id: &str,
        language: &str,
    ) -> Result<TranslationStatusDto, GatewayError> {
        let response = self
            .get(&format!("/translation-status/{lecture_id}"))
            .query(&[("language", language)])
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn request_translation(
        &self,
        lecture_id: &str,
        language: &str,
    ) -> Result<(), GatewayError> {
        tracing::info!(lecture_id, language, "Requesting transcript translation");

        let body = serde_json::json!({
            "lecture_id": lecture_id,
            "language": language,
        });
        let response = self.post("/translate").json(&body).send().await?;
        Self::check_status(response).await
    }

    async fn transcript(&self, lecture_id: &str, language: &str) -> Result<String, GatewayError> {
        let response = self
            .get(&format!("/transcript/{lecture_id}"))
            .query(&[("language", language)])
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.text().await?)
    }

    async fn download_transcript(
        &self,
        lecture_id: &str,
        language: &str,
    ) -> Result<Vec<u8>, GatewayError> {
        let response = self
            .get(&format!("/transcript/{lecture_id}/download"))
            .query(&[("language", language)])
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn results(&self, lecture_id: &str) -> Result<LectureResults, GatewayError> {
        let response = self.get(&format!("/results/{lecture_id}")).send().await?;
        Self::parse_response(response).await
    }

    async fn artifact(
        &self,
        kind: ArtifactKind,
        lecture_id: &str,
    ) -> Result<Option<ArtifactPayload>, GatewayError> {
        let segment = kind.path_segment();
        let response = self
            .get(&format!("/{segment}/get/{lecture_id}"))
            .send()
            .await?;

        // Absence is a normal empty state, not an error.
        match Self::parse_response::<ArtifactContentDto>(response).await {
            Ok(dto) => Ok(dto.into_payload()),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn generate_artifact(
        &self,
        kind: ArtifactKind,
        request: &GenerateRequest,
    ) -> Result<ArtifactPayload, GatewayError> {
        let segment = kind.path_segment();
        tracing::info!(
            lecture_id = %request.lecture_id,
            kind = segment,
            "Requesting artifact generation",
        );

        let response = self
            .post(&format!("/{segment}/generate"))
            .json(request)
            .send()
            .await?;

        let dto: ArtifactContentDto = Self::parse_response(response).await?;
        dto.into_payload().ok_or(GatewayError::Api {
            status: 200,
            message: "Generation returned empty content".to_string(),
        })
    }

    async fn update_artifact(
        &self,
        kind: ArtifactKind,
        lecture_id: &str,
        request: &UpdateRequest,
    ) -> Result<ArtifactSaved, GatewayError> {
        let segment = kind.path_segment();

        // The content key is kind-specific on the wire.
        let mut body = serde_json::json!({ "version_id": request.version_id });
        body[format!("{segment}_content").as_str()] = serde_json::json!(request.content);
        if let Some(quiz_type) = request.quiz_type {
            body["quiz_type"] = serde_json::json!(quiz_type);
        }
        if let Some(difficulty) = request.difficulty {
            body["difficulty"] = serde_json::json!(difficulty);
        }

        let response = self
            .client
            .put(self.url(&format!("/{segment}/update/{lecture_id}")))
            .bearer_auth(&self.config.bearer_token)
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn delete_artifact(
        &self,
        kind: ArtifactKind,
        lecture_id: &str,
    ) -> Result<(), GatewayError> {
        let segment = kind.path_segment();
        tracing::info!(lecture_id, kind = segment, "Deleting artifact");

        let response = self
            .client
            .delete(self.url(&format!("/{segment}/delete/{lecture_id}")))
            .bearer_auth(&self.config.bearer_token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn artifact_history(
        &self,
        kind: ArtifactKind,
        lecture_id: &str,
    ) -> Result<Vec<ArtifactVersion>, GatewayError> {
        let segment = kind.path_segment();
        let response = self
            .get(&format!("/{segment}/history/{lecture_id}"))
            .send()
            .await?;

        match Self::parse_response::<HistoryDto>(response).await {
            Ok(dto) => Ok(dto.history),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn restore_version(
        &self,
        kind: ArtifactKind,
        lecture_id: &str,
        version_id: &str,
    ) -> Result<ArtifactPayload, GatewayError> {
        let segment = kind.path_segment();
        tracing::info!(lecture_id, version_id, kind = segment, "Restoring version");

        let response = self
            .post(&format!("/{segment}/restore/{lecture_id}/{version_id}"))
            .send()
            .await?;

        let dto: ArtifactContentDto = Self::parse_response(response).await?;
        dto.into_payload().ok_or(GatewayError::Api {
            status: 200,
            message: "Restore returned empty content".to_string(),
        })
    }

    async fn translate_artifact(
        &self,
        kind: ArtifactKind,
        lecture_id: &str,
        request: &TranslateArtifactRequest,
    ) -> Result<TranslatedArtifact, GatewayError> {
        let segment = kind.path_segment();
        tracing::info!(
            lecture_id,
            language = %request.language,
            kind = segment,
            "Translating artifact",
        );

        let response = self
            .post(&format!("/{segment}/translate/{lecture_id}"))
            .json(request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn supported_artifact_languages(
        &self,
        kind: ArtifactKind,
    ) -> Result<HashMap<String, String>, GatewayError> {
        let segment = kind.path_segment();
        let response = self
            .get(&format!("/{segment}/supported-languages"))
            .send()
            .await?;

        let dto: SupportedLanguagesDto = Self::parse_response(response).await?;
        Ok(dto.supported_languages)
    }
}
