use std::env;
use std::time::Duration;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use readly_core::model::{QuizQuestion, Subtopic, validate_generated_questions};

use crate::error::BackendError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_GENERATE_COUNT: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Questions requested per generation call.
    pub generate_count: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            generate_count: DEFAULT_GENERATE_COUNT,
        }
    }
}

impl BackendConfig {
    /// Read `READLY_BACKEND_URL`, `READLY_BACKEND_TIMEOUT_SECS` and
    /// `READLY_GENERATE_COUNT`, falling back to defaults for missing or
    /// unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = env::var("READLY_BACKEND_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.base_url);
        let timeout = env::var("READLY_BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or(defaults.timeout, Duration::from_secs);
        let generate_count = env::var("READLY_GENERATE_COUNT")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|count| *count > 0)
            .unwrap_or(defaults.generate_count);
        Self {
            base_url,
            timeout,
            generate_count,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Body of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    /// Serialized knowledge map documents, one per processed chunk.
    pub maps: Vec<String>,
    pub message: String,
    pub chunks_processed: u32,
}

/// Body sent to `POST /generate-questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateQuestionsRequest {
    pub title: String,
    pub description: String,
    pub key_concepts: Vec<String>,
    pub num_questions: u32,
}

impl GenerateQuestionsRequest {
    #[must_use]
    pub fn for_subtopic(subtopic: &Subtopic, num_questions: u32) -> Self {
        Self {
            title: subtopic.title.clone(),
            description: subtopic.description.clone(),
            key_concepts: subtopic.key_concepts.clone(),
            num_questions,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateQuestionsResponse {
    questions: Vec<QuizQuestion>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub ollama_available: bool,
    pub model_loaded: bool,
    pub timestamp: String,
}

impl HealthStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// HTTP client for the document-processing backend.
#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    config: BackendConfig,
}

impl BackendClient {
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// # Errors
    ///
    /// Returns `BackendError::Http` if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, BackendError> {
        Self::new(BackendConfig::from_env())
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Upload a PDF and receive the generated knowledge maps.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotPdf` for files without a `.pdf` extension, and
    /// HTTP errors for failed requests or undecodable bodies.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_pdf(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, BackendError> {
        if !file_name.to_ascii_lowercase().ends_with(".pdf") {
            return Err(BackendError::NotPdf {
                file_name: file_name.to_string(),
            });
        }

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status()));
        }

        let body: UploadResponse = response.json().await?;
        tracing::info!(
            maps = body.maps.len(),
            chunks = body.chunks_processed,
            "upload processed"
        );
        Ok(body)
    }

    /// Ask the backend for more quiz questions about one subtopic.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidQuestions` when a returned question is
    /// incomplete, and HTTP errors for failed requests or undecodable bodies.
    #[instrument(skip(self, request), fields(title = %request.title, count = request.num_questions))]
    pub async fn generate_questions(
        &self,
        request: &GenerateQuestionsRequest,
    ) -> Result<Vec<QuizQuestion>, BackendError> {
        let response = self
            .client
            .post(self.url("/generate-questions"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status()));
        }

        let body: GenerateQuestionsResponse = response.json().await?;
        validate_generated_questions(&body.questions).map_err(BackendError::InvalidQuestions)?;
        tracing::debug!(received = body.questions.len(), "questions generated");
        Ok(body.questions)
    }

    /// # Errors
    ///
    /// Returns HTTP errors for failed requests or undecodable bodies.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthStatus, BackendError> {
        let response = self.client.get(self.url("/health")).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}
