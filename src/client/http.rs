// reqwest implementation of the analytics server contract

use crate::client::AnalyticsBackend;
use crate::config::ServerConfig;
use crate::intake;
use crate::models::{AnalysisResult, AnalyzeRequest, ErrorBody, FieldMapping, UploadResponse, UploadedFile};
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

const SAMPLE_UNAVAILABLE: &str = "Failed to load sample data.";

pub struct HttpBackend {
    client: Client,
    base_url: String,
    sample_path: String,
}

impl HttpBackend {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sample_path: config.sample_path.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Map a non-2xx response body onto the server's `error` field
    fn failure(status: StatusCode, body: &str) -> AppError {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody { error: Some(message) }) => AppError::Server(message),
            Ok(ErrorBody { error: None }) => {
                AppError::Server(format!("request failed with status {}", status.as_u16()))
            }
            Err(e) => AppError::Transport(format!(
                "unexpected response (HTTP {}): {}",
                status.as_u16(),
                e
            )),
        }
    }
}

#[async_trait]
impl AnalyticsBackend for HttpBackend {
    async fn upload(&self, file: &UploadedFile) -> AppResult<UploadResponse> {
        let url = self.url("/upload");
        info!("Uploading {} ({} bytes) to {}", file.name, file.len(), url);

        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Upload rejected with status {}", status);
            return Err(Self::failure(status, &body));
        }

        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::Transport(format!("malformed upload response: {}", e)))?;
        debug!("Upload accepted as {} with {} columns", parsed.filename, parsed.columns.len());
        Ok(parsed)
    }

    async fn analyze(&self, filename: Option<&str>, mapping: &FieldMapping) -> AppResult<AnalysisResult> {
        let url = self.url("/analyze");
        info!("Requesting analysis of {:?}", filename);

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest { filename, column_map: mapping })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Analysis rejected with status {}", status);
            return Err(Self::failure(status, &body));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| AppError::Transport(format!("malformed analysis response: {}", e)))?;
        let result = AnalysisResult::from_value(value)
            .ok_or_else(|| AppError::Transport("analysis response is not an object".to_string()))?;

        if let Some(message) = result.error() {
            warn!("Analysis returned an error payload: {}", message);
            return Err(AppError::Server(message));
        }
        Ok(result)
    }

    async fn fetch_sample(&self) -> AppResult<UploadedFile> {
        let url = self.url(&self.sample_path);
        info!("Fetching sample data from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::SampleUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            warn!("Sample data request returned {}", response.status());
            return Err(AppError::SampleUnavailable(SAMPLE_UNAVAILABLE.to_string()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::SampleUnavailable(e.to_string()))?;
        Ok(intake::sample_file(bytes))
    }
}
