//! Analytics server client
//!
//! The dashboard talks to the server through [`AnalyticsBackend`] so that the
//! coordinators can run against a real HTTP server or an in-memory fake.

pub mod http;

pub use http::HttpBackend;

use crate::models::{AnalysisResult, FieldMapping, UploadResponse, UploadedFile};
use crate::types::AppResult;
use async_trait::async_trait;

#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// `POST /upload`; returns the column manifest and the filename token
    async fn upload(&self, file: &UploadedFile) -> AppResult<UploadResponse>;

    /// `POST /analyze`; a 2xx payload carrying `error` is returned as `AppError::Server`
    async fn analyze(&self, filename: Option<&str>, mapping: &FieldMapping) -> AppResult<AnalysisResult>;

    /// `GET` the static sample CSV
    async fn fetch_sample(&self) -> AppResult<UploadedFile>;
}
