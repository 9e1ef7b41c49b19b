#![doc = "reqwest-backed client for the general partition endpoint."]

//! # Partition client
//!
//! [`GeneralApiClient`] implements [`PartitionApi`] by posting a multipart form
//! to `/general/v0/general`:
//!
//! - every upload is a part named `files`, verbatim files carry the declared
//!   content type (none when empty), gzip files carry `application/gzip`;
//! - `strategy` and `output_format` are always sent;
//! - `skip_infer_table_types` is repeated once per format tag;
//! - `gz_uncompressed_content_type` is sent only when declared.
//!
//! The reqwest default timeout applies and nothing is retried.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::config::HarnessConfig;
use crate::contract::{ApiResponse, DocumentRequest, PartitionApi, GZIP_CONTENT_TYPE};
use crate::error::SmokeError;

/// Name shared by every file part of the form.
pub const FILES_FIELD: &str = "files";

pub struct GeneralApiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GeneralApiClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        tracing::info!(endpoint = %endpoint, "Initialized GeneralApiClient");
        GeneralApiClient {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.endpoint_url())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn file_part(&self, path: &Path, content_type: &str) -> Result<Part, SmokeError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!(error = ?e, path = %path.display(), "Failed to read upload file");
            SmokeError::fixture(path, e)
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let part = Part::bytes(bytes).file_name(file_name);
        if content_type.is_empty() {
            return Ok(part);
        }
        part.mime_str(content_type).map_err(|source| {
            tracing::error!(content_type, "Declared content type is not a valid MIME type");
            SmokeError::InvalidContentType {
                content_type: content_type.to_string(),
                source,
            }
        })
    }

    async fn build_form(&self, request: &DocumentRequest) -> Result<Form, SmokeError> {
        let mut form = Form::new();
        for path in &request.files {
            form = form.part(FILES_FIELD, self.file_part(path, &request.content_type).await?);
        }
        for path in &request.gzipped_files {
            form = form.part(FILES_FIELD, self.file_part(path, GZIP_CONTENT_TYPE).await?);
        }

        form = form
            .text("strategy", request.strategy.as_str())
            .text("output_format", request.output_format.mime());
        for table_type in &request.skip_infer_table_types {
            form = form.text("skip_infer_table_types", table_type.clone());
        }
        if !request.uncompressed_content_type.is_empty() {
            form = form.text(
                "gz_uncompressed_content_type",
                request.uncompressed_content_type.clone(),
            );
        }
        Ok(form)
    }
}

#[async_trait]
impl PartitionApi for GeneralApiClient {
    async fn send_document(&self, request: &DocumentRequest) -> Result<ApiResponse, SmokeError> {
        tracing::info!(
            endpoint = %self.endpoint,
            files = request.files.len(),
            gzipped_files = request.gzipped_files.len(),
            content_type = %request.content_type,
            strategy = %request.strategy,
            output_format = %request.output_format,
            "Sending document"
        );

        let started = Instant::now();
        let form = self.build_form(request).await?;

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|source| {
                tracing::error!(error = ?source, endpoint = %self.endpoint, "Transport error");
                SmokeError::Transport {
                    url: self.endpoint.clone(),
                    source,
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|source| SmokeError::Transport {
            url: self.endpoint.clone(),
            source,
        })?;
        let elapsed = started.elapsed();

        let elapsed_ms = elapsed.as_millis() as u64;
        if status == 200 {
            tracing::info!(status, elapsed_ms, bytes = body.len(), "Received response");
        } else {
            tracing::warn!(status, elapsed_ms, body = %body, "Endpoint returned non-200");
        }

        Ok(ApiResponse {
            status,
            body,
            elapsed,
        })
    }
}
