//! # contract: what the harness sends to the partition endpoint and what it gets back
//!
//! The [`PartitionApi`] trait is the single seam between the checks and the
//! network. The real implementation lives in [`crate::client`]; tests use the
//! `mockall`-generated `MockPartitionApi` to script responses.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::SmokeError;

/// Media type attached to every gzip-compressed upload part.
pub const GZIP_CONTENT_TYPE: &str = "application/gzip";

/// Extraction strategy requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    Fast,
    HiRes,
    #[default]
    Auto,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Fast => "fast",
            Strategy::HiRes => "hi_res",
            Strategy::Auto => "auto",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoding of the extraction result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Csv => "text/csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// One multipart submission.
///
/// Empty strings for `content_type` and `uncompressed_content_type` mean
/// "not declared": the part goes out without a content type and the
/// decompressed-type hint is omitted, leaving detection to the service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentRequest {
    /// Files uploaded as-is, tagged with `content_type`.
    pub files: Vec<PathBuf>,
    /// Files already gzip-compressed, tagged `application/gzip`.
    pub gzipped_files: Vec<PathBuf>,
    pub content_type: String,
    pub strategy: Strategy,
    pub output_format: OutputFormat,
    pub skip_infer_table_types: Vec<String>,
    pub uncompressed_content_type: String,
}

impl DocumentRequest {
    pub fn new(files: Vec<PathBuf>) -> Self {
        DocumentRequest {
            files,
            ..Default::default()
        }
    }

    pub fn with_gzipped(mut self, gzipped_files: Vec<PathBuf>) -> Self {
        self.gzipped_files = gzipped_files;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    pub fn with_skip_infer_table_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_infer_table_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_uncompressed_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.uncompressed_content_type = content_type.into();
        self
    }

    /// Total number of uploads across the verbatim and gzip groups.
    pub fn upload_count(&self) -> usize {
        self.files.len() + self.gzipped_files.len()
    }

    /// The service answers with one element list per file when this is true.
    pub fn is_multi_file(&self) -> bool {
        self.upload_count() > 1
    }
}

/// Raw HTTP outcome of a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
    /// Wall-clock time of the whole submission, upload included.
    pub elapsed: Duration,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Fails with the body attached unless the status is exactly 200.
    pub fn ensure_ok(&self) -> Result<&Self, SmokeError> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(SmokeError::unexpected_status(self.status, &self.body))
        }
    }
}

/// Submits documents to a partition endpoint.
///
/// Implementations must not retry: a transport failure is reported as-is.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PartitionApi: Send + Sync {
    async fn send_document(&self, request: &DocumentRequest) -> Result<ApiResponse, SmokeError>;
}
