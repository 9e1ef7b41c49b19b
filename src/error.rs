//! Error taxonomy for smoke checks.
//!
//! Every variant is terminal for the case that produced it: the harness
//! never retries, it reports the failure with enough of the response body
//! to diagnose the endpoint.

use std::path::PathBuf;

/// Longest body excerpt carried inside an error message.
const BODY_EXCERPT_LEN: usize = 2_000;

#[derive(Debug, thiserror::Error)]
pub enum SmokeError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("declared content type {content_type:?} is not a valid MIME type: {source}")]
    InvalidContentType {
        content_type: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fixture {path:?}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("expected HTTP 200, got {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("could not decode {what}: {detail}; body: {body}")]
    Decode {
        what: &'static str,
        detail: String,
        body: String,
    },

    #[error("[{case}] {message}")]
    Assertion { case: String, message: String },
}

impl SmokeError {
    pub fn fixture(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SmokeError::Fixture {
            path: path.into(),
            source,
        }
    }

    pub fn unexpected_status(status: u16, body: &str) -> Self {
        SmokeError::UnexpectedStatus {
            status,
            body: excerpt(body),
        }
    }

    pub fn decode(what: &'static str, detail: impl ToString, body: &str) -> Self {
        SmokeError::Decode {
            what,
            detail: detail.to_string(),
            body: excerpt(body),
        }
    }

    pub fn assertion(case: impl Into<String>, message: impl Into<String>) -> Self {
        SmokeError::Assertion {
            case: case.into(),
            message: message.into(),
        }
    }
}

fn excerpt(body: &str) -> String {
    if body.len() <= BODY_EXCERPT_LEN {
        return body.to_string();
    }
    let mut end = BODY_EXCERPT_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes total)", &body[..end], body.len())
}
