// partition-smoke/src/config.rs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Route of the general partition endpoint, appended to the base URL.
pub const GENERAL_ROUTE: &str = "/general/v0/general";
pub const DEFAULT_SAMPLE_DOCS_DIR: &str = "sample-docs";
/// How many times slower `hi_res` must be than `fast` on the reference PDF.
pub const DEFAULT_PERFORMANCE_RATIO: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub base_url: String,
    pub sample_docs_dir: PathBuf,
    /// Skip cases that need layout-model inference (emulated architectures).
    pub skip_inference_tests: bool,
    pub performance_ratio: f64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            sample_docs_dir: PathBuf::from(DEFAULT_SAMPLE_DOCS_DIR),
            skip_inference_tests: false,
            performance_ratio: DEFAULT_PERFORMANCE_RATIO,
        }
    }
}

impl HarnessConfig {
    /// Full endpoint URL, tolerant of a trailing slash on the base.
    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), GENERAL_ROUTE)
    }

    pub fn trace_loaded(&self) {
        info!(
            endpoint = %self.endpoint_url(),
            sample_docs_dir = %self.sample_docs_dir.display(),
            skip_inference_tests = self.skip_inference_tests,
            performance_ratio = self.performance_ratio,
            "Loaded HarnessConfig"
        );
        debug!(?self, "HarnessConfig loaded (full debug)");
    }
}

/// Interprets a boolean-like environment value the way the CI scripts set it.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_route_once() {
        let mut config = HarnessConfig::default();
        assert_eq!(
            config.endpoint_url(),
            "http://localhost:8000/general/v0/general"
        );
        config.base_url = "https://api.example.com/".to_string();
        assert_eq!(
            config.endpoint_url(),
            "https://api.example.com/general/v0/general"
        );
    }

    #[test]
    fn truthy_values() {
        for v in ["true", "TRUE", "Yes", "y", "1", " true "] {
            assert!(is_truthy(v), "{v} should be truthy");
        }
        for v in ["", "false", "0", "no", "on", "2"] {
            assert!(!is_truthy(v), "{v} should not be truthy");
        }
    }
}
