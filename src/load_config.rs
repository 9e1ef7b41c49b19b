use crate::config::{is_truthy, HarnessConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const ENV_API_URL: &str = "PARTITION_API_URL";
pub const ENV_SAMPLE_DOCS_DIR: &str = "SAMPLE_DOCS_DIR";
pub const ENV_SKIP_INFERENCE_TESTS: &str = "SKIP_INFERENCE_TESTS";
pub const ENV_PERFORMANCE_RATIO: &str = "PERFORMANCE_RATIO";

/// Optional YAML file; every key may be omitted.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct StaticConfig {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    sample_docs_dir: Option<PathBuf>,
    #[serde(default)]
    skip_inference_tests: Option<bool>,
    #[serde(default)]
    performance_ratio: Option<f64>,
}

/// Values given on the command line. They win over file and environment.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub sample_docs_dir: Option<PathBuf>,
    /// Only ever forces skipping on; absence leaves the lower layers in charge.
    pub skip_inference_tests: bool,
    pub performance_ratio: Option<f64>,
}

/// Builds the harness configuration from, in increasing priority: defaults,
/// the optional YAML file, environment variables, and CLI overrides.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<HarnessConfig> {
    let mut config = HarnessConfig::default();

    if let Some(path) = path {
        apply_file(&mut config, path)?;
    }
    apply_env(&mut config)?;
    apply_overrides(&mut config, overrides);

    if !(config.performance_ratio.is_finite() && config.performance_ratio > 0.0) {
        error!(ratio = config.performance_ratio, "performance_ratio must be a positive number");
        anyhow::bail!(
            "performance_ratio must be a positive number, got {}",
            config.performance_ratio
        );
    }

    config.trace_loaded();
    Ok(config)
}

fn apply_file(config: &mut HarnessConfig, path: &Path) -> Result<()> {
    info!(config_path = ?path, "Loading configuration from file");

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to read config file");
            return Err(anyhow::anyhow!("Failed to read config file {:?}: {}", path, e));
        }
    };

    // An empty file deserializes to unit, not to a mapping.
    let file_conf: StaticConfig = if content.trim().is_empty() {
        StaticConfig::default()
    } else {
        match serde_yaml::from_str(&content) {
            Ok(conf) => conf,
            Err(e) => {
                error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
                return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
            }
        }
    };

    if let Some(base_url) = file_conf.base_url {
        config.base_url = base_url;
    }
    if let Some(dir) = file_conf.sample_docs_dir {
        config.sample_docs_dir = dir;
    }
    if let Some(skip) = file_conf.skip_inference_tests {
        config.skip_inference_tests = skip;
    }
    if let Some(ratio) = file_conf.performance_ratio {
        config.performance_ratio = ratio;
    }
    info!(config_path = ?path, "Parsed config YAML successfully");
    Ok(())
}

fn apply_env(config: &mut HarnessConfig) -> Result<()> {
    if let Ok(url) = std::env::var(ENV_API_URL) {
        info!(var = ENV_API_URL, url = %url, "Base URL taken from environment");
        config.base_url = url;
    }
    if let Ok(dir) = std::env::var(ENV_SAMPLE_DOCS_DIR) {
        config.sample_docs_dir = PathBuf::from(dir);
    }
    if let Ok(raw) = std::env::var(ENV_SKIP_INFERENCE_TESTS) {
        config.skip_inference_tests = is_truthy(&raw);
        info!(
            var = ENV_SKIP_INFERENCE_TESTS,
            raw = %raw,
            skip = config.skip_inference_tests,
            "Inference skip flag taken from environment"
        );
    }
    if let Ok(raw) = std::env::var(ENV_PERFORMANCE_RATIO) {
        config.performance_ratio = raw
            .trim()
            .parse::<f64>()
            .with_context(|| format!("{ENV_PERFORMANCE_RATIO} must be a number, got {raw:?}"))?;
    }
    Ok(())
}

fn apply_overrides(config: &mut HarnessConfig, overrides: &ConfigOverrides) {
    if let Some(url) = &overrides.base_url {
        config.base_url = url.clone();
    }
    if let Some(dir) = &overrides.sample_docs_dir {
        config.sample_docs_dir = dir.clone();
    }
    if overrides.skip_inference_tests {
        config.skip_inference_tests = true;
    }
    if let Some(ratio) = overrides.performance_ratio {
        config.performance_ratio = ratio;
    }
}
