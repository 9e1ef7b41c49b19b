use partition_smoke::config::{HarnessConfig, DEFAULT_PERFORMANCE_RATIO};
use partition_smoke::load_config::{
    load_config, ConfigOverrides, ENV_API_URL, ENV_PERFORMANCE_RATIO, ENV_SAMPLE_DOCS_DIR,
    ENV_SKIP_INFERENCE_TESTS,
};
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn clear_env() {
    for var in [
        ENV_API_URL,
        ENV_SAMPLE_DOCS_DIR,
        ENV_SKIP_INFERENCE_TESTS,
        ENV_PERFORMANCE_RATIO,
    ] {
        env::remove_var(var);
    }
}

fn yaml_file(content: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), content).unwrap();
    file
}

#[test]
#[serial]
fn defaults_without_file_or_env() {
    clear_env();
    let config = load_config(None, &ConfigOverrides::default()).expect("defaults load");
    assert_eq!(config, HarnessConfig::default());
    assert_eq!(
        config.endpoint_url(),
        "http://localhost:8000/general/v0/general"
    );
    assert_eq!(config.performance_ratio, DEFAULT_PERFORMANCE_RATIO);
}

#[test]
#[serial]
fn file_values_are_applied() {
    clear_env();
    let file = yaml_file(
        r#"
base_url: http://partition.internal:9000
sample_docs_dir: ./fixtures/sample-docs
skip_inference_tests: true
performance_ratio: 2.5
"#,
    );
    let config = load_config(Some(file.path()), &ConfigOverrides::default()).unwrap();
    assert_eq!(config.base_url, "http://partition.internal:9000");
    assert_eq!(config.sample_docs_dir, PathBuf::from("./fixtures/sample-docs"));
    assert!(config.skip_inference_tests);
    assert_eq!(config.performance_ratio, 2.5);
}

#[test]
#[serial]
fn empty_file_keeps_defaults() {
    clear_env();
    let file = yaml_file("");
    let config = load_config(Some(file.path()), &ConfigOverrides::default()).unwrap();
    assert_eq!(config, HarnessConfig::default());
}

#[test]
#[serial]
fn environment_overrides_file() {
    clear_env();
    let file = yaml_file("base_url: http://from-file:1\nskip_inference_tests: false\n");
    env::set_var(ENV_API_URL, "http://from-env:2");
    env::set_var(ENV_SKIP_INFERENCE_TESTS, "Yes");
    env::set_var(ENV_PERFORMANCE_RATIO, "6");

    let config = load_config(Some(file.path()), &ConfigOverrides::default()).unwrap();
    clear_env();

    assert_eq!(config.base_url, "http://from-env:2");
    assert!(config.skip_inference_tests);
    assert_eq!(config.performance_ratio, 6.0);
}

#[test]
#[serial]
fn unrecognised_skip_value_means_run_everything() {
    clear_env();
    env::set_var(ENV_SKIP_INFERENCE_TESTS, "definitely");
    let config = load_config(None, &ConfigOverrides::default()).unwrap();
    clear_env();
    assert!(!config.skip_inference_tests);
}

#[test]
#[serial]
fn cli_overrides_win() {
    clear_env();
    env::set_var(ENV_API_URL, "http://from-env:2");
    env::set_var(ENV_SAMPLE_DOCS_DIR, "/env/docs");
    let overrides = ConfigOverrides {
        base_url: Some("http://from-cli:3".into()),
        sample_docs_dir: Some(PathBuf::from("/cli/docs")),
        skip_inference_tests: true,
        performance_ratio: Some(8.0),
    };
    let config = load_config(None, &overrides).unwrap();
    clear_env();

    assert_eq!(config.base_url, "http://from-cli:3");
    assert_eq!(config.sample_docs_dir, PathBuf::from("/cli/docs"));
    assert!(config.skip_inference_tests);
    assert_eq!(config.performance_ratio, 8.0);
}

#[test]
#[serial]
fn invalid_yaml_is_reported() {
    clear_env();
    let file = yaml_file("not-yaml: [:::");
    let msg = load_config(Some(file.path()), &ConfigOverrides::default())
        .unwrap_err()
        .to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
#[serial]
fn unknown_keys_are_rejected() {
    clear_env();
    let file = yaml_file("base_url: http://x\nretries: 3\n");
    let msg = load_config(Some(file.path()), &ConfigOverrides::default())
        .unwrap_err()
        .to_string();
    assert!(msg.contains("retries"), "got: {msg}");
}

#[test]
#[serial]
fn missing_file_is_reported() {
    clear_env();
    let msg = load_config(
        Some(std::path::Path::new("/no/such/smoke.yaml")),
        &ConfigOverrides::default(),
    )
    .unwrap_err()
    .to_string();
    assert!(msg.contains("Failed to read config file"), "got: {msg}");
}

#[test]
#[serial]
fn non_numeric_ratio_names_the_variable() {
    clear_env();
    env::set_var(ENV_PERFORMANCE_RATIO, "fast");
    let msg = load_config(None, &ConfigOverrides::default())
        .unwrap_err()
        .to_string();
    clear_env();
    assert!(msg.contains(ENV_PERFORMANCE_RATIO), "got: {msg}");
}

#[test]
#[serial]
fn non_positive_ratio_is_rejected() {
    clear_env();
    let overrides = ConfigOverrides {
        performance_ratio: Some(0.0),
        ..ConfigOverrides::default()
    };
    let msg = load_config(None, &overrides).unwrap_err().to_string();
    assert!(msg.contains("positive"), "got: {msg}");
}

#[test]
#[serial]
fn shipped_example_config_loads() {
    clear_env();
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("smoke.example.yaml");
    let config = load_config(Some(&path), &ConfigOverrides::default()).unwrap();
    assert_eq!(config, HarnessConfig::default());
}
