#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use partition_smoke::config::HarnessConfig;
use partition_smoke::contract::ApiResponse;
use serde_json::{json, Value};

pub const LONG_TEXT: &str = "This element carries more than twenty characters of text.";

pub fn response(status: u16, body: impl Into<String>) -> ApiResponse {
    ApiResponse {
        status,
        body: body.into(),
        elapsed: Duration::from_millis(10),
    }
}

pub fn timed(body: impl Into<String>, elapsed: Duration) -> ApiResponse {
    ApiResponse {
        status: 200,
        body: body.into(),
        elapsed,
    }
}

/// Flat element list with `n` elements of the given text.
pub fn elements(n: usize, text: &str) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                json!({"type": "NarrativeText", "text": text, "metadata": {"page_number": i + 1}})
            })
            .collect(),
    )
}

/// CSV body with a header and `rows` data rows.
pub fn csv_body(rows: usize) -> String {
    let mut body = String::from("type,text,page_number\n");
    for i in 0..rows {
        body.push_str(&format!("NarrativeText,\"row, number {i}\",{}\n", i + 1));
    }
    body
}

/// Config pointing at `dir` for sample documents.
pub fn config_for(dir: &Path) -> HarnessConfig {
    HarnessConfig {
        sample_docs_dir: dir.to_path_buf(),
        ..HarnessConfig::default()
    }
}

/// Writes small stand-in sample documents; the mocked API never parses them.
pub fn write_samples(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(
            dir.join(name),
            format!("stand-in contents for {name}, long enough to compress"),
        )
        .unwrap();
    }
}
