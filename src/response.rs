//! Decoding of partition responses.
//!
//! JSON bodies come in two shapes: a flat element list for a single upload
//! and a list of element lists for several uploads. The caller says which
//! one it expects (from the upload count); a body of the other shape is a
//! decode error.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::SmokeError;

/// Metadata key holding the HTML rendering of a detected table.
pub const TEXT_AS_HTML: &str = "text_as_html";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Element {
    pub text: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Element {
    /// Whether the service flagged this element as a table, whatever the
    /// rendering it attached.
    pub fn is_table(&self) -> bool {
        self.metadata.contains_key(TEXT_AS_HTML)
    }

    pub fn text_as_html(&self) -> Option<&str> {
        self.metadata.get(TEXT_AS_HTML).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartitionResult {
    Single(Vec<Element>),
    PerFile(Vec<Vec<Element>>),
}

impl PartitionResult {
    pub fn parse(body: &str, multi_file: bool) -> Result<Self, SmokeError> {
        if multi_file {
            serde_json::from_str::<Vec<Vec<Element>>>(body)
                .map(PartitionResult::PerFile)
                .map_err(|e| SmokeError::decode("per-file JSON element lists", e, body))
        } else {
            serde_json::from_str::<Vec<Element>>(body)
                .map(PartitionResult::Single)
                .map_err(|e| SmokeError::decode("JSON element list", e, body))
        }
    }

    /// Length of the top-level list: elements, or files for multi-file results.
    pub fn len(&self) -> usize {
        match self {
            PartitionResult::Single(elements) => elements.len(),
            PartitionResult::PerFile(files) => files.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements across all files; the number of CSV rows must match it.
    pub fn element_count(&self) -> usize {
        match self {
            PartitionResult::Single(elements) => elements.len(),
            PartitionResult::PerFile(files) => files.iter().map(Vec::len).sum(),
        }
    }

    pub fn elements(&self) -> Box<dyn Iterator<Item = &Element> + '_> {
        match self {
            PartitionResult::Single(elements) => Box::new(elements.iter()),
            PartitionResult::PerFile(files) => Box::new(files.iter().flatten()),
        }
    }

    /// Concatenated text length per file; a single result counts as one file.
    pub fn text_lengths(&self) -> Vec<usize> {
        match self {
            PartitionResult::Single(elements) => vec![concatenated_text_len(elements)],
            PartitionResult::PerFile(files) => {
                files.iter().map(|f| concatenated_text_len(f)).collect()
            }
        }
    }

    /// Elements carrying a `text_as_html` key, in document order.
    pub fn tables(&self) -> Vec<&Element> {
        self.elements().filter(|e| e.is_table()).collect()
    }
}

/// Character count of all element texts joined together.
pub fn concatenated_text_len(elements: &[Element]) -> usize {
    elements.iter().map(|e| e.text.chars().count()).sum()
}

/// Data rows of a CSV body, header excluded and blank lines ignored.
pub fn csv_row_count(body: &str) -> Result<usize, SmokeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut rows = 0;
    for record in reader.records() {
        record.map_err(|e| SmokeError::decode("CSV rows", e, body))?;
        rows += 1;
    }
    Ok(rows)
}
