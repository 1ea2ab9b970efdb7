pub mod json;
pub mod xlsx;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::HmpiError;
use crate::model::NewSample;

/// A cell that could not be read and was left out of its sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedCell {
    /// 1-based sheet row.
    pub row: usize,
    pub column: String,
    pub text: String,
    pub reason: String,
}

/// Samples read from an input file, plus what had to be left out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportedSamples {
    pub samples: Vec<NewSample>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_cells: Vec<SkippedCell>,
}

/// Read samples from a `.json` or `.xlsx` file, chosen by extension.
pub fn read_samples_file(path: &Path) -> Result<ImportedSamples, HmpiError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let bytes = std::fs::read(path)?;
    match extension.as_str() {
        "json" => json::parse_samples_json(&bytes),
        "xlsx" => xlsx::parse_samples_xlsx(&bytes),
        other => Err(HmpiError::Import(format!(
            "unsupported file type '{}' for {} (expected .json or .xlsx)",
            other,
            path.display()
        ))),
    }
}
