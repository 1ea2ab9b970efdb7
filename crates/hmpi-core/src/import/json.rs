use crate::error::HmpiError;
use crate::import::ImportedSamples;
use crate::model::NewSample;

/// Parse a JSON array of samples (flat records, one key per metal).
pub fn parse_samples_json(bytes: &[u8]) -> Result<ImportedSamples, HmpiError> {
    let samples: Vec<NewSample> = serde_json::from_slice(bytes)
        .map_err(|e| HmpiError::Import(format!("invalid sample JSON: {e}")))?;

    if samples.is_empty() {
        return Err(HmpiError::Import("no samples found in JSON".into()));
    }

    Ok(ImportedSamples {
        samples,
        skipped_cells: vec![],
    })
}
