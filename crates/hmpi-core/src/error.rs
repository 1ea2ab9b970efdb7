use std::path::PathBuf;

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum HmpiError {
    #[error("failed to load standards from {path}: {reason}")]
    StandardsLoad { path: PathBuf, reason: String },

    #[error("invalid standards file: {0}")]
    StandardsInvalid(String),

    #[error("invalid standard for '{metal}': {reason}")]
    InvalidStandard { metal: String, reason: String },

    #[error("unknown preset '{name}'. Available: {available}")]
    UnknownPreset { name: String, available: String },

    #[error("unknown reference standard '{0}' (expected 'bis' or 'who')")]
    UnknownReference(String),

    #[error("invalid concentration for {metal}: {value} (must be a finite number between 0 and 1e6 mg/L)")]
    InvalidConcentration { metal: String, value: f64 },

    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("invalid sample: {0}")]
    InvalidSample(String),

    #[error("no user identity available for this operation")]
    Unauthenticated,

    #[error("sample {0} not found")]
    SampleNotFound(Uuid),

    #[error("user '{user}' does not own sample {id}")]
    Forbidden { user: String, id: Uuid },

    #[error("failed to import samples: {0}")]
    Import(String),

    #[error("sample store at {path} is unusable: {reason}")]
    Store { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
