pub mod builtin;
pub mod registry;
pub mod schema;

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::HmpiError;
use crate::parsing::normalize_metal;
pub use registry::{MetalStandard, ReferenceStandard, StandardsRegistry};
use schema::StandardsDef;

/// Load a standards definition from a JSON file.
pub fn load_standards(path: &Path) -> Result<StandardsDef, HmpiError> {
    let content = std::fs::read_to_string(path).map_err(|e| HmpiError::StandardsLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_standards(&content, path)
}

/// Load and validate a standards file straight into a registry.
pub fn load_registry(path: &Path) -> Result<StandardsRegistry, HmpiError> {
    let def = load_standards(path)?;
    StandardsRegistry::new(&def)
}

/// Parse a standards definition from a JSON string.
pub fn parse_standards(json: &str, source: &Path) -> Result<StandardsDef, HmpiError> {
    let def: StandardsDef = serde_json::from_str(json).map_err(|e| HmpiError::StandardsLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_standards(&def)?;
    Ok(def)
}

/// Parse a standards definition from a JSON string (no file path context).
pub fn parse_standards_str(json: &str) -> Result<StandardsDef, HmpiError> {
    let def: StandardsDef = serde_json::from_str(json).map_err(HmpiError::Json)?;
    validate_standards(&def)?;
    Ok(def)
}

/// Validate that a standards definition is well-formed.
///
/// Every limit and weight must be strictly positive: a zero limit would make
/// the per-metal sub-index a division by zero.
pub fn validate_standards(def: &StandardsDef) -> Result<(), HmpiError> {
    if def.standards.is_empty() {
        return Err(HmpiError::StandardsInvalid(
            "standards must not be empty".into(),
        ));
    }

    let mut seen = HashSet::new();
    for standard in &def.standards {
        let key = normalize_metal(&standard.metal);
        if key.is_empty() {
            return Err(HmpiError::StandardsInvalid(
                "metal name must not be empty".into(),
            ));
        }

        if !seen.insert(key.clone()) {
            return Err(HmpiError::StandardsInvalid(format!(
                "metal '{}' is listed more than once",
                key
            )));
        }

        check_positive(&key, "bis", standard.bis)?;
        check_positive(&key, "who", standard.who)?;
        check_positive(&key, "weight", standard.weight)?;
    }

    Ok(())
}

fn check_positive(metal: &str, field: &str, value: Decimal) -> Result<(), HmpiError> {
    if value <= Decimal::ZERO {
        return Err(HmpiError::InvalidStandard {
            metal: metal.to_string(),
            reason: format!("{} must be greater than zero (got {})", field, value),
        });
    }
    Ok(())
}
