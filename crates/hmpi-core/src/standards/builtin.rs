use crate::error::HmpiError;
use crate::standards::registry::StandardsRegistry;
use crate::standards::schema::StandardsDef;

const INDIA_JSON: &str = include_str!("../../../../standards/india.json");

/// Available predefined standards sets.
pub const PRESETS: &[&str] = &["india"];

/// Load a predefined standards definition by name.
pub fn load_preset(name: &str) -> Result<StandardsDef, HmpiError> {
    match name {
        "india" => {
            let def: StandardsDef = serde_json::from_str(INDIA_JSON)?;
            Ok(def)
        }
        _ => Err(HmpiError::UnknownPreset {
            name: name.to_string(),
            available: PRESETS.join(", "),
        }),
    }
}

/// Load a predefined standards set straight into a registry.
pub fn preset_registry(name: &str) -> Result<StandardsRegistry, HmpiError> {
    StandardsRegistry::new(&load_preset(name)?)
}
