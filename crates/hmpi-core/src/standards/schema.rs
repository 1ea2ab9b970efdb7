use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A standards file: regulatory limits for a set of metals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardsDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Unit shared by all limits unless a standard overrides it.
    #[serde(default = "default_unit")]
    pub unit: String,
    pub standards: Vec<MetalStandardDef>,
}

/// One metal's limits as written in a standards file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetalStandardDef {
    pub metal: String,
    /// National (BIS) permissible concentration, as a string for exact decimal.
    pub bis: Decimal,
    /// WHO guideline concentration.
    pub who: Decimal,
    #[serde(default = "default_weight")]
    pub weight: Decimal,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

pub fn default_unit() -> String {
    "mg/L".to_string()
}

fn default_weight() -> Decimal {
    Decimal::ONE
}
