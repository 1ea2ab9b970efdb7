use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::HmpiError;
use crate::parsing::normalize_metal;
use crate::standards::schema::StandardsDef;
use crate::standards::validate_standards;

/// Which limit a computation divides by. One run uses exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceStandard {
    Bis,
    Who,
}

impl fmt::Display for ReferenceStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceStandard::Bis => write!(f, "BIS"),
            ReferenceStandard::Who => write!(f, "WHO"),
        }
    }
}

impl FromStr for ReferenceStandard {
    type Err = HmpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bis" => Ok(ReferenceStandard::Bis),
            "who" => Ok(ReferenceStandard::Who),
            _ => Err(HmpiError::UnknownReference(s.to_string())),
        }
    }
}

/// Validated limits for one metal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalStandard {
    /// Normalized metal key (e.g. "arsenic").
    pub metal_name: String,
    pub bis_standard: Decimal,
    pub who_standard: Decimal,
    pub weight_factor: Decimal,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MetalStandard {
    pub fn limit(&self, reference: ReferenceStandard) -> Decimal {
        match reference {
            ReferenceStandard::Bis => self.bis_standard,
            ReferenceStandard::Who => self.who_standard,
        }
    }

    /// Limit and weight as floats for the index arithmetic.
    ///
    /// Both are positive and finite for any registered standard.
    pub(crate) fn numeric(&self, reference: ReferenceStandard) -> Option<(f64, f64)> {
        let limit = self.limit(reference).to_f64()?;
        let weight = self.weight_factor.to_f64()?;
        Some((limit, weight))
    }
}

/// Read-only lookup of metal standards, keyed by normalized metal name.
///
/// Immutable after construction, so one registry can back any number of
/// concurrent scoring calls.
#[derive(Debug, Clone)]
pub struct StandardsRegistry {
    name: String,
    version: String,
    description: Option<String>,
    standards: BTreeMap<String, MetalStandard>,
}

impl StandardsRegistry {
    /// Build a registry from a standards definition, rejecting invalid limits.
    pub fn new(def: &StandardsDef) -> Result<Self, HmpiError> {
        validate_standards(def)?;

        let standards = def
            .standards
            .iter()
            .map(|s| {
                let metal_name = normalize_metal(&s.metal);
                let standard = MetalStandard {
                    metal_name: metal_name.clone(),
                    bis_standard: s.bis,
                    who_standard: s.who,
                    weight_factor: s.weight,
                    unit: s.unit.clone().unwrap_or_else(|| def.unit.clone()),
                    note: s.note.clone(),
                };
                (metal_name, standard)
            })
            .collect();

        Ok(Self {
            name: def.name.clone(),
            version: def.version.clone(),
            description: def.description.clone(),
            standards,
        })
    }

    /// Look up the standard for a metal. Unregistered metals yield `None`.
    pub fn lookup(&self, metal_name: &str) -> Option<&MetalStandard> {
        self.standards
            .get(metal_name)
            .or_else(|| self.standards.get(&normalize_metal(metal_name)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetalStandard> {
        self.standards.values()
    }

    /// Names of all scoreable metals.
    pub fn metal_names(&self) -> impl Iterator<Item = &str> {
        self.standards.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.standards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standards.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standards::schema::MetalStandardDef;
    use rust_decimal_macros::dec;

    fn def() -> StandardsDef {
        StandardsDef {
            name: "Test".into(),
            description: None,
            version: "1".into(),
            unit: "mg/L".into(),
            standards: vec![
                MetalStandardDef {
                    metal: "Arsenic (As)".into(),
                    bis: dec!(0.01),
                    who: dec!(0.01),
                    weight: dec!(3),
                    unit: None,
                    note: None,
                },
                MetalStandardDef {
                    metal: "copper".into(),
                    bis: dec!(0.05),
                    who: dec!(2.0),
                    weight: dec!(1),
                    unit: Some("ppm".into()),
                    note: None,
                },
            ],
        }
    }

    #[test]
    fn test_lookup_normalizes_names() {
        let registry = StandardsRegistry::new(&def()).unwrap();
        assert!(registry.lookup("arsenic").is_some());
        assert!(registry.lookup("As").is_some());
        assert!(registry.lookup("Arsenic (As)").is_some());
        assert_eq!(registry.lookup("Cu").unwrap().unit, "ppm");
    }

    #[test]
    fn test_unregistered_metal_is_absent() {
        let registry = StandardsRegistry::new(&def()).unwrap();
        assert!(registry.lookup("uranium").is_none());
    }

    #[test]
    fn test_iteration_exposes_all_metals() {
        let registry = StandardsRegistry::new(&def()).unwrap();
        assert_eq!(registry.len(), 2);
        let names: Vec<_> = registry.metal_names().collect();
        assert_eq!(names, vec!["arsenic", "copper"]);
    }

    #[test]
    fn test_limit_by_reference() {
        let registry = StandardsRegistry::new(&def()).unwrap();
        let cu = registry.lookup("copper").unwrap();
        assert_eq!(cu.limit(ReferenceStandard::Bis), dec!(0.05));
        assert_eq!(cu.limit(ReferenceStandard::Who), dec!(2.0));
    }

    #[test]
    fn test_reference_from_str() {
        assert_eq!("BIS".parse::<ReferenceStandard>().unwrap(), ReferenceStandard::Bis);
        assert_eq!(" who ".parse::<ReferenceStandard>().unwrap(), ReferenceStandard::Who);
        assert!("epa".parse::<ReferenceStandard>().is_err());
    }

    #[test]
    fn test_invalid_standard_rejected_at_construction() {
        let mut bad = def();
        bad.standards[0].bis = dec!(0);
        assert!(matches!(
            StandardsRegistry::new(&bad),
            Err(HmpiError::InvalidStandard { .. })
        ));
    }
}
