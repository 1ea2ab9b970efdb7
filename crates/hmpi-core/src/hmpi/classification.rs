use std::fmt;

use serde::{Deserialize, Serialize};

/// Lower bound of the Moderate band.
pub const MODERATE_FROM: f64 = 30.0;
/// Lower bound of the Critical band.
pub const CRITICAL_FROM: f64 = 60.0;
/// Lower bound of the Unsafe band.
pub const UNSAFE_FROM: f64 = 100.0;

/// Pollution band of an HMPI value, ordered from cleanest to worst.
///
/// Bands are half-open, lower bound inclusive:
/// Safe [0, 30), Moderate [30, 60), Critical [60, 100), Unsafe [100, ∞).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Safe,
    Moderate,
    Critical,
    Unsafe,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Safe,
        Classification::Moderate,
        Classification::Critical,
        Classification::Unsafe,
    ];

    pub fn from_index(index: f64) -> Classification {
        if index < MODERATE_FROM {
            Classification::Safe
        } else if index < CRITICAL_FROM {
            Classification::Moderate
        } else if index < UNSAFE_FROM {
            Classification::Critical
        } else {
            Classification::Unsafe
        }
    }

    pub fn lower_bound(&self) -> f64 {
        match self {
            Classification::Safe => 0.0,
            Classification::Moderate => MODERATE_FROM,
            Classification::Critical => CRITICAL_FROM,
            Classification::Unsafe => UNSAFE_FROM,
        }
    }

    /// Exclusive upper bound; the Unsafe band is unbounded.
    pub fn upper_bound(&self) -> Option<f64> {
        match self {
            Classification::Safe => Some(MODERATE_FROM),
            Classification::Moderate => Some(CRITICAL_FROM),
            Classification::Critical => Some(UNSAFE_FROM),
            Classification::Unsafe => None,
        }
    }

    pub fn contains(&self, index: f64) -> bool {
        index >= self.lower_bound() && self.upper_bound().map_or(true, |upper| index < upper)
    }

    /// Critical and Unsafe samples count as pollution hotspots.
    pub fn is_at_risk(&self) -> bool {
        *self >= Classification::Critical
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Safe => write!(f, "Safe"),
            Classification::Moderate => write!(f, "Moderate"),
            Classification::Critical => write!(f, "Critical"),
            Classification::Unsafe => write!(f, "Unsafe"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries_are_lower_inclusive() {
        assert_eq!(Classification::from_index(0.0), Classification::Safe);
        assert_eq!(Classification::from_index(29.999), Classification::Safe);
        assert_eq!(Classification::from_index(30.0), Classification::Moderate);
        assert_eq!(Classification::from_index(59.99), Classification::Moderate);
        assert_eq!(Classification::from_index(60.0), Classification::Critical);
        assert_eq!(Classification::from_index(99.99), Classification::Critical);
        assert_eq!(Classification::from_index(100.0), Classification::Unsafe);
        assert_eq!(Classification::from_index(1.0e9), Classification::Unsafe);
    }

    #[test]
    fn test_every_index_falls_in_exactly_one_band() {
        let mut index = 0.0;
        while index < 250.0 {
            let matching: Vec<_> = Classification::ALL
                .iter()
                .filter(|c| c.contains(index))
                .collect();
            assert_eq!(matching.len(), 1, "index {index}");
            assert_eq!(*matching[0], Classification::from_index(index));
            index += 0.25;
        }
    }

    #[test]
    fn test_bands_are_ordered() {
        assert!(Classification::Safe < Classification::Moderate);
        assert!(Classification::Moderate < Classification::Critical);
        assert!(Classification::Critical < Classification::Unsafe);
        assert!(Classification::Critical.is_at_risk());
        assert!(!Classification::Moderate.is_at_risk());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Classification::Unsafe).unwrap();
        assert_eq!(json, "\"unsafe\"");
    }
}
