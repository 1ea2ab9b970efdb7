use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::hmpi::Classification;
use crate::standards::ReferenceStandard;

/// Decimal places an index is shown with.
pub const DISPLAY_DECIMALS: u32 = 2;

/// One metal's share of an HMPI computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalContribution {
    /// Normalized metal name.
    pub metal: String,
    /// Measured concentration (Mi).
    pub concentration: f64,
    /// Reference limit the sub-index was taken against (Si).
    pub standard: f64,
    pub weight_factor: f64,
    /// Wi = weight_factor / Si.
    pub unit_weight: f64,
    /// Qi = Mi / Si * 100.
    pub quality_rating: f64,
}

impl MetalContribution {
    /// Wi * Qi, this metal's term in the index numerator.
    pub fn weighted_rating(&self) -> f64 {
        self.unit_weight * self.quality_rating
    }

    pub fn exceeds_standard(&self) -> bool {
        self.concentration > self.standard
    }
}

/// A computed index with its classification and the terms behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HmpiScore {
    /// Unrounded index.
    pub index: f64,
    pub classification: Classification,
    pub reference: ReferenceStandard,
    pub contributions: Vec<MetalContribution>,
    /// Sample metals with no registered standard.
    pub skipped_metals: Vec<String>,
    /// Human-readable explanation of the result.
    pub reason: String,
}

impl HmpiScore {
    /// Index rounded for presentation. `None` only for indices beyond
    /// decimal range.
    pub fn display_index(&self) -> Option<Decimal> {
        round_for_display(self.index)
    }

    /// Metal with the largest term in the weighted sum.
    pub fn dominant_metal(&self) -> Option<&MetalContribution> {
        self.contributions
            .iter()
            .max_by(|a, b| a.weighted_rating().total_cmp(&b.weighted_rating()))
    }

    /// Metals measured above their reference limit.
    pub fn exceedances(&self) -> impl Iterator<Item = &MetalContribution> {
        self.contributions.iter().filter(|c| c.exceeds_standard())
    }
}

/// Result of scoring one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScoreOutcome {
    Scored(HmpiScore),
    /// No sample metal matched a registered standard. There is no index.
    NoScoreableMetals { skipped_metals: Vec<String> },
}

impl ScoreOutcome {
    pub fn index(&self) -> Option<f64> {
        self.score().map(|s| s.index)
    }

    pub fn classification(&self) -> Option<Classification> {
        self.score().map(|s| s.classification)
    }

    pub fn score(&self) -> Option<&HmpiScore> {
        match self {
            ScoreOutcome::Scored(score) => Some(score),
            ScoreOutcome::NoScoreableMetals { .. } => None,
        }
    }

    pub fn skipped_metals(&self) -> &[String] {
        match self {
            ScoreOutcome::Scored(score) => &score.skipped_metals,
            ScoreOutcome::NoScoreableMetals { skipped_metals } => skipped_metals,
        }
    }
}

/// Round an index to `DISPLAY_DECIMALS` places.
pub fn round_for_display(index: f64) -> Option<Decimal> {
    Decimal::from_f64(index).map(|d| d.round_dp(DISPLAY_DECIMALS))
}
