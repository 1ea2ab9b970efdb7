use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hmpi::Classification;
use crate::model::WaterSample;

/// Anything that carries the calculator's output: an optional index and an
/// optional classification.
pub trait ScoredRecord {
    fn hmpi_score(&self) -> Option<f64>;
    fn pollution_level(&self) -> Option<Classification>;

    /// Band of the record, derived from the index when no level was stored.
    fn band(&self) -> Option<Classification> {
        self.pollution_level()
            .or_else(|| self.hmpi_score().map(Classification::from_index))
    }
}

impl ScoredRecord for WaterSample {
    fn hmpi_score(&self) -> Option<f64> {
        self.hmpi_score
    }

    fn pollution_level(&self) -> Option<Classification> {
        self.pollution_level
    }
}

impl<T: ScoredRecord> ScoredRecord for &T {
    fn hmpi_score(&self) -> Option<f64> {
        (*self).hmpi_score()
    }

    fn pollution_level(&self) -> Option<Classification> {
        (*self).pollution_level()
    }
}

/// Dashboard rollup over a set of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    /// Count per band; every band is present, possibly with 0.
    pub by_classification: BTreeMap<Classification, usize>,
    /// Samples without a score.
    pub unscored: usize,
    /// Mean index over scored samples; `None` when no sample is scored.
    pub mean_score: Option<f64>,
}

impl Summary {
    pub fn count(&self, classification: Classification) -> usize {
        self.by_classification
            .get(&classification)
            .copied()
            .unwrap_or(0)
    }

    pub fn scored(&self) -> usize {
        self.total - self.unscored
    }

    /// Critical plus Unsafe samples.
    pub fn at_risk(&self) -> usize {
        Classification::ALL
            .iter()
            .filter(|c| c.is_at_risk())
            .map(|c| self.count(*c))
            .sum()
    }
}

/// Summarize a set of scored samples.
///
/// Unscored samples count toward `total` and `unscored` only; they never
/// contribute a zero to the mean. The result does not depend on input order.
pub fn summarize<T: ScoredRecord>(samples: &[T]) -> Summary {
    let mut by_classification: BTreeMap<Classification, usize> =
        Classification::ALL.iter().map(|c| (*c, 0)).collect();
    let mut scores = Vec::new();
    let mut unscored = 0;

    for sample in samples {
        match sample.hmpi_score() {
            Some(score) => scores.push(score),
            None => unscored += 1,
        }
        if let Some(band) = sample.band() {
            *by_classification.entry(band).or_insert(0) += 1;
        }
    }

    // Sum in sorted order so the mean is bit-identical for any input order.
    scores.sort_by(|a, b| a.total_cmp(b));
    let mean_score = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    Summary {
        total: samples.len(),
        by_classification,
        unscored,
        mean_score,
    }
}

/// The `limit` most recently created samples, newest first.
pub fn recent(samples: &[WaterSample], limit: usize) -> Vec<WaterSample> {
    let mut sorted: Vec<&WaterSample> = samples.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.into_iter().take(limit).cloned().collect()
}

/// What a signed-in researcher sees first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub display_name: String,
    pub summary: Summary,
    pub recent: Vec<WaterSample>,
}
