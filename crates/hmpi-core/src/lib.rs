pub mod error;
pub mod hmpi;
pub mod import;
pub mod model;
pub mod parsing;
pub mod session;
pub mod standards;
pub mod store;
pub mod summary;
pub mod validate;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use error::HmpiError;
use hmpi::{Classification, ScoreOutcome};
use model::{MetalReadings, NewSample, SampleStatus, SampleUpdate, WaterSample};
use session::{require_user, SessionProvider};
use standards::{ReferenceStandard, StandardsRegistry};
use store::SampleStore;
use summary::{Dashboard, ScoredRecord};

/// Number of samples shown in the dashboard's recent list.
pub const RECENT_LIMIT: usize = 5;

/// Score one sample's metal readings.
pub fn score_readings(
    readings: &MetalReadings,
    registry: &StandardsRegistry,
    reference: ReferenceStandard,
) -> ScoreOutcome {
    hmpi::score(&readings.concentrations(), registry, reference)
}

/// Result of scoring one unpersisted sample in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSample {
    pub test_name: String,
    pub location_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ScoreOutcome>,
    /// Why the sample was rejected before scoring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoredRecord for ScoredSample {
    fn hmpi_score(&self) -> Option<f64> {
        self.outcome.as_ref().and_then(|o| o.index())
    }

    fn pollution_level(&self) -> Option<Classification> {
        self.outcome.as_ref().and_then(|o| o.classification())
    }
}

/// Validate and score a batch of samples without persisting them.
///
/// One result per input, in input order. An invalid sample yields an error
/// entry and never fails the batch.
pub fn score_samples(
    samples: &[NewSample],
    registry: &StandardsRegistry,
    reference: ReferenceStandard,
) -> Vec<ScoredSample> {
    samples
        .iter()
        .map(|sample| {
            let (outcome, error) = match validate::validate_new_sample(sample) {
                Ok(()) => (Some(score_readings(&sample.metals, registry, reference)), None),
                Err(e) => {
                    log::warn!("rejected sample '{}': {}", sample.test_name, e);
                    (None, Some(e.to_string()))
                }
            };
            ScoredSample {
                test_name: sample.test_name.clone(),
                location_name: sample.location_name.clone(),
                outcome,
                error,
            }
        })
        .collect()
}

/// Record a new sample for the current user and score it.
///
/// The stored sample is `complete` with a score and level, or `pending` with
/// neither when no registered metal was measured.
pub fn submit_sample(
    store: &mut dyn SampleStore,
    session: &dyn SessionProvider,
    registry: &StandardsRegistry,
    reference: ReferenceStandard,
    sample: NewSample,
) -> Result<WaterSample, HmpiError> {
    let owner = require_user(session)?;
    validate::validate_new_sample(&sample)?;

    let mut record = WaterSample::new(sample, owner, Utc::now());
    let outcome = score_readings(&record.metals, registry, reference);
    record.apply_outcome(&outcome);

    if record.status == SampleStatus::Pending {
        log::warn!(
            "sample '{}' has no scoreable metals, stored as pending",
            record.test_name
        );
    }

    let stored = store.insert(record)?;
    log::info!(
        "stored sample {} ({}) for {}",
        stored.id,
        stored.test_name,
        stored.user_id
    );
    Ok(stored)
}

/// Apply a correction to one of the current user's samples.
///
/// A correction that touches metal readings forces the sample to be
/// rescored against `registry`.
pub fn correct_sample(
    store: &mut dyn SampleStore,
    session: &dyn SessionProvider,
    registry: &StandardsRegistry,
    reference: ReferenceStandard,
    id: Uuid,
    update: SampleUpdate,
) -> Result<WaterSample, HmpiError> {
    let user = require_user(session)?;
    validate::validate_update(&update)?;

    let mut record = store.get(id)?.ok_or(HmpiError::SampleNotFound(id))?;
    if record.user_id != user {
        return Err(HmpiError::Forbidden { user, id });
    }

    if record.apply_update(update, Utc::now()) {
        let outcome = score_readings(&record.metals, registry, reference);
        record.apply_outcome(&outcome);
        log::info!("rescored corrected sample {}", id);
    }
    validate::validate_stored_sample(&record)?;

    store.update(record.clone())?;
    Ok(record)
}

/// Counts from a `rescore_all` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescoreReport {
    pub complete: usize,
    pub pending: usize,
    /// Samples whose stored readings fail validation; left untouched.
    pub invalid: usize,
}

/// Rescore every stored sample, e.g. after the standards changed.
///
/// A sample that cannot be scored becomes `pending`; an invalid one is
/// skipped. Neither fails the batch.
pub fn rescore_all(
    store: &mut dyn SampleStore,
    registry: &StandardsRegistry,
    reference: ReferenceStandard,
) -> Result<RescoreReport, HmpiError> {
    let mut report = RescoreReport::default();

    for mut record in store.list_all()? {
        if let Err(e) = validate::validate_readings(&record.metals) {
            log::warn!("skipping sample {}: {}", record.id, e);
            report.invalid += 1;
            continue;
        }

        let outcome = score_readings(&record.metals, registry, reference);
        record.apply_outcome(&outcome);
        record.updated_at = Utc::now();
        match record.status {
            SampleStatus::Complete => report.complete += 1,
            _ => report.pending += 1,
        }
        store.update(record)?;
    }

    log::info!(
        "rescored {} sample(s) against {} limits: {} complete, {} pending, {} invalid",
        report.complete + report.pending + report.invalid,
        reference,
        report.complete,
        report.pending,
        report.invalid
    );
    Ok(report)
}

/// Summary and recent samples for the current user.
pub fn build_dashboard(
    store: &dyn SampleStore,
    session: &dyn SessionProvider,
) -> Result<Dashboard, HmpiError> {
    let user = require_user(session)?;
    let samples = store.list_by_owner(&user)?;

    let display_name = store
        .profile(&user)?
        .map(|p| p.display_name().to_string())
        .unwrap_or_else(|| user.clone());

    Ok(Dashboard {
        display_name,
        summary: summary::summarize(&samples),
        recent: summary::recent(&samples, RECENT_LIMIT),
    })
}
