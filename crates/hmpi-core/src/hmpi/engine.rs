use std::collections::HashSet;

use crate::hmpi::outcome::{round_for_display, HmpiScore, MetalContribution, ScoreOutcome};
use crate::hmpi::Classification;
use crate::model::Concentrations;
use crate::standards::{ReferenceStandard, StandardsRegistry};

/// Compute the Heavy Metal Pollution Index of one sample.
///
/// For every metal present in both the sample and the registry:
/// `Wi = weight / Si`, `Qi = Mi / Si * 100`; the index is
/// `Σ(Wi·Qi) / Σ(Wi)`. `Si` is always the limit of `reference`; BIS and WHO
/// limits are never mixed within one computation.
///
/// Metals without a registered standard are skipped. When nothing is left to
/// score the outcome is `NoScoreableMetals` rather than a zero index.
///
/// Concentrations are expected to be validated (finite, non-negative). An
/// index that still overflows, e.g. against a tiny custom limit, is reported
/// as `NoScoreableMetals` with the overflowing metals listed as skipped.
pub fn score(
    concentrations: &Concentrations,
    registry: &StandardsRegistry,
    reference: ReferenceStandard,
) -> ScoreOutcome {
    let mut contributions = Vec::new();
    let mut skipped_metals = Vec::new();
    let mut scored_metals = HashSet::new();
    let mut weighted_sum = 0.0_f64;
    let mut weight_sum = 0.0_f64;

    for (raw_name, &measured) in concentrations {
        let Some(standard) = registry.lookup(raw_name) else {
            log::debug!("no standard registered for '{}', skipping", raw_name);
            skipped_metals.push(raw_name.clone());
            continue;
        };

        if !scored_metals.insert(standard.metal_name.clone()) {
            log::warn!(
                "'{}' resolves to already scored metal '{}', skipping duplicate reading",
                raw_name,
                standard.metal_name
            );
            skipped_metals.push(raw_name.clone());
            continue;
        }

        let Some((limit, weight)) = standard.numeric(reference) else {
            log::warn!("standard for '{}' is not representable, skipping", standard.metal_name);
            skipped_metals.push(raw_name.clone());
            continue;
        };

        let unit_weight = weight / limit;
        let quality_rating = measured / limit * 100.0;

        weighted_sum += unit_weight * quality_rating;
        weight_sum += unit_weight;

        contributions.push(MetalContribution {
            metal: standard.metal_name.clone(),
            concentration: measured,
            standard: limit,
            weight_factor: weight,
            unit_weight,
            quality_rating,
        });
    }

    if contributions.is_empty() || weight_sum <= 0.0 {
        return ScoreOutcome::NoScoreableMetals { skipped_metals };
    }

    let index = weighted_sum / weight_sum;
    if !index.is_finite() {
        log::warn!(
            "index over {} metal(s) is not finite, leaving sample unscored",
            contributions.len()
        );
        skipped_metals.extend(contributions.into_iter().map(|c| c.metal));
        return ScoreOutcome::NoScoreableMetals { skipped_metals };
    }

    let classification = Classification::from_index(index);
    let reason = explain(index, classification, reference, &contributions);

    ScoreOutcome::Scored(HmpiScore {
        index,
        classification,
        reference,
        contributions,
        skipped_metals,
        reason,
    })
}

fn explain(
    index: f64,
    classification: Classification,
    reference: ReferenceStandard,
    contributions: &[MetalContribution],
) -> String {
    let shown = round_for_display(index)
        .map(|d| d.to_string())
        .unwrap_or_else(|| format!("{index:e}"));

    let exceeding: Vec<&str> = contributions
        .iter()
        .filter(|c| c.exceeds_standard())
        .map(|c| c.metal.as_str())
        .collect();

    let metal_word = if contributions.len() == 1 { "metal" } else { "metals" };
    let mut reason = format!(
        "HMPI {} over {} {} against {} limits -> {}",
        shown,
        contributions.len(),
        metal_word,
        reference,
        classification
    );
    if !exceeding.is_empty() {
        reason.push_str(&format!(" (above limit: {})", exceeding.join(", ")));
    }
    reason
}
