//! Integration tests for the intake pipeline: validate, score, persist,
//! correct, rescore and summarize.
//!
//! Uses `MemoryStore` and `StaticSession` except where the on-disk store
//! itself is under test.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use hmpi_core::error::HmpiError;
use hmpi_core::hmpi::Classification;
use hmpi_core::model::{
    EnvironmentalReadings, Metal, MetalReadings, NewSample, SampleStatus, SampleUpdate,
};
use hmpi_core::session::StaticSession;
use hmpi_core::standards::builtin::preset_registry;
use hmpi_core::standards::{parse_standards_str, ReferenceStandard, StandardsRegistry};
use hmpi_core::store::{JsonFileStore, MemoryStore, SampleStore};
use hmpi_core::summary::summarize;
use hmpi_core::{
    build_dashboard, correct_sample, rescore_all, score_readings, score_samples, submit_sample,
};

fn arsenic_registry() -> StandardsRegistry {
    let def = parse_standards_str(
        r#"{
            "name": "Arsenic only",
            "version": "1",
            "standards": [
                { "metal": "arsenic", "bis": "0.01", "who": "0.01", "weight": "3" }
            ]
        }"#,
    )
    .unwrap();
    StandardsRegistry::new(&def).unwrap()
}

fn sample(name: &str, metals: MetalReadings) -> NewSample {
    NewSample {
        test_name: name.into(),
        location_name: format!("{name} site"),
        latitude: 24.58,
        longitude: 73.71,
        collection_date: NaiveDate::from_ymd_opt(2024, 8, 12).unwrap(),
        testing_date: NaiveDate::from_ymd_opt(2024, 8, 14).unwrap(),
        notes: None,
        metals,
        environment: EnvironmentalReadings::default(),
    }
}

fn arsenic(value: f64) -> MetalReadings {
    MetalReadings {
        arsenic: Some(value),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Test 1: Submitting a contaminated sample stores a complete, Unsafe record
// ---------------------------------------------------------------------------
#[test]
fn submit_scores_and_stamps_owner() {
    let mut store = MemoryStore::new();
    let session = StaticSession::new("researcher-1");

    let stored = submit_sample(
        &mut store,
        &session,
        &arsenic_registry(),
        ReferenceStandard::Bis,
        sample("S1", arsenic(0.02)),
    )
    .unwrap();

    assert_eq!(stored.user_id, "researcher-1");
    assert_eq!(stored.status, SampleStatus::Complete);
    assert_eq!(stored.pollution_level, Some(Classification::Unsafe));
    assert!((stored.hmpi_score.unwrap() - 200.0).abs() < 1e-9);
    assert_eq!(store.get(stored.id).unwrap(), Some(stored));
}

// ---------------------------------------------------------------------------
// Test 2: No registered metal measured -> pending, score stays absent
// ---------------------------------------------------------------------------
#[test]
fn submit_without_scoreable_metals_is_pending() {
    let mut store = MemoryStore::new();
    let session = StaticSession::new("researcher-1");
    let readings = MetalReadings {
        zinc: Some(1.2),
        ..Default::default()
    };

    let stored = submit_sample(
        &mut store,
        &session,
        &arsenic_registry(),
        ReferenceStandard::Bis,
        sample("S2", readings),
    )
    .unwrap();

    assert_eq!(stored.status, SampleStatus::Pending);
    assert_eq!(stored.hmpi_score, None);
    assert_eq!(stored.pollution_level, None);
}

// ---------------------------------------------------------------------------
// Test 3: Validation and identity failures reject before anything is stored
// ---------------------------------------------------------------------------
#[test]
fn submit_rejects_invalid_input_and_anonymous_users() {
    let mut store = MemoryStore::new();
    let registry = arsenic_registry();

    let result = submit_sample(
        &mut store,
        &StaticSession::new("researcher-1"),
        &registry,
        ReferenceStandard::Bis,
        sample("Bad", arsenic(-0.5)),
    );
    assert!(matches!(result, Err(HmpiError::InvalidConcentration { .. })));

    let result = submit_sample(
        &mut store,
        &StaticSession::anonymous(),
        &registry,
        ReferenceStandard::Bis,
        sample("Anon", arsenic(0.001)),
    );
    assert!(matches!(result, Err(HmpiError::Unauthenticated)));

    assert!(store.list_all().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test 3b: An absurd but finite reading is rejected, never stored as infinite
// ---------------------------------------------------------------------------
#[test]
fn submit_rejects_reading_that_would_overflow_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.json");
    let registry = preset_registry("india").unwrap();
    let mercury = MetalReadings {
        mercury: Some(1e306),
        ..Default::default()
    };

    let mut store = JsonFileStore::open(&path).unwrap();
    let result = submit_sample(
        &mut store,
        &StaticSession::new("researcher-1"),
        &registry,
        ReferenceStandard::Bis,
        sample("Hg", mercury),
    );
    assert!(matches!(result, Err(HmpiError::InvalidConcentration { .. })));
    assert!(store.list_all().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test 4: Correcting readings forces a rescore; other users are refused
// ---------------------------------------------------------------------------
#[test]
fn correction_rescores_and_checks_owner() {
    let mut store = MemoryStore::new();
    let owner = StaticSession::new("researcher-1");
    let registry = arsenic_registry();

    let stored = submit_sample(
        &mut store,
        &owner,
        &registry,
        ReferenceStandard::Bis,
        sample("S4", arsenic(0.02)),
    )
    .unwrap();

    let update = SampleUpdate {
        readings: BTreeMap::from([(Metal::Arsenic, Some(0.005))]),
        ..Default::default()
    };

    let intruder = correct_sample(
        &mut store,
        &StaticSession::new("someone-else"),
        &registry,
        ReferenceStandard::Bis,
        stored.id,
        update.clone(),
    );
    assert!(matches!(intruder, Err(HmpiError::Forbidden { .. })));

    let corrected = correct_sample(
        &mut store,
        &owner,
        &registry,
        ReferenceStandard::Bis,
        stored.id,
        update,
    )
    .unwrap();
    assert_eq!(corrected.pollution_level, Some(Classification::Moderate));
    assert!((corrected.hmpi_score.unwrap() - 50.0).abs() < 1e-9);

    let reloaded = store.get(stored.id).unwrap().unwrap();
    assert_eq!(reloaded.hmpi_score, corrected.hmpi_score);
}

// ---------------------------------------------------------------------------
// Test 5: Batch scoring never fails wholesale on one bad sample
// ---------------------------------------------------------------------------
#[test]
fn batch_scoring_isolates_bad_samples() {
    let samples = vec![
        sample("good", arsenic(0.005)),
        sample("negative", arsenic(-1.0)),
        sample("unmeasured", MetalReadings::default()),
    ];
    let results = score_samples(&samples, &arsenic_registry(), ReferenceStandard::Bis);

    assert_eq!(results.len(), 3);
    assert!(results[0].outcome.as_ref().unwrap().index().is_some());
    assert!(results[1].error.is_some());
    assert_eq!(results[2].outcome.as_ref().unwrap().index(), None);

    let summary = summarize(&results);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.unscored, 2);
    assert!((summary.mean_score.unwrap() - 50.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Test 6: Persist, reload, rescore -> identical index
// ---------------------------------------------------------------------------
#[test]
fn persisted_sample_rescores_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.json");
    let registry = preset_registry("india").unwrap();
    let readings = MetalReadings {
        arsenic: Some(0.013),
        cadmium: Some(0.0021),
        iron: Some(0.87),
        manganese: Some(0.26),
        zinc: Some(1.9),
        ..Default::default()
    };

    let mut store = JsonFileStore::open(&path).unwrap();
    let stored = submit_sample(
        &mut store,
        &StaticSession::new("researcher-1"),
        &registry,
        ReferenceStandard::Bis,
        sample("S6", readings),
    )
    .unwrap();
    drop(store);

    let reopened = JsonFileStore::open(&path).unwrap();
    let loaded = reopened.get(stored.id).unwrap().unwrap();
    let rescored = score_readings(&loaded.metals, &registry, ReferenceStandard::Bis);

    assert_eq!(rescored.index(), stored.hmpi_score);
    assert_eq!(rescored.classification(), stored.pollution_level);
}

// ---------------------------------------------------------------------------
// Test 7: Rescoring everything against a new reference standard
// ---------------------------------------------------------------------------
#[test]
fn rescore_all_switches_reference_and_marks_pending() {
    let mut store = MemoryStore::new();
    let session = StaticSession::new("researcher-1");
    let registry = preset_registry("india").unwrap();
    let copper = MetalReadings {
        copper: Some(0.1),
        ..Default::default()
    };

    // BIS copper limit 0.05 -> Qi 200; WHO limit 2.0 -> Qi 5
    let scored = submit_sample(
        &mut store,
        &session,
        &registry,
        ReferenceStandard::Bis,
        sample("Cu", copper),
    )
    .unwrap();
    assert_eq!(scored.pollution_level, Some(Classification::Unsafe));

    submit_sample(
        &mut store,
        &session,
        &registry,
        ReferenceStandard::Bis,
        sample("Empty", MetalReadings::default()),
    )
    .unwrap();

    let report = rescore_all(&mut store, &registry, ReferenceStandard::Who).unwrap();
    assert_eq!(report.complete, 1);
    assert_eq!(report.pending, 1);

    let rescored = store.get(scored.id).unwrap().unwrap();
    assert_eq!(rescored.pollution_level, Some(Classification::Safe));
    assert!((rescored.hmpi_score.unwrap() - 5.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Test 8: Dashboard shows only the user's samples, newest first
// ---------------------------------------------------------------------------
#[test]
fn dashboard_for_current_user() {
    let mut store = MemoryStore::new();
    let me = StaticSession::new("researcher-1");
    let other = StaticSession::new("researcher-2");
    let registry = arsenic_registry();

    for (i, value) in [0.001, 0.005, 0.02, 0.008, 0.03, 0.0].iter().enumerate() {
        submit_sample(
            &mut store,
            &me,
            &registry,
            ReferenceStandard::Bis,
            sample(&format!("M{i}"), arsenic(*value)),
        )
        .unwrap();
    }
    submit_sample(
        &mut store,
        &other,
        &registry,
        ReferenceStandard::Bis,
        sample("theirs", arsenic(0.5)),
    )
    .unwrap();
    store
        .put_profile(hmpi_core::model::Profile {
            user_id: "researcher-1".into(),
            full_name: Some("Dr. Field".into()),
            ..Default::default()
        })
        .unwrap();

    let dashboard = build_dashboard(&store, &me).unwrap();
    assert_eq!(dashboard.display_name, "Dr. Field");
    assert_eq!(dashboard.summary.total, 6);
    assert_eq!(dashboard.summary.count(Classification::Safe), 2);
    assert_eq!(dashboard.summary.count(Classification::Moderate), 1);
    assert_eq!(dashboard.summary.count(Classification::Critical), 1);
    assert_eq!(dashboard.summary.count(Classification::Unsafe), 2);
    assert_eq!(dashboard.summary.at_risk(), 3);
    assert_eq!(dashboard.recent.len(), 5);
    assert!(dashboard.recent.iter().all(|s| s.user_id == "researcher-1"));
    assert!(dashboard
        .recent
        .windows(2)
        .all(|w| w[0].created_at >= w[1].created_at));
}

// ---------------------------------------------------------------------------
// Test 9: One registry shared across threads
// ---------------------------------------------------------------------------
#[test]
fn registry_shared_across_threads() {
    let registry = preset_registry("india").unwrap();
    let inputs: Vec<MetalReadings> = (1..=8)
        .map(|i| MetalReadings {
            lead: Some(i as f64 * 0.002),
            nickel: Some(i as f64 * 0.005),
            ..Default::default()
        })
        .collect();

    let parallel: Vec<Option<f64>> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|readings| {
                let registry = &registry;
                scope.spawn(move || {
                    score_readings(readings, registry, ReferenceStandard::Who).index()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let sequential: Vec<Option<f64>> = inputs
        .iter()
        .map(|r| score_readings(r, &registry, ReferenceStandard::Who).index())
        .collect();

    assert_eq!(parallel, sequential);
}
