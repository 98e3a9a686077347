//! Generator properties checked over large samples.

use climate_lab_core::{
    config::DomainConfig, experiment::ExperimentRecord, generator::ExperimentGenerator,
    LabError,
};
use std::collections::HashSet;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn generate(seed: u64, n: usize) -> Vec<ExperimentRecord> {
    ExperimentGenerator::standard(seed).generate(n).unwrap()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn generates_exactly_n_records_with_sequential_ids() {
    for n in [1usize, 7, 500] {
        let records = generate(42, n);
        assert_eq!(records.len(), n);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.id, format!("EXP_{:04}", i + 1));
        }
        let unique: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(unique.len(), n, "ids must be unique");
    }
}

#[test]
fn zero_records_is_an_explicit_error() {
    let result = ExperimentGenerator::standard(42).generate(0);
    assert!(
        matches!(result, Err(LabError::InvalidCount { requested: 0 })),
        "expected InvalidCount, got {result:?}"
    );
}

/// 10,000 records, none with a cross-segment action or metric.
#[test]
fn actions_and_metrics_always_match_the_segment() {
    let config = DomainConfig::standard();
    let records = generate(0xC11A_7E00, 10_000);

    for record in &records {
        let seg = config
            .segment(&record.user_segment)
            .unwrap_or_else(|| panic!("{} has unknown segment {}", record.id, record.user_segment));
        assert!(
            seg.actions.contains(&record.recommended_action),
            "{}: action {} not in {} vocabulary",
            record.id,
            record.recommended_action,
            seg.id
        );
        for metric in &record.success_metrics {
            assert!(
                seg.metrics.contains(metric),
                "{}: metric {metric} not in {} vocabulary",
                record.id,
                seg.id
            );
        }
    }
}

#[test]
fn list_fields_are_bounded_and_duplicate_free() {
    for record in generate(7, 2_000) {
        for (name, items) in [
            ("success_metrics", &record.success_metrics),
            ("data_sources", &record.data_sources),
        ] {
            assert!(
                (2..=4).contains(&items.len()),
                "{}: {name} has {} items",
                record.id,
                items.len()
            );
            let unique: HashSet<&String> = items.iter().collect();
            assert_eq!(unique.len(), items.len(), "{}: {name} has duplicates", record.id);
        }
    }
}

#[test]
fn numeric_fields_stay_in_range() {
    for record in generate(99, 5_000) {
        assert!((50..=5000).contains(&record.sample_size));
        assert!((7..=90).contains(&record.duration_days));
        assert!((50_000..=2_000_000).contains(&record.cost_estimate_ngn));
        assert!((1.5..=5.0).contains(&record.expected_roi));
        let cents = record.expected_roi * 100.0;
        assert!(
            (cents - cents.round()).abs() < 1e-9,
            "{}: roi {} not rounded to 2 dp",
            record.id,
            record.expected_roi
        );
        assert!(record.predicted_accuracy > 0.0 && record.predicted_accuracy <= 1.0);
    }
}

#[test]
fn every_generated_record_passes_domain_validation() {
    let config = DomainConfig::standard();
    for record in generate(2024, 3_000) {
        config.validate_record(&record).unwrap();
    }
}

#[test]
fn every_segment_shows_up_in_a_large_batch() {
    let records = generate(11, 1_000);
    let seen: HashSet<&str> = records.iter().map(|r| r.user_segment.as_str()).collect();
    for segment in DomainConfig::standard().segment_ids() {
        assert!(seen.contains(segment), "segment {segment} never generated");
    }
}

#[test]
fn validation_catches_a_cross_segment_action() {
    let config = DomainConfig::standard();
    let mut record = generate(5, 1).remove(0);
    record.user_segment = "farmers".into();
    record.recommended_action = "evacuate".into();
    let err = config.validate_record(&record).unwrap_err();
    assert!(
        matches!(err, LabError::RecordViolation { .. }),
        "unexpected error: {err}"
    );
}

#[test]
fn custom_config_is_honoured() {
    let mut config = DomainConfig::standard();
    config.regions = vec!["Abuja".into()];
    config.climate_events = vec!["flood".into()];
    let records = ExperimentGenerator::new(config, 3)
        .unwrap()
        .generate(200)
        .unwrap();
    assert!(records.iter().all(|r| r.region == "Abuja" && r.climate_event == "flood"));
}
