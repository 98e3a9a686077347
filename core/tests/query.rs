//! Filtering, sorting and lookup.

use climate_lab_core::{
    experiment::ExperimentRecord,
    generator::ExperimentGenerator,
    query::{
        find_by_id, high_priority, top_by_roi, within_budget, ExperimentFilter, FilterOptions,
        Query, SortKey, SortOrder,
    },
    types::Priority,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn batch(n: usize) -> Vec<ExperimentRecord> {
    ExperimentGenerator::standard(8).generate(n).unwrap()
}

fn with_roi(rois: &[f64]) -> Vec<ExperimentRecord> {
    batch(rois.len())
        .into_iter()
        .zip(rois)
        .map(|(mut r, &roi)| {
            r.expected_roi = roi;
            r
        })
        .collect()
}

fn ids(records: &[&ExperimentRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn no_constraints_returns_full_batch_in_order() {
    let records = batch(50);
    let results = Query::default().apply(&records);
    assert_eq!(results.len(), 50);
    assert!(results.iter().zip(&records).all(|(a, b)| a.id == b.id));
}

#[test]
fn empty_string_constraints_are_ignored() {
    let records = batch(20);
    let filter = ExperimentFilter {
        region: Some(String::new()),
        user_segment: Some(String::new()),
        ..Default::default()
    };
    assert!(filter.is_empty());
    assert_eq!(Query::new(filter).apply(&records).len(), 20);
}

#[test]
fn unsatisfiable_constraint_returns_empty_not_error() {
    let records = batch(50);
    let filter = ExperimentFilter {
        region: Some("Atlantis".into()),
        ..Default::default()
    };
    assert!(Query::new(filter).apply(&records).is_empty());
}

#[test]
fn constraints_combine_with_and() {
    let records = batch(1_000);
    let filter = ExperimentFilter {
        user_segment: Some("farmers".into()),
        region: Some("Lagos".into()),
        priority: Some(Priority::High),
        ..Default::default()
    };
    let results = Query::new(filter).apply(&records);
    let expected = records
        .iter()
        .filter(|r| r.user_segment == "farmers" && r.region == "Lagos" && r.priority == Priority::High)
        .count();
    assert_eq!(results.len(), expected);
    assert!(results
        .iter()
        .all(|r| r.user_segment == "farmers" && r.region == "Lagos" && r.is_high_priority()));
}

#[test]
fn roi_descending_sort() {
    let records = with_roi(&[1.5, 4.9, 3.0]);
    let results = Query::default()
        .sorted_by(SortKey::ExpectedRoi, SortOrder::Desc)
        .apply(&records);
    let rois: Vec<f64> = results.iter().map(|r| r.expected_roi).collect();
    assert_eq!(rois, vec![4.9, 3.0, 1.5]);
}

#[test]
fn ties_keep_creation_order_in_both_directions() {
    let records = with_roi(&[2.0, 3.0, 2.0, 3.0]);

    let desc = Query::default()
        .sorted_by(SortKey::ExpectedRoi, SortOrder::Desc)
        .apply(&records);
    assert_eq!(ids(&desc), ["EXP_0002", "EXP_0004", "EXP_0001", "EXP_0003"]);

    let asc = Query::default()
        .sorted_by(SortKey::ExpectedRoi, SortOrder::Asc)
        .apply(&records);
    assert_eq!(ids(&asc), ["EXP_0001", "EXP_0003", "EXP_0002", "EXP_0004"]);
}

#[test]
fn integer_sort_keys() {
    let records = batch(200);
    let by_cost = Query::default()
        .sorted_by(SortKey::CostEstimateNgn, SortOrder::Asc)
        .apply(&records);
    assert!(by_cost
        .windows(2)
        .all(|w| w[0].cost_estimate_ngn <= w[1].cost_estimate_ngn));

    let by_sample = Query::default()
        .sorted_by(SortKey::SampleSize, SortOrder::Desc)
        .apply(&records);
    assert!(by_sample.windows(2).all(|w| w[0].sample_size >= w[1].sample_size));
}

#[test]
fn sort_names_outside_the_allow_list_are_ignored() {
    assert_eq!(SortKey::parse("expected_roi"), Some(SortKey::ExpectedRoi));
    assert_eq!(SortKey::parse("cost_estimate_ngn"), Some(SortKey::CostEstimateNgn));
    assert_eq!(SortKey::parse("sample_size"), Some(SortKey::SampleSize));
    assert_eq!(SortKey::parse("experiment_id"), None);
    assert_eq!(SortKey::parse("duration_days"), None);
}

#[test]
fn order_defaults_to_descending() {
    assert_eq!(Query::default().order, SortOrder::Desc);
    assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
    assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);
    assert_eq!(SortOrder::parse("sideways"), SortOrder::Asc);
}

#[test]
fn lookup_hit_and_miss() {
    let records = batch(30);
    let hit = find_by_id(&records, "EXP_0017").expect("EXP_0017 exists");
    assert_eq!(hit, &records[16]);
    assert!(find_by_id(&records, "EXP_9999").is_none());
}

#[test]
fn analysis_helpers() {
    let records = batch(300);

    let top = top_by_roi(&records, 5);
    assert_eq!(top.len(), 5);
    let max_roi = records.iter().map(|r| r.expected_roi).fold(f64::MIN, f64::max);
    assert_eq!(top[0].expected_roi, max_roi);

    assert!(high_priority(&records).iter().all(|r| r.priority == Priority::High));

    let cheap = within_budget(&records, 200_000);
    assert!(cheap.iter().all(|r| r.cost_estimate_ngn <= 200_000));
    let expected = records.iter().filter(|r| r.cost_estimate_ngn <= 200_000).count();
    assert_eq!(cheap.len(), expected);
}

#[test]
fn budget_and_priority_helpers_compose() {
    let records = batch(400);
    let cheap_urgent = high_priority(within_budget(&records, 200_000));

    let expected: Vec<&str> = records
        .iter()
        .filter(|r| r.cost_estimate_ngn <= 200_000 && r.priority == Priority::High)
        .map(|r| r.id.as_str())
        .collect();
    let ids: Vec<&str> = cheap_urgent.iter().map(|r| r.id.as_str()).collect();
    assert!(!ids.is_empty());
    assert_eq!(ids, expected);
}

#[test]
fn filter_options_list_distinct_sorted_values() {
    let records = batch(500);
    let options = FilterOptions::from_records(&records);
    assert_eq!(
        options.segments,
        ["farmers", "government", "insurers", "logistics", "ngos"]
    );
    assert!(options.regions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(options.priorities, Priority::ALL.to_vec());
}
