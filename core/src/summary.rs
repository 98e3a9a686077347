//! Summarizer: rolls a record batch up into counts and averages.
//!
//! Pure aggregation: category values are counted exactly as they appear,
//! with no domain validation of their own.

use crate::{
    error::{LabError, LabResult},
    experiment::ExperimentRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Occurrence count per observed category value.
pub type CategoryCounts = BTreeMap<String, usize>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryReport {
    pub total_experiments: usize,
    pub by_segment: CategoryCounts,
    pub by_region: CategoryCounts,
    pub by_event: CategoryCounts,
    pub by_channel: CategoryCounts,
    pub avg_sample_size: f64,
    pub total_estimated_cost: u64,
    pub avg_expected_roi: f64,
    pub high_priority_count: usize,
}

impl SummaryReport {
    /// The `n` most frequent climate events, ties broken by name.
    pub fn top_events(&self, n: usize) -> Vec<(&str, usize)> {
        let mut events: Vec<(&str, usize)> = self
            .by_event
            .iter()
            .map(|(event, count)| (event.as_str(), *count))
            .collect();
        events.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        events.truncate(n);
        events
    }
}

/// Reduce a non-empty batch to its rollup statistics.
pub fn summarize(records: &[ExperimentRecord]) -> LabResult<SummaryReport> {
    if records.is_empty() {
        return Err(LabError::EmptyBatch);
    }

    let mut by_segment = CategoryCounts::new();
    let mut by_region = CategoryCounts::new();
    let mut by_event = CategoryCounts::new();
    let mut by_channel = CategoryCounts::new();
    let mut sample_total: u64 = 0;
    let mut total_estimated_cost: u64 = 0;
    let mut roi_total = 0.0;
    let mut high_priority_count = 0;

    for record in records {
        *by_segment.entry(record.user_segment.clone()).or_default() += 1;
        *by_region.entry(record.region.clone()).or_default() += 1;
        *by_event.entry(record.climate_event.clone()).or_default() += 1;
        *by_channel.entry(record.alert_channel.clone()).or_default() += 1;

        sample_total += u64::from(record.sample_size);
        total_estimated_cost += record.cost_estimate_ngn;
        roi_total += record.expected_roi;
        if record.is_high_priority() {
            high_priority_count += 1;
        }
    }

    let n = records.len() as f64;
    let report = SummaryReport {
        total_experiments: records.len(),
        by_segment,
        by_region,
        by_event,
        by_channel,
        avg_sample_size: sample_total as f64 / n,
        total_estimated_cost,
        avg_expected_roi: roi_total / n,
        high_priority_count,
    };
    log::debug!(
        "summarized {} experiments: {} high priority, avg roi {:.2}",
        report.total_experiments,
        report.high_priority_count,
        report.avg_expected_roi
    );
    Ok(report)
}
