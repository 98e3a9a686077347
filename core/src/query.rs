//! Shared filter/sort logic for every presentation surface.

use crate::{experiment::ExperimentRecord, types::Priority};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Optional equality constraints, combined with AND.
/// A constraint with no value (or an empty string) is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExperimentFilter {
    pub user_segment: Option<String>,
    pub region: Option<String>,
    pub climate_event: Option<String>,
    pub alert_channel: Option<String>,
    pub priority: Option<Priority>,
}

fn field_matches(constraint: &Option<String>, value: &str) -> bool {
    match constraint.as_deref() {
        None | Some("") => true,
        Some(wanted) => wanted == value,
    }
}

impl ExperimentFilter {
    pub fn is_empty(&self) -> bool {
        [&self.user_segment, &self.region, &self.climate_event, &self.alert_channel]
            .iter()
            .all(|c| c.as_deref().map_or(true, str::is_empty))
            && self.priority.is_none()
    }

    pub fn matches(&self, record: &ExperimentRecord) -> bool {
        field_matches(&self.user_segment, &record.user_segment)
            && field_matches(&self.region, &record.region)
            && field_matches(&self.climate_event, &record.climate_event)
            && field_matches(&self.alert_channel, &record.alert_channel)
            && self.priority.map_or(true, |p| p == record.priority)
    }
}

/// Numeric fields a result may be sorted by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    ExpectedRoi,
    CostEstimateNgn,
    SampleSize,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpectedRoi => "expected_roi",
            Self::CostEstimateNgn => "cost_estimate_ngn",
            Self::SampleSize => "sample_size",
        }
    }

    /// Parse a sort field name. Anything outside the allow-list means
    /// "keep creation order" and yields None.
    pub fn parse(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    fn compare(&self, a: &ExperimentRecord, b: &ExperimentRecord) -> Ordering {
        match self {
            Self::ExpectedRoi => a.expected_roi.total_cmp(&b.expected_roi),
            Self::CostEstimateNgn => a.cost_estimate_ngn.cmp(&b.cost_estimate_ngn),
            Self::SampleSize => a.sample_size.cmp(&b.sample_size),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expected_roi" => Ok(Self::ExpectedRoi),
            "cost_estimate_ngn" => Ok(Self::CostEstimateNgn),
            "sample_size" => Ok(Self::SampleSize),
            other => Err(format!("cannot sort by '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `desc` is descending; any other value is ascending.
    pub fn parse(name: &str) -> Self {
        if name == "desc" {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: ExperimentFilter,
    pub sort: Option<SortKey>,
    pub order: SortOrder,
}

impl Query {
    pub fn new(filter: ExperimentFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn sorted_by(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = Some(key);
        self.order = order;
        self
    }

    /// Filter, then sort if a key is set. Equal keys keep creation order.
    pub fn apply<'a>(&self, records: &'a [ExperimentRecord]) -> Vec<&'a ExperimentRecord> {
        let mut results: Vec<&ExperimentRecord> =
            records.iter().filter(|r| self.filter.matches(r)).collect();

        if let Some(key) = self.sort {
            match self.order {
                SortOrder::Asc => results.sort_by(|a, b| key.compare(a, b)),
                SortOrder::Desc => results.sort_by(|a, b| key.compare(b, a)),
            }
        }
        log::debug!(
            "query matched {} of {} experiments (sort={:?}, order={:?})",
            results.len(),
            records.len(),
            self.sort,
            self.order
        );
        results
    }
}

/// Look up one record by id. None means "not found", which is distinct
/// from a query that simply matched nothing.
pub fn find_by_id<'a>(records: &'a [ExperimentRecord], id: &str) -> Option<&'a ExperimentRecord> {
    records.iter().find(|r| r.id == id)
}

/// The `n` records with the highest expected ROI.
pub fn top_by_roi(records: &[ExperimentRecord], n: usize) -> Vec<&ExperimentRecord> {
    let mut top = Query::default()
        .sorted_by(SortKey::ExpectedRoi, SortOrder::Desc)
        .apply(records);
    top.truncate(n);
    top
}

/// High-priority records, in input order. Accepts a slice or the output of
/// another helper such as `within_budget`.
pub fn high_priority<'a, I>(records: I) -> Vec<&'a ExperimentRecord>
where
    I: IntoIterator<Item = &'a ExperimentRecord>,
{
    records.into_iter().filter(|r| r.is_high_priority()).collect()
}

/// Records whose cost estimate does not exceed `max_ngn`.
pub fn within_budget(records: &[ExperimentRecord], max_ngn: u64) -> Vec<&ExperimentRecord> {
    records
        .iter()
        .filter(|r| r.cost_estimate_ngn <= max_ngn)
        .collect()
}

/// Distinct values available for each filterable dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterOptions {
    pub segments: Vec<String>,
    pub regions: Vec<String>,
    pub events: Vec<String>,
    pub channels: Vec<String>,
    pub priorities: Vec<Priority>,
}

impl FilterOptions {
    pub fn from_records(records: &[ExperimentRecord]) -> Self {
        fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
            values.collect::<BTreeSet<_>>().into_iter().cloned().collect()
        }
        Self {
            segments: distinct(records.iter().map(|r| &r.user_segment)),
            regions: distinct(records.iter().map(|r| &r.region)),
            events: distinct(records.iter().map(|r| &r.climate_event)),
            channels: distinct(records.iter().map(|r| &r.alert_channel)),
            priorities: Priority::ALL.to_vec(),
        }
    }
}
