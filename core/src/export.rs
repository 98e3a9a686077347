//! Flat tabular export for spreadsheet tooling.

use crate::{error::LabResult, experiment::ExperimentRecord, types::Priority};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Separator used when a list-valued field is flattened into one cell.
pub const LIST_SEPARATOR: &str = ", ";

/// One CSV row. List fields are joined with LIST_SEPARATOR.
#[derive(Debug, Serialize)]
pub struct ExperimentRow<'a> {
    pub experiment_id: &'a str,
    pub user_segment: &'a str,
    pub region: &'a str,
    pub climate_event: &'a str,
    pub alert_channel: &'a str,
    pub forecast_horizon: &'a str,
    pub predicted_accuracy: f64,
    pub lead_time_hours: u32,
    pub recommended_action: &'a str,
    pub sample_size: u32,
    pub duration_days: u32,
    pub cost_estimate_ngn: u64,
    pub expected_roi: f64,
    pub priority: Priority,
    pub ml_model: &'a str,
    pub validation_method: &'a str,
    pub success_metrics: String,
    pub data_sources: String,
    pub hypothesis: &'a str,
}

impl<'a> From<&'a ExperimentRecord> for ExperimentRow<'a> {
    fn from(r: &'a ExperimentRecord) -> Self {
        Self {
            experiment_id: &r.id,
            user_segment: &r.user_segment,
            region: &r.region,
            climate_event: &r.climate_event,
            alert_channel: &r.alert_channel,
            forecast_horizon: &r.forecast_horizon,
            predicted_accuracy: r.predicted_accuracy,
            lead_time_hours: r.lead_time_hours,
            recommended_action: &r.recommended_action,
            sample_size: r.sample_size,
            duration_days: r.duration_days,
            cost_estimate_ngn: r.cost_estimate_ngn,
            expected_roi: r.expected_roi,
            priority: r.priority,
            ml_model: &r.ml_model,
            validation_method: &r.validation_method,
            success_metrics: r.success_metrics.join(LIST_SEPARATOR),
            data_sources: r.data_sources.join(LIST_SEPARATOR),
            hypothesis: &r.hypothesis,
        }
    }
}

/// Write a header row plus one row per record. Returns the rows written.
pub fn write_csv<W: Write>(records: &[ExperimentRecord], writer: W) -> LabResult<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(ExperimentRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}

pub fn export_csv<P: AsRef<Path>>(records: &[ExperimentRecord], path: P) -> LabResult<usize> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let rows = write_csv(records, BufWriter::new(file))?;
    log::info!("exported {rows} experiments to {}", path.display());
    Ok(rows)
}
