//! The experiment record: one synthetic climate-alert scenario.

use crate::types::{ExperimentId, Priority};
use serde::{Deserialize, Serialize};

/// Field names match the persisted snapshot format, so batches written by
/// earlier tooling load unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentRecord {
    #[serde(rename = "experiment_id")]
    pub id: ExperimentId,
    pub user_segment: String,
    pub region: String,
    pub climate_event: String,
    pub alert_channel: String,
    pub forecast_horizon: String,
    pub predicted_accuracy: f64,
    pub lead_time_hours: u32,
    pub recommended_action: String,
    pub hypothesis: String,
    pub success_metrics: Vec<String>,
    pub sample_size: u32,
    pub duration_days: u32,
    pub cost_estimate_ngn: u64,
    pub expected_roi: f64,
    pub priority: Priority,
    pub data_sources: Vec<String>,
    pub ml_model: String,
    pub validation_method: String,
}

impl ExperimentRecord {
    pub fn is_high_priority(&self) -> bool {
        self.priority == Priority::High
    }
}
