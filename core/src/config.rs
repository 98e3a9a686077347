use crate::{
    error::{LabError, LabResult},
    experiment::ExperimentRecord,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Actions and success metrics a user segment may be assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentVocabulary {
    pub id: String,
    pub actions: Vec<String>,
    pub metrics: Vec<String>,
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericRanges {
    pub sample_size: Bounds<u32>,
    pub duration_days: Bounds<u32>,
    pub cost_estimate_ngn: Bounds<u64>,
    pub expected_roi: Bounds<f64>,
}

/// Every categorical domain, segment vocabulary and numeric range the
/// generator draws from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    pub segments: Vec<SegmentVocabulary>,
    pub regions: Vec<String>,
    pub climate_events: Vec<String>,
    pub alert_channels: Vec<String>,
    pub forecast_horizons: Vec<String>,
    pub accuracy_levels: Vec<f64>,
    pub lead_times_hours: Vec<u32>,
    pub data_sources: Vec<String>,
    pub ml_models: Vec<String>,
    pub validation_methods: Vec<String>,
    pub ranges: NumericRanges,
    /// Size bounds shared by `success_metrics` and `data_sources`.
    pub list_size: Bounds<usize>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn segment(id: &str, actions: &[&str], metrics: &[&str]) -> SegmentVocabulary {
    SegmentVocabulary {
        id: id.into(),
        actions: strings(actions),
        metrics: strings(metrics),
    }
}

impl DomainConfig {
    /// Load from `{data_dir}/domains.json`.
    /// In tests and when no override is given, use DomainConfig::standard().
    pub fn load(data_dir: &str) -> LabResult<Self> {
        let path = format!("{data_dir}/domains.json");
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Cannot read {path}"))?;
        let config: DomainConfig = serde_json::from_str(&content)
            .with_context(|| format!("Cannot parse {path}"))?;
        config.validate()?;
        log::info!(
            "loaded domain config from {path}: {} segments, {} regions",
            config.segments.len(),
            config.regions.len()
        );
        Ok(config)
    }

    /// The built-in Nigerian climate-alert domains.
    pub fn standard() -> Self {
        Self {
            segments: vec![
                segment(
                    "farmers",
                    &["plant", "irrigate", "harvest", "apply_fertilizer", "pest_control", "delay_planting"],
                    &["crop_yield_improvement", "loss_reduction", "adoption_rate", "action_compliance"],
                ),
                segment(
                    "insurers",
                    &["trigger_payout", "adjust_premium", "assess_risk", "send_alert"],
                    &["claim_accuracy", "payout_speed", "fraud_reduction", "customer_satisfaction"],
                ),
                segment(
                    "government",
                    &["evacuate", "deploy_resources", "issue_warning", "open_shelter"],
                    &["response_time", "lives_saved", "resource_efficiency", "public_trust"],
                ),
                segment(
                    "logistics",
                    &["reroute", "delay_shipment", "expedite_delivery", "warehouse_prep"],
                    &["delivery_success_rate", "cost_savings", "route_optimization", "damage_reduction"],
                ),
                segment(
                    "ngos",
                    &["distribute_aid", "mobilize_volunteers", "setup_camp", "health_intervention"],
                    &["beneficiary_reach", "aid_efficiency", "response_time", "coordination_improvement"],
                ),
            ],
            regions: strings(&[
                "Lagos", "Kano", "Rivers", "Kaduna", "Oyo", "Katsina",
                "Benue", "Niger", "Ogun", "Sokoto", "Plateau", "Enugu",
            ]),
            climate_events: strings(&[
                "heavy_rainfall", "drought", "flood", "heatwave",
                "windstorm", "early_rain", "late_rain", "dry_spell",
            ]),
            alert_channels: strings(&["sms", "mobile_app", "web_dashboard", "ussd", "whatsapp"]),
            forecast_horizons: strings(&["1_hour", "6_hours", "24_hours", "3_days", "7_days", "14_days"]),
            accuracy_levels: vec![0.65, 0.70, 0.75, 0.80, 0.85, 0.90, 0.95],
            lead_times_hours: vec![1, 3, 6, 12, 24, 48, 72],
            data_sources: strings(&[
                "nimet", "satellite_imagery", "iot_sensors", "crowdsourced",
                "global_models", "radar", "weather_stations",
            ]),
            ml_models: strings(&["random_forest", "lstm", "gradient_boosting", "ensemble"]),
            validation_methods: strings(&["cross_validation", "holdout", "time_series_split"]),
            ranges: NumericRanges {
                sample_size: Bounds::new(50, 5000),
                duration_days: Bounds::new(7, 90),
                cost_estimate_ngn: Bounds::new(50_000, 2_000_000),
                expected_roi: Bounds::new(1.5, 5.0),
            },
            list_size: Bounds::new(2, 4),
        }
    }

    pub fn segment(&self, id: &str) -> Option<&SegmentVocabulary> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn segment_ids(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.id.as_str())
    }

    /// Reject configs the generator could not draw a valid record from.
    pub fn validate(&self) -> LabResult<()> {
        let invalid = |msg: String| Err(LabError::InvalidConfig(msg));

        if self.segments.is_empty() {
            return invalid("no user segments defined".into());
        }
        let categorical: [(&str, usize); 8] = [
            ("regions", self.regions.len()),
            ("climate_events", self.climate_events.len()),
            ("alert_channels", self.alert_channels.len()),
            ("forecast_horizons", self.forecast_horizons.len()),
            ("accuracy_levels", self.accuracy_levels.len()),
            ("lead_times_hours", self.lead_times_hours.len()),
            ("ml_models", self.ml_models.len()),
            ("validation_methods", self.validation_methods.len()),
        ];
        for (name, len) in categorical {
            if len == 0 {
                return invalid(format!("domain '{name}' is empty"));
            }
        }

        if !self.list_size.is_ordered() || self.list_size.min == 0 {
            return invalid(format!(
                "list size bounds {}..={} must be non-empty and ordered",
                self.list_size.min, self.list_size.max
            ));
        }
        if self.data_sources.len() < self.list_size.min {
            return invalid(format!(
                "data_sources has {} entries, need at least {}",
                self.data_sources.len(),
                self.list_size.min
            ));
        }

        for seg in &self.segments {
            if seg.actions.is_empty() {
                return invalid(format!("segment '{}' has no actions", seg.id));
            }
            if seg.metrics.len() < self.list_size.min {
                return invalid(format!(
                    "segment '{}' has {} metrics, need at least {}",
                    seg.id,
                    seg.metrics.len(),
                    self.list_size.min
                ));
            }
        }
        if self.segments.iter().enumerate().any(|(i, s)| {
            self.segments[..i].iter().any(|earlier| earlier.id == s.id)
        }) {
            return invalid("duplicate segment id".into());
        }

        if self.accuracy_levels.iter().any(|&a| !(a > 0.0 && a <= 1.0)) {
            return invalid("accuracy levels must lie in (0, 1]".into());
        }

        let r = &self.ranges;
        if !(r.sample_size.is_ordered()
            && r.duration_days.is_ordered()
            && r.cost_estimate_ngn.is_ordered()
            && r.expected_roi.is_ordered())
        {
            return invalid("numeric range with min > max".into());
        }
        Ok(())
    }

    /// Check one record against every domain invariant.
    pub fn validate_record(&self, record: &ExperimentRecord) -> LabResult<()> {
        let violation = |reason: String| {
            Err(LabError::RecordViolation {
                id: record.id.clone(),
                reason,
            })
        };

        let Some(seg) = self.segment(&record.user_segment) else {
            return violation(format!("unknown user_segment '{}'", record.user_segment));
        };

        let categorical = [
            ("region", &record.region, &self.regions),
            ("climate_event", &record.climate_event, &self.climate_events),
            ("alert_channel", &record.alert_channel, &self.alert_channels),
            ("forecast_horizon", &record.forecast_horizon, &self.forecast_horizons),
            ("ml_model", &record.ml_model, &self.ml_models),
            ("validation_method", &record.validation_method, &self.validation_methods),
        ];
        for (field, value, domain) in categorical {
            if !domain.contains(value) {
                return violation(format!("{field} '{value}' outside its domain"));
            }
        }

        if !self.accuracy_levels.contains(&record.predicted_accuracy) {
            return violation(format!(
                "predicted_accuracy {} outside its domain",
                record.predicted_accuracy
            ));
        }
        if !self.lead_times_hours.contains(&record.lead_time_hours) {
            return violation(format!(
                "lead_time_hours {} outside its domain",
                record.lead_time_hours
            ));
        }

        if !seg.actions.contains(&record.recommended_action) {
            return violation(format!(
                "action '{}' is not registered for segment '{}'",
                record.recommended_action, seg.id
            ));
        }

        self.check_list("success_metrics", &record.success_metrics, &seg.metrics)
            .or_else(violation)?;
        self.check_list("data_sources", &record.data_sources, &self.data_sources)
            .or_else(violation)?;

        let r = &self.ranges;
        if !r.sample_size.contains(record.sample_size) {
            return violation(format!("sample_size {} out of range", record.sample_size));
        }
        if !r.duration_days.contains(record.duration_days) {
            return violation(format!("duration_days {} out of range", record.duration_days));
        }
        if !r.cost_estimate_ngn.contains(record.cost_estimate_ngn) {
            return violation(format!(
                "cost_estimate_ngn {} out of range",
                record.cost_estimate_ngn
            ));
        }
        if !r.expected_roi.contains(record.expected_roi) {
            return violation(format!("expected_roi {} out of range", record.expected_roi));
        }
        Ok(())
    }

    fn check_list(&self, field: &str, items: &[String], vocabulary: &[String]) -> Result<(), String> {
        let max = self.list_size.max.min(vocabulary.len());
        if items.len() < self.list_size.min || items.len() > max {
            return Err(format!("{field} has {} items, expected {}..={max}", items.len(), self.list_size.min));
        }
        for (i, item) in items.iter().enumerate() {
            if !vocabulary.contains(item) {
                return Err(format!("{field} entry '{item}' outside its vocabulary"));
            }
            if items[..i].contains(item) {
                return Err(format!("{field} entry '{item}' is duplicated"));
            }
        }
        Ok(())
    }
}
