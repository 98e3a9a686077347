//! Experiment generator: builds a batch of synthetic records.
//!
//! Every field is drawn uniformly and independently from its domain,
//! with one exception: `recommended_action` and `success_metrics` come
//! from the vocabulary registered for the record's `user_segment`.
//!
//! Records never depend on each other. Record N is a pure function of
//! (config, seed, N), so a batch can be regenerated or extended exactly.

use crate::{
    config::DomainConfig,
    error::{LabError, LabResult},
    experiment::ExperimentRecord,
    hypothesis::HypothesisWriter,
    rng::RngBank,
    types::{experiment_id, Priority, Seed},
};

pub struct ExperimentGenerator {
    config: DomainConfig,
    rng_bank: RngBank,
}

impl ExperimentGenerator {
    /// Build a generator over a validated config.
    pub fn new(config: DomainConfig, seed: Seed) -> LabResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng_bank: RngBank::new(seed),
        })
    }

    /// Generator over the built-in domains.
    pub fn standard(seed: Seed) -> Self {
        Self {
            config: DomainConfig::standard(),
            rng_bank: RngBank::new(seed),
        }
    }

    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    pub fn seed(&self) -> Seed {
        self.rng_bank.seed()
    }

    /// Generate `count` records with ids `EXP_0001..` in creation order.
    pub fn generate(&self, count: usize) -> LabResult<Vec<ExperimentRecord>> {
        if count == 0 {
            return Err(LabError::InvalidCount { requested: count });
        }
        let records: Vec<ExperimentRecord> = (1..=count).map(|seq| self.generate_record(seq)).collect();
        log::info!(
            "generated {} experiments (seed={}, segments={})",
            records.len(),
            self.seed(),
            self.config.segments.len()
        );
        Ok(records)
    }

    /// Build the record with 1-based sequence number `seq`.
    pub fn generate_record(&self, seq: usize) -> ExperimentRecord {
        let mut rng = self.rng_bank.for_record(seq);
        let cfg = &self.config;
        let ranges = &cfg.ranges;

        let segment = rng.pick(&cfg.segments);
        let region = rng.pick(&cfg.regions).clone();
        let climate_event = rng.pick(&cfg.climate_events).clone();
        let alert_channel = rng.pick(&cfg.alert_channels).clone();
        let forecast_horizon = rng.pick(&cfg.forecast_horizons).clone();
        let predicted_accuracy = *rng.pick(&cfg.accuracy_levels);
        let lead_time_hours = *rng.pick(&cfg.lead_times_hours);
        let recommended_action = rng.pick(&segment.actions).clone();

        let hypothesis = HypothesisWriter::write(
            &mut rng,
            &segment.id,
            &climate_event,
            &alert_channel,
            predicted_accuracy,
        );
        let success_metrics =
            rng.sample_distinct(&segment.metrics, cfg.list_size.min, cfg.list_size.max);

        let sample_size = rng.range_u32(ranges.sample_size.min, ranges.sample_size.max);
        let duration_days = rng.range_u32(ranges.duration_days.min, ranges.duration_days.max);
        let cost_estimate_ngn =
            rng.range_u64(ranges.cost_estimate_ngn.min, ranges.cost_estimate_ngn.max);
        let expected_roi = round_2dp(rng.uniform(ranges.expected_roi.min, ranges.expected_roi.max));
        let priority = *rng.pick(&Priority::ALL);
        let data_sources = rng.sample_distinct(&cfg.data_sources, cfg.list_size.min, cfg.list_size.max);
        let ml_model = rng.pick(&cfg.ml_models).clone();
        let validation_method = rng.pick(&cfg.validation_methods).clone();

        ExperimentRecord {
            id: experiment_id(seq),
            user_segment: segment.id.clone(),
            region,
            climate_event,
            alert_channel,
            forecast_horizon,
            predicted_accuracy,
            lead_time_hours,
            recommended_action,
            hypothesis,
            success_metrics,
            sample_size,
            duration_days,
            cost_estimate_ngn,
            expected_roi,
            priority,
            data_sources,
            ml_model,
            validation_method,
        }
    }
}

/// Round half away from zero to two decimal places.
fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
