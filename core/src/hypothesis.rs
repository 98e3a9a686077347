//! Hypothesis sentences for experiment records.
//!
//! Presentation only: nothing aggregates or filters on the hypothesis text.
//! The template is chosen from the record's own RNG stream, so the same
//! seed always yields the same sentence.

use crate::rng::RecordRng;

/// Number of hypothesis templates.
pub const TEMPLATE_COUNT: usize = 4;

/// Deterministic hypothesis writer.
pub struct HypothesisWriter;

impl HypothesisWriter {
    /// Pick a template and fill it from the record's fields.
    pub fn write(
        rng: &mut RecordRng,
        segment: &str,
        event: &str,
        channel: &str,
        accuracy: f64,
    ) -> String {
        let template = rng.range_u32(0, TEMPLATE_COUNT as u32 - 1) as usize;
        Self::render(template, segment, event, channel, accuracy)
    }

    /// Render template `index` (taken modulo the template count).
    pub fn render(index: usize, segment: &str, event: &str, channel: &str, accuracy: f64) -> String {
        match index % TEMPLATE_COUNT {
            0 => format!(
                "Delivering {event} alerts via {channel} to {segment} with {:.1}% accuracy \
                 will increase preparedness by 30%",
                accuracy * 100.0
            ),
            1 => format!("{segment} receiving {event} warnings through {channel} will reduce losses by 40%"),
            2 => format!(
                "Early {event} detection for {segment} via {channel} improves decision-making \
                 response time by 50%"
            ),
            _ => format!("{channel}-based alerts for {event} will increase {segment} platform adoption by 25%"),
        }
    }
}
