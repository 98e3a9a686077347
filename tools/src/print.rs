//! Console rendering for the runner.

use climate_lab_core::{ExperimentRecord, SummaryReport};
use std::path::Path;

const RULE: &str = "============================================================";

pub fn heading(title: &str) {
    println!("\n{RULE}");
    println!("{title}");
    println!("{RULE}");
}

pub fn banner(data_dir: &Path, seed: u64, count: usize) {
    println!("Climate Alert Experiment Lab: lab-runner");
    println!("  seed:      {seed}");
    println!("  count:     {count}");
    println!("  data_dir:  {}", data_dir.display());
}

pub fn summary(s: &SummaryReport) {
    heading("EXPERIMENT SUMMARY");
    println!("Total Experiments: {}", s.total_experiments);
    println!("Average Sample Size: {:.0} users", s.avg_sample_size);
    println!("Total Estimated Cost: {}", naira(s.total_estimated_cost));
    println!("Average Expected ROI: {:.2}x", s.avg_expected_roi);
    println!("High Priority Experiments: {}", s.high_priority_count);

    println!("\nDistribution by User Segment:");
    for (segment, count) in &s.by_segment {
        println!("  {segment}: {count}");
    }

    println!("\nDistribution by Climate Event:");
    for (event, count) in s.top_events(5) {
        println!("  {event}: {count}");
    }

    println!("\nDistribution by Alert Channel:");
    for (channel, count) in &s.by_channel {
        println!("  {channel}: {count}");
    }
}

/// Short form used right after generation.
pub fn samples(records: &[ExperimentRecord], n: usize) {
    heading(&format!("SAMPLE EXPERIMENTS (First {n})"));
    for (i, exp) in records.iter().take(n).enumerate() {
        println!("\n{}. {}", i + 1, exp.id);
        println!("   Segment: {} | Region: {}", exp.user_segment, exp.region);
        println!("   Event: {} | Channel: {}", exp.climate_event, exp.alert_channel);
        println!("   Hypothesis: {}", exp.hypothesis);
        println!(
            "   Sample Size: {} | Duration: {} days",
            exp.sample_size, exp.duration_days
        );
        println!(
            "   Expected ROI: {}x | Priority: {}",
            exp.expected_roi, exp.priority
        );
    }
}

pub fn experiment(exp: &ExperimentRecord) {
    println!("\n{RULE}");
    println!(
        "ID: {} | Priority: {}",
        exp.id,
        exp.priority.as_str().to_uppercase()
    );
    println!("{RULE}");
    println!("Segment: {}", title_case(&exp.user_segment));
    println!("Region: {}", exp.region);
    println!("Event: {}", title_case(&exp.climate_event));
    println!("Channel: {}", title_case(&exp.alert_channel));
    println!("\nHypothesis:");
    println!("  {}", exp.hypothesis);
    println!("\nMetrics: {}", exp.success_metrics.join(", "));
    println!("\nDetails:");
    println!("  Sample Size: {} users", thousands(u64::from(exp.sample_size)));
    println!("  Duration: {} days", exp.duration_days);
    println!("  Cost: {}", naira(exp.cost_estimate_ngn));
    println!("  Expected ROI: {}x", exp.expected_roi);
    println!("  Accuracy: {}", percent(exp.predicted_accuracy));
    println!("  Lead Time: {} hours", exp.lead_time_hours);
    println!("  ML Model: {}", exp.ml_model);
    println!("  Data Sources: {}", exp.data_sources.join(", "));
}

/// 0.85 -> "85.0%"
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

pub fn naira(amount: u64) -> String {
    format!("₦{}", thousands(amount))
}

/// 1234567 -> "1,234,567"
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "heavy_rainfall" -> "Heavy Rainfall"
pub fn title_case(label: &str) -> String {
    label
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
