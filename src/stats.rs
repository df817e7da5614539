use crate::error::{GenStatsError, Result};
use crate::records::GenerationRecord;
use crate::report::StatsReport;

const DURATION_PLACES: usize = 2;
const RATE_PLACES: usize = 1;

pub fn summarize(records: &[GenerationRecord], include_success_rate: bool) -> Result<StatsReport> {
    if records.is_empty() {
        return Err(GenStatsError::EmptyDataset);
    }

    let mut durations: Vec<f64> = records.iter().map(|r| r.duration_seconds).collect();
    durations.sort_by(f64::total_cmp);

    let min = durations[0];
    let max = durations[durations.len() - 1];

    let success_rate = include_success_rate.then(|| {
        let successful = records.iter().filter(|r| r.success).count();
        round_to(percentage(successful, records.len()), RATE_PLACES)
    });

    Ok(StatsReport {
        count: records.len(),
        mean: round_to(compute_mean(&durations), DURATION_PLACES),
        median: round_to(compute_median(&durations), DURATION_PLACES),
        min: round_to(min, DURATION_PLACES),
        max: round_to(max, DURATION_PLACES),
        success_rate,
    })
}

#[allow(clippy::cast_precision_loss)]
fn compute_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Expects `sorted` to be non-empty and ascending.
fn compute_median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: usize, total: usize) -> f64 {
    part as f64 * 100.0 / total as f64
}

/// Rounds to `places` decimals using the exact decimal value of `value`.
///
/// `2.675` is stored as `2.67499...` and rounds down; exact binary ties such
/// as `0.125` go to the even digit.
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}
