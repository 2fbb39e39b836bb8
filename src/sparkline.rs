//! Per-coin trend series for sparkline charts

use crate::constants::SPARKLINE_POINTS;
use serde::{Deserialize, Serialize};

/// The last `SPARKLINE_POINTS` samples, in their original order
pub fn trend_series(samples: &[f64]) -> &[f64] {
    let start = samples.len().saturating_sub(SPARKLINE_POINTS);
    &samples[start..]
}

/// Direction of a trend series, used to colour the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SparklineTrend {
    Up,
    Down,
    /// No samples
    Flat,
}

impl SparklineTrend {
    /// Up when the last sample is at or above the first
    pub fn of(series: &[f64]) -> Self {
        match (series.first(), series.last()) {
            (Some(first), Some(last)) if last >= first => SparklineTrend::Up,
            (Some(_), Some(_)) => SparklineTrend::Down,
            _ => SparklineTrend::Flat,
        }
    }
}
