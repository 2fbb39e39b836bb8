//! Fetch statistics per pipeline
//!
//! Keeps a rolling window of request latencies plus lifetime counters for
//! each remote endpoint the board talks to.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::RwLock;

/// Number of latency samples kept per pipeline
const MAX_SAMPLES: usize = 100;

/// The independent fetch pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pipeline {
    Market,
    ExchangeRate,
    News,
}

impl Pipeline {
    pub fn name(&self) -> &'static str {
        match self {
            Pipeline::Market => "market",
            Pipeline::ExchangeRate => "exchange_rate",
            Pipeline::News => "news",
        }
    }
}

/// Summary for one pipeline
#[derive(Debug, Clone, Serialize)]
pub struct FetchStats {
    pub pipeline: Pipeline,
    pub total_requests: u64,
    pub failed_requests: u64,
    /// Failures since the last success
    pub consecutive_failures: u32,
    pub latency_p50_ms: f64,
    pub latency_p99_ms: f64,
    pub last_success: Option<DateTime<Utc>>,
}

impl FetchStats {
    fn empty(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            total_requests: 0,
            failed_requests: 0,
            consecutive_failures: 0,
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            last_success: None,
        }
    }

    /// Share of successful requests, 1.0 when nothing was recorded
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            1.0
        } else {
            (self.total_requests - self.failed_requests) as f64 / self.total_requests as f64
        }
    }
}

#[derive(Debug, Default)]
struct PipelineCounters {
    latencies_ms: VecDeque<f64>,
    total: u64,
    failed: u64,
    consecutive_failures: u32,
    last_success: Option<DateTime<Utc>>,
}

/// Collector shared by a board session and its news feed
#[derive(Debug, Default)]
pub struct FetchMetrics {
    pipelines: RwLock<HashMap<Pipeline, PipelineCounters>>,
}

impl FetchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one request outcome
    pub async fn record(&self, pipeline: Pipeline, duration: Duration, success: bool) {
        let mut pipelines = self.pipelines.write().await;
        let counters = pipelines.entry(pipeline).or_default();

        counters.total += 1;
        if success {
            counters.consecutive_failures = 0;
            counters.last_success = Some(Utc::now());

            if counters.latencies_ms.len() >= MAX_SAMPLES {
                counters.latencies_ms.pop_front();
            }
            counters
                .latencies_ms
                .push_back(duration.as_secs_f64() * 1000.0);
        } else {
            counters.failed += 1;
            counters.consecutive_failures = counters.consecutive_failures.saturating_add(1);
        }
    }

    /// Summary for one pipeline
    pub async fn stats(&self, pipeline: Pipeline) -> FetchStats {
        let pipelines = self.pipelines.read().await;
        let Some(counters) = pipelines.get(&pipeline) else {
            return FetchStats::empty(pipeline);
        };

        let mut latencies: Vec<f64> = counters.latencies_ms.iter().copied().collect();
        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        FetchStats {
            pipeline,
            total_requests: counters.total,
            failed_requests: counters.failed,
            consecutive_failures: counters.consecutive_failures,
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            last_success: counters.last_success,
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}
