use std::time::Duration;

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge, register_histogram, CounterVec, Gauge, Histogram,
};
use tracing::debug;

use crate::dashboard::CycleOutcome;
use crate::series::{GasUsagePoint, Point};

lazy_static! {
    /// Refresh pipeline runs by pipeline and outcome
    static ref REFRESH_TOTAL: CounterVec = register_counter_vec!(
        "blockpulse_refresh_total",
        "Refresh pipeline runs by outcome",
        &["pipeline", "outcome"]
    ).expect("Failed to create refresh_total metric");

    /// Wall time of a full refresh cycle
    static ref REFRESH_DURATION_SECONDS: Histogram = register_histogram!(
        "blockpulse_refresh_duration_seconds",
        "Duration of a refresh cycle in seconds",
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    ).expect("Failed to create refresh_duration_seconds metric");

    /// Newest block of the last successful window
    static ref LATEST_BLOCK: Gauge = register_gauge!(
        "blockpulse_latest_block",
        "Newest block number in the displayed window"
    ).expect("Failed to create latest_block metric");

    /// Base fee of the newest block in gwei
    static ref LATEST_BASE_FEE_GWEI: Gauge = register_gauge!(
        "blockpulse_latest_base_fee_gwei",
        "Base fee of the newest block in gwei"
    ).expect("Failed to create latest_base_fee_gwei metric");

    /// Gas usage of the newest block in percent
    static ref LATEST_GAS_USAGE_PERCENT: Gauge = register_gauge!(
        "blockpulse_latest_gas_usage_percent",
        "Gas usage ratio of the newest block in percent"
    ).expect("Failed to create latest_gas_usage_percent metric");

    /// Token volume summed over the window
    static ref WINDOW_VOLUME: Gauge = register_gauge!(
        "blockpulse_window_transfer_volume",
        "Token transfer volume summed over the displayed window"
    ).expect("Failed to create window_transfer_volume metric");
}

/// Refresh cycle metrics collector
pub struct RefreshMetrics;

impl RefreshMetrics {
    /// Record the outcome and duration of a finished cycle
    pub fn record_cycle(outcome: &CycleOutcome, elapsed: Duration) {
        REFRESH_TOTAL
            .with_label_values(&["volume", outcome_label(outcome.volume_ok)])
            .inc();
        REFRESH_TOTAL
            .with_label_values(&["fee_usage", outcome_label(outcome.fee_usage_ok)])
            .inc();
        REFRESH_DURATION_SECONDS.observe(elapsed.as_secs_f64());
    }

    /// Record a freshly derived volume series
    pub fn record_volume(series: &[Point]) {
        let total: f64 = series.iter().map(|p| p.y).sum();
        WINDOW_VOLUME.set(total);
        debug!("Window volume: {}", total);
    }

    /// Record freshly derived fee and usage series
    pub fn record_fee_usage(fees: &[Point], usage: &[GasUsagePoint]) {
        if let Some(latest) = fees.last() {
            LATEST_BLOCK.set(latest.x as f64);
            LATEST_BASE_FEE_GWEI.set(latest.y);
        }
        if let Some(latest) = usage.last() {
            LATEST_GAS_USAGE_PERCENT.set(latest.y);
        }
    }
}

fn outcome_label(ok: bool) -> &'static str {
    if ok {
        "success"
    } else {
        "failure"
    }
}
