use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::series::{GasUsagePoint, Point};

/// Everything the presentation layer reads from the controller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    /// Token transfer volume per block
    pub volume: Vec<Point>,
    /// Base fee per block in Gwei
    pub base_fee: Vec<Point>,
    /// Gas usage ratio per block in percent
    pub gas_usage: Vec<GasUsagePoint>,
    /// True until the first cycle completes
    pub loading: bool,
    /// True while a cycle is in flight
    pub refreshing: bool,
    pub last_update: Option<DateTime<Utc>>,
    /// Seconds until the next scheduled refresh (display only)
    pub countdown: u64,
    pub cycles_completed: u64,
}

impl DashboardState {
    pub fn new(refresh_interval_secs: u64) -> Self {
        Self {
            volume: Vec::new(),
            base_fee: Vec::new(),
            gas_usage: Vec::new(),
            loading: true,
            refreshing: false,
            last_update: None,
            countdown: refresh_interval_secs,
            cycles_completed: 0,
        }
    }

    pub fn has_data(&self) -> bool {
        !self.volume.is_empty() || !self.base_fee.is_empty() || !self.gas_usage.is_empty()
    }

    /// Latest block shown by any series
    pub fn latest_block(&self) -> Option<u64> {
        let volume = self.volume.last().map(|p| p.x);
        let fee = self.base_fee.last().map(|p| p.x);
        volume.max(fee)
    }
}

/// Read-only copy handed to the presentation layer
pub type DashboardSnapshot = DashboardState;
