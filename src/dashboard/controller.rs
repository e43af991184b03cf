use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::Utc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};

use super::fetcher::{SeriesFetcher, TokenTarget};
use super::state::{DashboardSnapshot, DashboardState};
use crate::config::models::BlockPulseConfig;
use crate::config::ConfigError;
use crate::constants::time::COUNTDOWN_TICK_SECS;
use crate::metrics::RefreshMetrics;
use crate::network::ChainDataSource;
use crate::series::{GasUsagePoint, Point};

/// Result of one refresh cycle, per sub-pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub volume_ok: bool,
    pub fee_usage_ok: bool,
}

impl CycleOutcome {
    pub fn is_success(&self) -> bool {
        self.volume_ok && self.fee_usage_ok
    }
}

/// Keeps the dashboard state in sync with the chain
///
/// Two timers run while started: the refresh timer spawns a cycle every
/// interval, and the countdown timer decrements the displayed countdown every
/// second. Cycles are never serialized against each other; when two overlap,
/// whichever finishes last overwrites the series.
pub struct RefreshController {
    fetcher: SeriesFetcher,
    state: Arc<RwLock<DashboardState>>,
    refresh_interval: Duration,
    timers: Mutex<Vec<JoinHandle<()>>>,
    cycles: watch::Sender<u64>,
}

impl RefreshController {
    pub fn new(fetcher: SeriesFetcher, refresh_interval_secs: u64) -> Self {
        let (cycles, _) = watch::channel(0);
        Self {
            fetcher,
            state: Arc::new(RwLock::new(DashboardState::new(refresh_interval_secs))),
            refresh_interval: Duration::from_secs(refresh_interval_secs),
            timers: Mutex::new(Vec::new()),
            cycles,
        }
    }

    /// Wires a controller for `source` from the token, window and refresh settings
    pub fn from_config(
        config: &BlockPulseConfig,
        source: Arc<dyn ChainDataSource>,
    ) -> Result<Self, ConfigError> {
        let token = TokenTarget::from_config(&config.token).map_err(ConfigError::Other)?;
        let fetcher = SeriesFetcher::new(source, token, config.window.block_count);
        Ok(Self::new(fetcher, config.refresh.interval_secs))
    }

    /// Shared state, for renderers that read it directly
    pub fn state(&self) -> Arc<RwLock<DashboardState>> {
        self.state.clone()
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.read().await.clone()
    }

    /// Receiver that observes the completed-cycle counter
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.cycles.subscribe()
    }

    pub fn refresh_interval_secs(&self) -> u64 {
        self.refresh_interval.as_secs()
    }

    /// Fetches and derives all three series once
    ///
    /// The volume pipeline and the fee/usage pipeline run concurrently and
    /// their results are applied together once both settle. A failed volume
    /// pipeline empties only the volume series. A failed fee/usage pipeline
    /// empties all three, including a volume series fetched in the same cycle.
    pub async fn refresh_cycle(&self) -> CycleOutcome {
        let started = Instant::now();
        self.state.write().await.refreshing = true;

        let (volume, fee_usage) = tokio::join!(self.fetch_volume(), self.fetch_fee_usage());
        let outcome = CycleOutcome {
            volume_ok: volume.is_some(),
            fee_usage_ok: fee_usage.is_some(),
        };

        let cycles_completed = {
            let mut state = self.state.write().await;
            match fee_usage {
                Some((fees, usage)) => {
                    state.volume = volume.unwrap_or_default();
                    state.base_fee = fees;
                    state.gas_usage = usage;
                }
                None => {
                    state.volume = Vec::new();
                    state.base_fee = Vec::new();
                    state.gas_usage = Vec::new();
                }
            }
            state.loading = false;
            state.refreshing = false;
            state.last_update = Some(Utc::now());
            state.countdown = self.refresh_interval_secs();
            state.cycles_completed += 1;
            state.cycles_completed
        };
        self.cycles.send_replace(cycles_completed);

        RefreshMetrics::record_cycle(&outcome, started.elapsed());
        debug!(
            "Refresh cycle {} finished in {:?}: {:?}",
            cycles_completed,
            started.elapsed(),
            outcome
        );
        outcome
    }

    async fn fetch_volume(&self) -> Option<Vec<Point>> {
        match self.fetcher.fetch_volume_series().await {
            Ok(series) => {
                RefreshMetrics::record_volume(&series);
                Some(series)
            }
            Err(e) => {
                error!("Volume refresh via {} failed: {}", self.fetcher.source_name(), e);
                None
            }
        }
    }

    async fn fetch_fee_usage(&self) -> Option<(Vec<Point>, Vec<GasUsagePoint>)> {
        match self.fetcher.fetch_fee_and_usage_series().await {
            Ok((fees, usage)) => {
                RefreshMetrics::record_fee_usage(&fees, &usage);
                Some((fees, usage))
            }
            Err(e) => {
                error!(
                    "Base fee / gas usage refresh via {} failed: {}",
                    self.fetcher.source_name(),
                    e
                );
                None
            }
        }
    }

    /// Advances the displayed countdown by one second, wrapping to the interval
    pub async fn countdown_tick(&self) -> u64 {
        let mut state = self.state.write().await;
        state.countdown = if state.countdown > 0 {
            state.countdown - 1
        } else {
            self.refresh_interval_secs()
        };
        state.countdown
    }

    /// Runs one extra cycle now, independent of any cycle already in flight
    pub fn manual_refresh(self: &Arc<Self>) -> JoinHandle<CycleOutcome> {
        info!("Manual refresh requested");
        let controller = self.clone();
        tokio::spawn(async move { controller.refresh_cycle().await })
    }

    /// Starts the refresh and countdown timers
    ///
    /// The first refresh runs immediately.
    pub fn start(self: &Arc<Self>) {
        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        if !timers.is_empty() {
            warn!("Refresh controller already started");
            return;
        }

        info!(
            "Starting refresh controller with {}s interval",
            self.refresh_interval_secs()
        );

        let controller = self.clone();
        timers.push(tokio::spawn(async move {
            let mut interval = interval(controller.refresh_interval);
            loop {
                interval.tick().await;
                let cycle = controller.clone();
                tokio::spawn(async move {
                    cycle.refresh_cycle().await;
                });
            }
        }));

        let controller = self.clone();
        timers.push(tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(COUNTDOWN_TICK_SECS));
            interval.tick().await; // Skip first tick

            loop {
                interval.tick().await;
                controller.countdown_tick().await;
            }
        }));
    }

    /// Cancels both timers. Cycles already in flight still complete and apply.
    pub fn stop(&self) {
        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        if timers.is_empty() {
            return;
        }
        for handle in timers.drain(..) {
            handle.abort();
        }
        info!("Refresh controller stopped");
    }

    pub fn is_running(&self) -> bool {
        !self
            .timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }
}
