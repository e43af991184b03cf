use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use blockpulse::cli::Cli;
use blockpulse::config;
use blockpulse::dashboard::RefreshController;
use blockpulse::metrics::start_metrics_server;
use blockpulse::network::AlloyChainSource;
use blockpulse::tui;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr in headless mode and to the log pane otherwise
    let env_filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_rx = if cli.headless {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
        None
    } else {
        let (writer, rx) = tui::log_channel();
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .init();
        Some(rx)
    };

    let config = config::load_or_default(cli.config.as_deref()).context("Configuration error")?;
    info!(
        "Watching {} ({}) over the latest {} blocks, refreshing every {}s",
        config.token.symbol, config.token.address, config.window.block_count, config.refresh.interval_secs
    );

    let api_key = config::load_api_key(&config);
    let source = AlloyChainSource::new(&config.provider, api_key)
        .context("Failed to set up chain data provider")?;
    let controller = Arc::new(
        RefreshController::from_config(&config, Arc::new(source))
            .context("Invalid token configuration")?,
    );

    let metrics_server = match cli.metrics_port(config.metrics.enabled, config.metrics.port) {
        Some(port) => match start_metrics_server(port).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Metrics server disabled: failed to bind port {}: {}", port, e);
                None
            }
        },
        None => None,
    };

    controller.start();

    let result = match log_rx {
        Some(log_rx) => tui::start_tui_dashboard(controller.clone(), &config.token.symbol, log_rx)
            .await
            .context("Terminal dashboard failed"),
        None => run_headless(&controller).await,
    };

    controller.stop();
    if let Some(handle) = metrics_server {
        handle.abort();
    }
    info!("BlockPulse shut down");

    result
}

/// Logs every completed cycle's snapshot as one JSON line until Ctrl-C
async fn run_headless(controller: &Arc<RefreshController>) -> Result<()> {
    let mut cycles = controller.subscribe();
    loop {
        tokio::select! {
            changed = cycles.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = controller.snapshot().await;
                match serde_json::to_string(&snapshot) {
                    Ok(json) => info!(target: "blockpulse::snapshot", "{}", json),
                    Err(e) => error!("Failed to serialize snapshot: {}", e),
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                info!("Received Ctrl-C, stopping");
                return Ok(());
            }
        }
    }
}
