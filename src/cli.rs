use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "BlockPulse - live token volume, base fee and gas usage for the latest EVM blocks",
    long_about = "BlockPulse polls an Ethereum JSON-RPC provider and charts USDT transfer volume, \
                  base fee and gas usage over a rolling window of the most recent blocks. The \
                  window is recomputed from scratch on every refresh."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log each refreshed snapshot as JSON instead of drawing the dashboard
    #[arg(long)]
    pub headless: bool,

    /// Serve Prometheus metrics on this port (overrides the config file)
    #[arg(short, long, value_name = "PORT")]
    pub metrics_port: Option<u16>,
}

impl Cli {
    /// Port the metrics server should bind, if it should run at all
    pub fn metrics_port(&self, config_enabled: bool, config_port: u16) -> Option<u16> {
        match self.metrics_port {
            Some(port) => Some(port),
            None if config_enabled => Some(config_port),
            None => None,
        }
    }
}
