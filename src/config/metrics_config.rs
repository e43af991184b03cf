use serde::{Deserialize, Serialize};

use crate::constants;

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Serve Prometheus metrics over HTTP
    #[serde(default)]
    pub enabled: bool,

    /// Metrics server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    constants::metrics::METRICS_SERVER_PORT
}
