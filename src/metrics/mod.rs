pub mod refresh_metrics;
pub mod server;

pub use refresh_metrics::RefreshMetrics;
pub use server::start_metrics_server;
