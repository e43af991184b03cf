//! Derivation of chart series from raw block and log data
//!
//! Everything in this module is pure: no I/O, no state. The refresh controller
//! fetches raw data and hands it here once per cycle.

pub mod fee_usage;
pub mod models;
pub mod volume;
pub mod window;


pub use fee_usage::derive_fee_and_usage_series;
pub use models::{ChartPoint, DerivationError, GasUsagePoint, Point, RawBlock};
pub use volume::derive_volume_series;
pub use window::BlockWindow;
