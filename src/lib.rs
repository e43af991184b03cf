//! Live USDT volume, base fee and gas usage over the most recent EVM blocks

pub mod cli;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod network;
pub mod series;
pub mod test_utils;
pub mod tui;

pub use error::BlockPulseError;
