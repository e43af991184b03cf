//! Application-wide constants
//!
//! This module contains all the magic numbers and default values used throughout
//! the application, making them easy to find and modify.

/// Block window constants
pub mod window {
    /// Number of most recent blocks examined on every refresh cycle
    pub const DEFAULT_BLOCK_COUNT: u64 = 10;
}

/// Time-related constants
pub mod time {
    /// Interval between scheduled refresh cycles (in seconds)
    pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 12;

    /// Interval between countdown ticks (in seconds)
    pub const COUNTDOWN_TICK_SECS: u64 = 1;
}

/// Token and event constants
pub mod token {
    use alloy::primitives::{keccak256, B256};
    use once_cell::sync::Lazy;

    /// USDT contract on Ethereum mainnet
    pub const DEFAULT_TOKEN_ADDRESS: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

    /// Display symbol of the default token
    pub const DEFAULT_TOKEN_SYMBOL: &str = "USDT";

    /// USDT amounts are fixed-point with 6 decimals
    pub const DEFAULT_TOKEN_DECIMALS: u8 = 6;

    /// Canonical ERC-20 Transfer event signature
    pub const TRANSFER_EVENT_SIGNATURE: &str = "Transfer(address,address,uint256)";

    /// topic0 of the Transfer event, hashed once on first use
    pub static TRANSFER_TOPIC: Lazy<B256> =
        Lazy::new(|| keccak256(TRANSFER_EVENT_SIGNATURE.as_bytes()));
}

/// Derivation constants
pub mod derivation {
    /// Wei per Gwei
    pub const WEI_PER_GWEI: f64 = 1e9;

    /// Gas usage at or below this percentage sets `gas_usage_increase`
    pub const GAS_USAGE_THRESHOLD_PCT: f64 = 50.0;
}

/// Network-related constants
pub mod network {
    /// Default provider endpoint; the API key is appended as the last path segment
    pub const DEFAULT_RPC_URL: &str = "https://eth-mainnet.g.alchemy.com/v2";

    /// Environment variable holding the provider API key
    pub const DEFAULT_API_KEY_ENV: &str = "ALCHEMY_API_KEY";
}

/// Metrics-related constants
pub mod metrics {
    /// Port for Prometheus metrics server
    pub const METRICS_SERVER_PORT: u16 = 9090;
}

/// Terminal dashboard constants
pub mod tui {
    /// Redraw / input poll rate (in milliseconds)
    pub const TICK_MS: u64 = 200;

    /// Log lines kept for the log pane
    pub const MAX_LOG_LINES: usize = 1000;
}
