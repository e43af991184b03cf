use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::metrics_config::MetricsConfig;
use crate::constants;

/// The main configuration structure for blockpulse
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BlockPulseConfig {
    /// Chain data provider
    #[serde(default)]
    #[validate]
    pub provider: ProviderConfig,

    /// Token whose transfer volume is charted
    #[serde(default)]
    #[validate]
    pub token: TokenConfig,

    /// Block window
    #[serde(default)]
    #[validate]
    pub window: WindowConfig,

    /// Refresh timer
    #[serde(default)]
    #[validate]
    pub refresh: RefreshConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Configuration for the chain data provider
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProviderConfig {
    /// Label used in logs (e.g., "ethereum")
    #[serde(default = "default_provider_name")]
    #[validate(length(min = 1))]
    pub name: String,

    /// Base RPC URL; the API key is appended as the last path segment
    #[serde(default = "default_rpc_url")]
    #[validate(url)]
    pub rpc_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    #[validate(length(min = 1))]
    pub api_key_env: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            rpc_url: default_rpc_url(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Configuration for the charted token
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TokenConfig {
    /// Token contract address
    #[serde(default = "default_token_address")]
    #[validate(custom = "validate_address")]
    pub address: String,

    /// Display symbol (e.g., "USDT")
    #[serde(default = "default_token_symbol")]
    #[validate(length(min = 1, max = 16))]
    pub symbol: String,

    /// Fixed-point decimals of the token's base unit
    #[serde(default = "default_token_decimals")]
    #[validate(range(min = 0, max = 36))]
    pub decimals: u8,
}

impl TokenConfig {
    /// Parsed contract address. Only valid after validation.
    pub fn parsed_address(&self) -> Result<Address, String> {
        self.address
            .parse::<Address>()
            .map_err(|e| format!("Invalid token address '{}': {}", self.address, e))
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            address: default_token_address(),
            symbol: default_token_symbol(),
            decimals: default_token_decimals(),
        }
    }
}

/// Configuration for the block window
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WindowConfig {
    /// Number of most recent blocks examined per cycle
    #[serde(default = "default_block_count")]
    #[validate(range(min = 1, max = 128))]
    pub block_count: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            block_count: default_block_count(),
        }
    }
}

/// Configuration for the refresh timer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshConfig {
    /// Seconds between scheduled refresh cycles; also the countdown start value
    #[serde(default = "default_refresh_interval")]
    #[validate(range(min = 1, max = 3600))]
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_refresh_interval(),
        }
    }
}

fn default_provider_name() -> String {
    "ethereum".to_string()
}

fn default_rpc_url() -> String {
    constants::network::DEFAULT_RPC_URL.to_string()
}

fn default_api_key_env() -> String {
    constants::network::DEFAULT_API_KEY_ENV.to_string()
}

fn default_token_address() -> String {
    constants::token::DEFAULT_TOKEN_ADDRESS.to_string()
}

fn default_token_symbol() -> String {
    constants::token::DEFAULT_TOKEN_SYMBOL.to_string()
}

fn default_token_decimals() -> u8 {
    constants::token::DEFAULT_TOKEN_DECIMALS
}

fn default_block_count() -> u64 {
    constants::window::DEFAULT_BLOCK_COUNT
}

fn default_refresh_interval() -> u64 {
    constants::time::DEFAULT_REFRESH_INTERVAL_SECS
}

fn validate_address(address: &str) -> Result<(), ValidationError> {
    match address.parse::<Address>() {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("invalid_eth_address")),
    }
}
