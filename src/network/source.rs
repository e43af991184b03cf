use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use thiserror::Error;

use crate::series::RawBlock;

/// Errors that can occur when reading from the chain data provider
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API key not configured: set the {env_var} environment variable")]
    MissingApiKey { env_var: String },

    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),

    #[error("Provider unavailable during {operation}: {message}")]
    Unavailable { operation: String, message: String },

    #[error("Malformed provider response for {operation}: {message}")]
    Malformed { operation: String, message: String },
}

impl ProviderError {
    pub fn unavailable(operation: impl Into<String>, message: impl ToString) -> Self {
        Self::Unavailable {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    pub fn malformed(operation: impl Into<String>, message: impl ToString) -> Self {
        Self::Malformed {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

/// Read capabilities the dashboard needs from a blockchain data provider
#[async_trait]
pub trait ChainDataSource: Send + Sync {
    /// Number of the most recent block
    async fn latest_block_number(&self) -> Result<u64, ProviderError>;

    /// Raw amounts of every `topic` event emitted by `address` in `block`
    async fn transfer_logs(
        &self,
        address: Address,
        topic: B256,
        block: u64,
    ) -> Result<Vec<U256>, ProviderError>;

    /// Header fields of block `number`
    async fn block(&self, number: u64) -> Result<RawBlock, ProviderError>;

    /// Short label for logs and metrics
    fn name(&self) -> &str;
}
