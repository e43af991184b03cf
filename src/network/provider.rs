use std::sync::Arc;

use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, B256, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::Filter,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use url::Url;

use super::source::{ChainDataSource, ProviderError};
use crate::config::models::ProviderConfig;
use crate::series::RawBlock;

/// Type alias for the alloy provider we will use
pub type EthProvider = RootProvider<Http<Client>>;

/// Chain data source backed by an alloy HTTP provider
///
/// Built even when no API key is available; in that case every call fails with
/// [`ProviderError::MissingApiKey`] and the dashboard shows empty charts.
pub struct AlloyChainSource {
    provider: Option<Arc<EthProvider>>,
    api_key: Option<SecretString>,
    api_key_env: String,
    name: String,
}

impl AlloyChainSource {
    /// Create a source from provider configuration and an optional API key
    pub fn new(config: &ProviderConfig, api_key: Option<SecretString>) -> Result<Self, ProviderError> {
        let provider = match &api_key {
            Some(key) => {
                let url = Self::endpoint_url(&config.rpc_url, key)?;
                info!("Using chain data provider at {}", config.rpc_url);
                Some(Arc::new(ProviderBuilder::new().on_http(url)))
            }
            None => {
                warn!(
                    "No API key found in {}; provider calls will fail until it is set",
                    config.api_key_env
                );
                None
            }
        };

        Ok(Self {
            provider,
            api_key,
            api_key_env: config.api_key_env.clone(),
            name: config.name.clone(),
        })
    }

    /// Create a source from an already-built provider
    pub fn from_provider(provider: Arc<EthProvider>, name: &str) -> Self {
        Self {
            provider: Some(provider),
            api_key: None,
            api_key_env: String::new(),
            name: name.to_string(),
        }
    }

    /// Appends the API key to the base RPC URL as its last path segment
    pub fn endpoint_url(rpc_url: &str, api_key: &SecretString) -> Result<Url, ProviderError> {
        let base = rpc_url.trim_end_matches('/');
        let full = format!("{}/{}", base, api_key.expose_secret());
        // Report the base URL only; the full one carries the key
        Url::parse(&full).map_err(|e| ProviderError::InvalidUrl(format!("{base}: {e}")))
    }

    fn provider(&self) -> Result<&EthProvider, ProviderError> {
        self.provider
            .as_deref()
            .ok_or_else(|| ProviderError::MissingApiKey {
                env_var: self.api_key_env.clone(),
            })
    }

    /// Transport errors may echo the request URL, which embeds the key
    fn unavailable(&self, operation: &str, error: impl ToString) -> ProviderError {
        let mut message = error.to_string();
        if let Some(key) = &self.api_key {
            let key = key.expose_secret();
            if !key.is_empty() {
                message = message.replace(key, "***");
            }
        }
        ProviderError::unavailable(operation, message)
    }
}

#[async_trait]
impl ChainDataSource for AlloyChainSource {
    async fn latest_block_number(&self) -> Result<u64, ProviderError> {
        let block_number = self
            .provider()?
            .get_block_number()
            .await
            .map_err(|e| self.unavailable("get_block_number", e))?;

        debug!("Latest block on {}: {}", self.name, block_number);
        Ok(block_number)
    }

    async fn transfer_logs(
        &self,
        address: Address,
        topic: B256,
        block: u64,
    ) -> Result<Vec<U256>, ProviderError> {
        let filter = Filter::new()
            .address(address)
            .event_signature(topic)
            .from_block(block)
            .to_block(block);

        let logs = self
            .provider()?
            .get_logs(&filter)
            .await
            .map_err(|e| self.unavailable("get_logs", e))?;

        debug!("Block {}: {} transfer logs", block, logs.len());

        logs.iter()
            .map(|log| decode_amount(&log.data().data, block))
            .collect()
    }

    async fn block(&self, number: u64) -> Result<RawBlock, ProviderError> {
        let block = self
            .provider()?
            .get_block_by_number(BlockNumberOrTag::Number(number), false.into())
            .await
            .map_err(|e| self.unavailable("get_block", e))?
            .ok_or_else(|| ProviderError::malformed("get_block", format!("block {number} not found")))?;

        let header = &block.header;
        let base_fee_per_gas = header.base_fee_per_gas.ok_or_else(|| {
            ProviderError::malformed("get_block", format!("block {number} has no base fee"))
        })?;

        Ok(RawBlock {
            number: header.number,
            base_fee_per_gas,
            gas_used: header.gas_used,
            gas_limit: header.gas_limit,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Decodes the `uint256` amount carried in a Transfer log's data field
pub fn decode_amount(data: &[u8], block: u64) -> Result<U256, ProviderError> {
    if data.len() != 32 {
        return Err(ProviderError::malformed(
            "get_logs",
            format!(
                "transfer log in block {} has {} data bytes, expected 32",
                block,
                data.len()
            ),
        ));
    }
    Ok(U256::from_be_slice(data))
}
