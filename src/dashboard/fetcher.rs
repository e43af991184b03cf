use std::collections::BTreeMap;
use std::sync::Arc;

use alloy::primitives::{Address, B256};
use futures::future::try_join_all;
use thiserror::Error;
use tracing::debug;

use crate::config::models::TokenConfig;
use crate::constants::token::TRANSFER_TOPIC;
use crate::network::{ChainDataSource, ProviderError};
use crate::series::{
    derive_fee_and_usage_series, derive_volume_series, BlockWindow, ChartPoint, DerivationError,
    GasUsagePoint, Point,
};

/// Errors that end one sub-pipeline of a refresh cycle
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(ProviderError),

    #[error("Malformed result: {0}")]
    MalformedResult(String),
}

impl From<ProviderError> for FetchError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Malformed { .. } => FetchError::MalformedResult(err.to_string()),
            other => FetchError::ProviderUnavailable(other),
        }
    }
}

impl From<DerivationError> for FetchError {
    fn from(err: DerivationError) -> Self {
        FetchError::MalformedResult(err.to_string())
    }
}

/// Token whose Transfer events make up the volume series
#[derive(Debug, Clone, Copy)]
pub struct TokenTarget {
    pub address: Address,
    pub topic: B256,
    pub decimals: u8,
}

impl TokenTarget {
    pub fn from_config(token: &TokenConfig) -> Result<Self, String> {
        Ok(Self {
            address: token.parsed_address()?,
            topic: *TRANSFER_TOPIC,
            decimals: token.decimals,
        })
    }
}

/// Runs the fetch-then-derive pipelines against a chain data source
pub struct SeriesFetcher {
    source: Arc<dyn ChainDataSource>,
    token: TokenTarget,
    block_count: u64,
}

impl SeriesFetcher {
    pub fn new(source: Arc<dyn ChainDataSource>, token: TokenTarget, block_count: u64) -> Self {
        Self {
            source,
            token,
            block_count,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Window of the most recent blocks as of now
    pub async fn current_window(&self) -> Result<BlockWindow, FetchError> {
        let latest = self.source.latest_block_number().await?;
        Ok(BlockWindow::ending_at(latest, self.block_count))
    }

    /// Transfer volume per block, one log query per window block
    pub async fn fetch_volume_series(&self) -> Result<Vec<Point>, FetchError> {
        let window = self.current_window().await?;
        debug!(
            "Fetching transfer logs for blocks {}..={}",
            window.first, window.last
        );

        let requests = window.numbers().map(|block| async move {
            let amounts = self
                .source
                .transfer_logs(self.token.address, self.token.topic, block)
                .await?;
            Ok::<_, ProviderError>((block, amounts))
        });
        let transfers: BTreeMap<_, _> = try_join_all(requests).await?.into_iter().collect();

        let series = derive_volume_series(&window, &transfers, self.token.decimals);
        validate_series(&window, &series)?;
        Ok(series)
    }

    /// Base fee and gas usage series, from one block query per window block
    pub async fn fetch_fee_and_usage_series(
        &self,
    ) -> Result<(Vec<Point>, Vec<GasUsagePoint>), FetchError> {
        let window = self.current_window().await?;
        debug!("Fetching blocks {}..={}", window.first, window.last);

        let blocks = try_join_all(window.numbers().map(|number| self.source.block(number))).await?;

        let (fees, usage) = derive_fee_and_usage_series(&blocks)?;
        validate_series(&window, &fees)?;
        validate_series(&window, &usage)?;
        Ok((fees, usage))
    }
}

/// Shape check applied before a series replaces the displayed one
pub fn validate_series<P: ChartPoint>(window: &BlockWindow, series: &[P]) -> Result<(), FetchError> {
    if window.matches(series) {
        Ok(())
    } else {
        Err(FetchError::MalformedResult(format!(
            "expected {} points for blocks {}..={}, got {}",
            window.len(),
            window.first,
            window.last,
            series.len()
        )))
    }
}
