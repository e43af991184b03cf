//! Mock implementations for testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

use super::builders::generated_block;
use crate::network::{ChainDataSource, ProviderError};
use crate::series::RawBlock;

/// Configuration for controlling mock failures
#[derive(Debug, Clone, Default)]
pub struct FailureConfig {
    pub fail_latest: bool,
    pub fail_logs: bool,
    pub fail_blocks: bool,
    /// Fail `block` calls for this block number only
    pub fail_block_number: Option<u64>,
}

impl FailureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_all() -> Self {
        Self {
            fail_latest: true,
            fail_logs: true,
            fail_blocks: true,
            fail_block_number: None,
        }
    }

    pub fn fail_on_operation(operation: &str) -> Self {
        match operation {
            "latest" => Self {
                fail_latest: true,
                ..Default::default()
            },
            "logs" => Self {
                fail_logs: true,
                ..Default::default()
            },
            "blocks" => Self {
                fail_blocks: true,
                ..Default::default()
            },
            _ => Self::default(),
        }
    }
}

/// Number of calls received per operation
#[derive(Debug, Default)]
pub struct MockCallCounts {
    pub latest: AtomicUsize,
    pub logs: AtomicUsize,
    pub blocks: AtomicUsize,
}

/// Scriptable chain data source
///
/// Blocks not registered with [`MockChainSource::with_block`] are generated
/// deterministically for any number up to the current latest block.
#[derive(Debug)]
pub struct MockChainSource {
    latest: RwLock<u64>,
    blocks: RwLock<HashMap<u64, RawBlock>>,
    transfers: RwLock<HashMap<u64, Vec<U256>>>,
    failure_config: RwLock<FailureConfig>,
    delay: RwLock<Duration>,
    pub calls: MockCallCounts,
}

impl MockChainSource {
    pub fn new(latest: u64) -> Self {
        Self {
            latest: RwLock::new(latest),
            blocks: RwLock::new(HashMap::new()),
            transfers: RwLock::new(HashMap::new()),
            failure_config: RwLock::new(FailureConfig::default()),
            delay: RwLock::new(Duration::ZERO),
            calls: MockCallCounts::default(),
        }
    }

    pub fn with_failures(latest: u64, failure_config: FailureConfig) -> Self {
        let mock = Self::new(latest);
        mock.set_failures(failure_config);
        mock
    }

    pub fn with_block(self, block: RawBlock) -> Self {
        let number = block.number;
        self.with_block_at(number, block)
    }

    /// Serve `block` when `number` is requested, even if the numbers differ
    pub fn with_block_at(self, number: u64, block: RawBlock) -> Self {
        self.blocks.write().unwrap().insert(number, block);
        self
    }

    pub fn with_transfers(self, block: u64, amounts: Vec<U256>) -> Self {
        self.transfers.write().unwrap().insert(block, amounts);
        self
    }

    pub fn set_latest(&self, latest: u64) {
        *self.latest.write().unwrap() = latest;
    }

    pub fn set_failures(&self, failure_config: FailureConfig) {
        *self.failure_config.write().unwrap() = failure_config;
    }

    /// Latency applied to every call
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write().unwrap() = delay;
    }

    pub fn latest_calls(&self) -> usize {
        self.calls.latest.load(Ordering::SeqCst)
    }

    pub fn log_calls(&self) -> usize {
        self.calls.logs.load(Ordering::SeqCst)
    }

    pub fn block_calls(&self) -> usize {
        self.calls.blocks.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        let delay = *self.delay.read().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn failures(&self) -> FailureConfig {
        self.failure_config.read().unwrap().clone()
    }
}

#[async_trait]
impl ChainDataSource for MockChainSource {
    async fn latest_block_number(&self) -> Result<u64, ProviderError> {
        self.calls.latest.fetch_add(1, Ordering::SeqCst);
        // Answer as of the time of the request, delivered after the latency
        let latest = *self.latest.read().unwrap();
        let failed = self.failures().fail_latest;
        self.simulate_latency().await;

        if failed {
            return Err(ProviderError::unavailable("get_block_number", "mock failure"));
        }
        Ok(latest)
    }

    async fn transfer_logs(
        &self,
        _address: Address,
        _topic: B256,
        block: u64,
    ) -> Result<Vec<U256>, ProviderError> {
        self.calls.logs.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.failures().fail_logs {
            return Err(ProviderError::unavailable("get_logs", "mock failure"));
        }
        Ok(self
            .transfers
            .read()
            .unwrap()
            .get(&block)
            .cloned()
            .unwrap_or_default())
    }

    async fn block(&self, number: u64) -> Result<RawBlock, ProviderError> {
        self.calls.blocks.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let failures = self.failures();
        if failures.fail_blocks || failures.fail_block_number == Some(number) {
            return Err(ProviderError::unavailable("get_block", "mock failure"));
        }
        if number > *self.latest.read().unwrap() {
            return Err(ProviderError::malformed(
                "get_block",
                format!("block {number} not found"),
            ));
        }
        Ok(self
            .blocks
            .read()
            .unwrap()
            .get(&number)
            .copied()
            .unwrap_or_else(|| generated_block(number)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
