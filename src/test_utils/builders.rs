//! Test data builders for creating common test objects

use crate::config::models::BlockPulseConfig;
use crate::series::RawBlock;

/// Builder for creating test RawBlock values
#[derive(Debug, Clone)]
pub struct RawBlockBuilder {
    number: u64,
    base_fee_per_gas: u64,
    gas_used: u64,
    gas_limit: u64,
}

impl RawBlockBuilder {
    /// Create a new RawBlockBuilder with default test values (20 gwei, half full)
    pub fn new(number: u64) -> Self {
        Self {
            number,
            base_fee_per_gas: 20_000_000_000,
            gas_used: 15_000_000,
            gas_limit: 30_000_000,
        }
    }

    /// Set the base fee in wei
    pub fn with_base_fee_wei(mut self, base_fee_per_gas: u64) -> Self {
        self.base_fee_per_gas = base_fee_per_gas;
        self
    }

    /// Set gas used and gas limit
    pub fn with_gas(mut self, gas_used: u64, gas_limit: u64) -> Self {
        self.gas_used = gas_used;
        self.gas_limit = gas_limit;
        self
    }

    /// Build the RawBlock
    pub fn build(self) -> RawBlock {
        RawBlock {
            number: self.number,
            base_fee_per_gas: self.base_fee_per_gas,
            gas_used: self.gas_used,
            gas_limit: self.gas_limit,
        }
    }
}

/// Deterministic block whose fee and usage vary with its number
pub fn generated_block(number: u64) -> RawBlock {
    RawBlockBuilder::new(number)
        .with_base_fee_wei(10_000_000_000 + (number % 7) * 250_000_000)
        .with_gas(9_000_000 + (number % 5) * 3_000_000, 30_000_000)
        .build()
}

/// `count` ascending blocks starting at `first`
pub fn contiguous_blocks(first: u64, count: u64) -> Vec<RawBlock> {
    (first..first + count).map(generated_block).collect()
}

/// Builder for creating test configurations
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: BlockPulseConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block_count(mut self, block_count: u64) -> Self {
        self.config.window.block_count = block_count;
        self
    }

    pub fn with_refresh_interval(mut self, interval_secs: u64) -> Self {
        self.config.refresh.interval_secs = interval_secs;
        self
    }

    pub fn with_token_decimals(mut self, decimals: u8) -> Self {
        self.config.token.decimals = decimals;
        self
    }

    pub fn build(self) -> BlockPulseConfig {
        self.config
    }
}
