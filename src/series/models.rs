use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when the raw input violates the window's shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error("Blocks are not contiguous: expected block {expected}, found {found}")]
    NonContiguous { expected: u64, found: u64 },

    #[error("Block {block} reports a zero gas limit")]
    ZeroGasLimit { block: u64 },
}

/// Anything that can be plotted on a block-number x axis
pub trait ChartPoint {
    fn x(&self) -> u64;
    fn y(&self) -> f64;
}

/// A single plotted sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Block number
    pub x: u64,
    pub y: f64,
}

impl Point {
    pub fn new(x: u64, y: f64) -> Self {
        Self { x, y }
    }
}

impl ChartPoint for Point {
    fn x(&self) -> u64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

/// Gas usage sample of one block, with comparison flags
///
/// `y` is the gas usage ratio in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasUsagePoint {
    pub x: u64,
    pub y: f64,
    pub base_fee_gwei: f64,
    /// True when this block's base fee is less than or equal to the previous
    /// block's. The name does not match the comparator; consumers rely on the
    /// comparator as is.
    pub base_fee_increase: bool,
    /// True when the gas usage ratio is at or below 50%. Not a comparison
    /// against the previous block.
    pub gas_usage_increase: bool,
}

impl ChartPoint for GasUsagePoint {
    fn x(&self) -> u64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

/// The subset of a block header the fee and usage series are derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlock {
    pub number: u64,
    /// Base fee in wei
    pub base_fee_per_gas: u64,
    pub gas_used: u64,
    pub gas_limit: u64,
}
