use crate::constants::derivation::{GAS_USAGE_THRESHOLD_PCT, WEI_PER_GWEI};

use super::models::{DerivationError, GasUsagePoint, Point, RawBlock};
use super::volume::round_to;

/// Builds the base fee series and the gas usage series from one block window
///
/// `blocks` must be ascending and contiguous. The first block is compared
/// against itself, so its `base_fee_increase` is always true.
pub fn derive_fee_and_usage_series(
    blocks: &[RawBlock],
) -> Result<(Vec<Point>, Vec<GasUsagePoint>), DerivationError> {
    check_contiguous(blocks)?;

    let mut fee_series = Vec::with_capacity(blocks.len());
    let mut usage_series = Vec::with_capacity(blocks.len());
    let mut previous_base_fee = None;

    for block in blocks {
        let base_fee_gwei = base_fee_gwei(block.base_fee_per_gas);
        let gas_usage_ratio = gas_usage_ratio(block)?;
        let previous = previous_base_fee.unwrap_or(base_fee_gwei);

        fee_series.push(Point::new(block.number, base_fee_gwei));
        usage_series.push(GasUsagePoint {
            x: block.number,
            y: gas_usage_ratio,
            base_fee_gwei,
            base_fee_increase: base_fee_gwei <= previous,
            gas_usage_increase: gas_usage_ratio <= GAS_USAGE_THRESHOLD_PCT,
        });

        previous_base_fee = Some(base_fee_gwei);
    }

    Ok((fee_series, usage_series))
}

/// Wei to Gwei, rounded to 3 decimal places
pub fn base_fee_gwei(base_fee_wei: u64) -> f64 {
    round_to(base_fee_wei as f64 / WEI_PER_GWEI, 3)
}

/// Percentage of the gas limit consumed, rounded to 2 decimal places
pub fn gas_usage_ratio(block: &RawBlock) -> Result<f64, DerivationError> {
    if block.gas_limit == 0 {
        return Err(DerivationError::ZeroGasLimit {
            block: block.number,
        });
    }
    let ratio = block.gas_used as f64 / block.gas_limit as f64;
    Ok((ratio * 100.0 * 100.0).round() / 100.0)
}

fn check_contiguous(blocks: &[RawBlock]) -> Result<(), DerivationError> {
    for pair in blocks.windows(2) {
        // No block can follow u64::MAX; report it as a gap instead of overflowing
        let Some(expected) = pair[0].number.checked_add(1) else {
            return Err(DerivationError::NonContiguous {
                expected: u64::MAX,
                found: pair[1].number,
            });
        };
        if pair[1].number != expected {
            return Err(DerivationError::NonContiguous {
                expected,
                found: pair[1].number,
            });
        }
    }
    Ok(())
}
