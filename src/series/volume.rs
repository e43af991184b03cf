use std::collections::BTreeMap;

use alloy::primitives::{U256, U512};

use super::models::Point;
use super::window::BlockWindow;

/// Builds the per-block transfer volume series
///
/// Amounts are summed in 512-bit precision, scaled by `10^decimals` and rounded
/// to two decimal places. Blocks with no entry in `transfers_per_block` get a
/// volume of zero, so the output always has one point per window block.
pub fn derive_volume_series(
    window: &BlockWindow,
    transfers_per_block: &BTreeMap<u64, Vec<U256>>,
    decimals: u8,
) -> Vec<Point> {
    window
        .numbers()
        .map(|block| {
            let total = transfers_per_block
                .get(&block)
                .map(|amounts| sum_amounts(amounts))
                .unwrap_or(U512::ZERO);
            Point::new(block, round_to(scale_units(total, decimals), 2))
        })
        .collect()
}

pub(crate) fn sum_amounts(amounts: &[U256]) -> U512 {
    amounts.iter().fold(U512::ZERO, |sum, amount| {
        sum + U512::from_be_slice(&amount.to_be_bytes::<32>())
    })
}

/// Converts a raw fixed-point integer into its decimal value
///
/// The exact decimal string is built first and parsed once, so the only loss
/// of precision is the final f64 conversion.
pub(crate) fn scale_units(raw: U512, decimals: u8) -> f64 {
    if decimals == 0 {
        return raw.to_string().parse().unwrap_or(f64::INFINITY);
    }

    let divisor = U512::from(10u64).pow(U512::from(decimals));
    let integer = raw / divisor;
    let fraction = raw % divisor;
    let text = format!(
        "{}.{:0>width$}",
        integer,
        fraction.to_string(),
        width = decimals as usize
    );
    text.parse().unwrap_or(f64::INFINITY)
}

/// `round(value * 10^places) / 10^places`
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
