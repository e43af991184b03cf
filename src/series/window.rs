use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::models::ChartPoint;

/// Contiguous ascending range of block numbers examined in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockWindow {
    pub first: u64,
    pub last: u64,
}

impl BlockWindow {
    /// The `size` most recent blocks ending at `latest`
    ///
    /// A chain shorter than `size` blocks yields a window starting at genesis.
    pub fn ending_at(latest: u64, size: u64) -> Self {
        let size = size.max(1);
        Self {
            first: latest.saturating_sub(size - 1),
            last: latest,
        }
    }

    pub fn len(&self) -> usize {
        (self.last - self.first + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Block numbers in ascending order
    pub fn numbers(&self) -> RangeInclusive<u64> {
        self.first..=self.last
    }

    pub fn contains(&self, block: u64) -> bool {
        self.numbers().contains(&block)
    }

    /// True when `series` has exactly one point per block of this window, in order
    pub fn matches<P: ChartPoint>(&self, series: &[P]) -> bool {
        series.len() == self.len()
            && series
                .iter()
                .zip(self.numbers())
                .all(|(point, expected)| point.x() == expected)
    }
}
