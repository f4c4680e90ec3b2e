//! Duration discount table.
//!
//! Longer stays earn a bigger discount.  The table is a step function
//! from complete weeks to a discount fraction; its breakpoints are
//! configuration, the defaults below match the rates currently
//! published for guests.

use crate::error::{PricingError, Result};
use serde::{Deserialize, Serialize};

/// One step of the table: stays of at least `min_weeks` complete weeks
/// get `discount` (a fraction, `0..=1`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationTier {
    pub min_weeks: u32,
    pub discount: f64,
}

pub fn default_tiers() -> Vec<DurationTier> {
    vec![
        DurationTier {
            min_weeks: 2,
            discount: 0.08,
        },
        DurationTier {
            min_weeks: 4,
            discount: 0.18,
        },
        DurationTier {
            min_weeks: 8,
            discount: 0.25,
        },
    ]
}

/// Validated step table, sorted by `min_weeks`.  Discounts never
/// decrease as the stay gets longer.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationDiscountTable {
    tiers: Vec<DurationTier>,
}

impl DurationDiscountTable {
    /// Build a table from tiers in any order.  Discounts must lie in
    /// `0..=1` and must not shrink as the week threshold grows, so the
    /// lookup is monotonic.
    pub fn new(mut tiers: Vec<DurationTier>) -> Result<Self> {
        tiers.sort_by_key(|t| t.min_weeks);
        for pair in tiers.windows(2) {
            if pair[0].min_weeks == pair[1].min_weeks {
                return Err(PricingError::InvalidDurationTable(format!(
                    "duplicate threshold of {} weeks",
                    pair[0].min_weeks
                )));
            }
            if pair[1].discount < pair[0].discount {
                return Err(PricingError::InvalidDurationTable(format!(
                    "discount drops from {} to {} at {} weeks",
                    pair[0].discount, pair[1].discount, pair[1].min_weeks
                )));
            }
        }
        if let Some(tier) = tiers.iter().find(|t| !(0.0..=1.0).contains(&t.discount)) {
            return Err(PricingError::InvalidDurationTable(format!(
                "discount {} at {} weeks is outside 0..=1",
                tier.discount, tier.min_weeks
            )));
        }
        Ok(Self { tiers })
    }

    /// Discount fraction for a stay of `complete_weeks`.
    pub fn discount_for(&self, complete_weeks: u32) -> f64 {
        self.tiers
            .iter()
            .rev()
            .find(|t| complete_weeks >= t.min_weeks)
            .map(|t| t.discount)
            .unwrap_or(0.0)
    }

    pub fn tiers(&self) -> &[DurationTier] {
        &self.tiers
    }
}

impl Default for DurationDiscountTable {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
        }
    }
}
