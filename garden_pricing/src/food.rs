//! Food and facilities contribution.
//!
//! Guests choose a weekly contribution on a slider.  The slider value
//! is the rate before any duration discount; what is charged is that
//! rate with the duration discount applied, rounded to a whole unit
//! per week, times the displayed week count.  Rounding the weekly
//! figure before multiplying keeps the per-week number shown on screen
//! consistent with the total.

use crate::error::{PricingError, Result};
use crate::models::FoodContributionRange;
use crate::money::{cents, to_decimal, whole};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of pricing the food contribution for one stay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodCost {
    pub base_weekly_rate: f64,
    /// `base_weekly_rate * display_weeks`, before the duration discount.
    pub total_base_cost: f64,
    /// Discounted weekly rate, rounded to a whole unit.
    pub displayed_weekly_rate: f64,
    pub final_cost: f64,
    pub discount_amount: f64,
}

impl FoodCost {
    /// Food cost forced to zero, for test accommodations.
    pub fn waived(base_weekly_rate: f64) -> Self {
        Self {
            base_weekly_rate,
            ..Self::default()
        }
    }
}

/// Price the contribution.  `duration_discount` is a fraction.
pub fn food_cost(base_weekly_rate: f64, display_weeks: f64, duration_discount: f64) -> FoodCost {
    let base = to_decimal(base_weekly_rate);
    let weeks = to_decimal(display_weeks);
    let total_base_cost = base * weeks;
    let displayed_weekly_rate = whole(base * (Decimal::ONE - to_decimal(duration_discount)));
    let final_cost = cents(to_decimal(displayed_weekly_rate) * weeks);
    FoodCost {
        base_weekly_rate,
        total_base_cost: cents(total_base_cost),
        displayed_weekly_rate,
        final_cost,
        discount_amount: cents(total_base_cost - to_decimal(final_cost)),
    }
}

/// Bounds of one night-count tier of the slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeTier {
    pub min: f64,
    pub max: f64,
    #[serde(rename = "default")]
    pub default_value: f64,
}

/// How the slider range is derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContributionRangePolicy {
    /// Range keyed on the stay length.  The minimum is lifted when
    /// needed so that the discounted weekly charge never falls below
    /// `min_charged_weekly`.
    Tiered {
        short_stay: RangeTier,
        long_stay: RangeTier,
        #[serde(default)]
        min_charged_weekly: f64,
    },
    /// Promotional contexts pin the range regardless of the stay.
    Fixed {
        min: f64,
        max: f64,
        #[serde(rename = "default")]
        default_value: f64,
    },
}

impl Default for ContributionRangePolicy {
    fn default() -> Self {
        ContributionRangePolicy::Tiered {
            short_stay: RangeTier {
                min: 345.0,
                max: 3600.0,
                default_value: 345.0,
            },
            long_stay: RangeTier {
                min: 240.0,
                max: 3600.0,
                default_value: 240.0,
            },
            min_charged_weekly: 180.0,
        }
    }
}

/// Food settings of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodPolicy {
    /// Stays of at most this many nights are short stays.
    pub short_stay_max_nights: u32,
    pub short_stay_rate: f64,
    pub long_stay_rate: f64,
    pub range: ContributionRangePolicy,
}

impl Default for FoodPolicy {
    fn default() -> Self {
        Self {
            short_stay_max_nights: 6,
            short_stay_rate: 345.0,
            long_stay_rate: 240.0,
            range: ContributionRangePolicy::default(),
        }
    }
}

impl FoodPolicy {
    pub fn validate(&self) -> Result<()> {
        let bounds = match &self.range {
            ContributionRangePolicy::Tiered {
                short_stay,
                long_stay,
                ..
            } => vec![(short_stay.min, short_stay.max), (long_stay.min, long_stay.max)],
            ContributionRangePolicy::Fixed { min, max, .. } => vec![(*min, *max)],
        };
        for (min, max) in bounds {
            if min > max {
                return Err(PricingError::InvalidContributionRange { min, max });
            }
        }
        Ok(())
    }

    fn is_short_stay(&self, total_nights: u32) -> bool {
        total_nights <= self.short_stay_max_nights
    }

    /// Weekly rate used when the guest has not touched the slider.
    pub fn default_rate(&self, total_nights: u32) -> f64 {
        if self.is_short_stay(total_nights) {
            self.short_stay_rate
        } else {
            self.long_stay_rate
        }
    }

    /// Slider bounds for a stay.  `duration_discount` is a fraction.
    pub fn contribution_range(&self, total_nights: u32, duration_discount: f64) -> FoodContributionRange {
        match &self.range {
            ContributionRangePolicy::Fixed {
                min,
                max,
                default_value,
            } => FoodContributionRange {
                min: *min,
                max: *max,
                default_value: *default_value,
            },
            ContributionRangePolicy::Tiered {
                short_stay,
                long_stay,
                min_charged_weekly,
            } => {
                let tier = if self.is_short_stay(total_nights) {
                    short_stay
                } else {
                    long_stay
                };
                let mut min = tier.min;
                let keep = Decimal::ONE - to_decimal(duration_discount);
                if *min_charged_weekly > 0.0 && keep > Decimal::ZERO {
                    let lifted = (to_decimal(*min_charged_weekly) / keep).ceil();
                    min = min.max(whole(lifted));
                }
                let min = min.min(tier.max);
                let range = FoodContributionRange {
                    min,
                    max: tier.max,
                    default_value: tier.default_value,
                };
                FoodContributionRange {
                    default_value: range.clamp(tier.default_value),
                    ..range
                }
            }
        }
    }
}
