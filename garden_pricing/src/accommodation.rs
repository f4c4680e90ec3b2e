//! Accommodation pricing.
//!
//! The weekly rate applies the seasonal and duration discounts one
//! after the other against the base price, never added together.

use crate::money::{cents, non_negative, to_decimal, to_f64};
use rust_decimal::Decimal;

/// Weekly rate after both discounts.  Both discounts are fractions.
pub fn weekly_rate(base_price: f64, seasonal_discount: f64, duration_discount: f64) -> f64 {
    to_f64(
        to_decimal(base_price)
            * (Decimal::ONE - to_decimal(seasonal_discount))
            * (Decimal::ONE - to_decimal(duration_discount)),
    )
}

/// Total accommodation cost, multiplied by the displayed week count.
pub fn total_cost(weekly_rate: f64, display_weeks: f64) -> f64 {
    cents(to_decimal(weekly_rate) * to_decimal(display_weeks))
}

pub fn nightly_rate(weekly_rate: f64) -> f64 {
    cents(to_decimal(weekly_rate) / Decimal::from(7))
}

/// Accommodation part of the duration discount: what the stay would
/// have cost with the seasonal discount alone, minus what it costs.
pub fn duration_saving(effective_base_rate: f64, display_weeks: f64, total_cost: f64) -> f64 {
    let undiscounted = cents(to_decimal(effective_base_rate) * to_decimal(display_weeks));
    non_negative(to_decimal(undiscounted) - to_decimal(total_cost))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discounts_compound() {
        // 400 * 0.5 * 0.75, not 400 * (1 - 0.5 - 0.25)
        assert_eq!(weekly_rate(400.0, 0.5, 0.25), 150.0);
    }

    #[test]
    fn eight_weeks_at_two_hundred() {
        assert_eq!(total_cost(200.0, 8.0), 1600.0);
    }

    #[test]
    fn partial_weeks_use_the_displayed_count() {
        // 10 nights display as 1.4 weeks
        assert_eq!(total_cost(200.0, 1.4), 280.0);
        assert_eq!(nightly_rate(200.0), 28.57);
    }

    #[test]
    fn saving_from_duration_discount() {
        let rate = weekly_rate(200.0, 0.0, 0.25);
        let cost = total_cost(rate, 8.0);
        assert_eq!(cost, 1200.0);
        assert_eq!(duration_saving(200.0, 8.0, cost), 400.0);
    }
}
