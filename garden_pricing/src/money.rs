//! Rounding checkpoints for money and week counts.
//!
//! Every amount the engine finalizes goes through one of these
//! helpers.  Amounts travel between modules as `f64`, but the
//! arithmetic feeding a checkpoint is done in [`Decimal`] so that a
//! product such as `0.35 * 10%` is exactly `0.035` and rounds to
//! `0.04`.  All checkpoints round half away from zero, so `0.125`
//! becomes `0.13` and `2.5` becomes `3`.  Rounding happens at each
//! checkpoint rather than once at the end so that the per-week figures
//! a guest sees multiply out to exactly the total they are charged.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Convert an amount to `Decimal` through its shortest decimal form,
/// so `0.29` becomes exactly `0.29` rather than the nearest binary
/// fraction.  Non-finite or out of range values become zero.
pub fn to_decimal(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
        .unwrap_or_default()
}

/// Convert back to the nearest `f64`.
pub fn to_f64(value: Decimal) -> f64 {
    let value: f64 = value.to_string().parse().unwrap_or_default();
    // normalise -0.0
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

fn round_dp(value: Decimal, dp: u32) -> f64 {
    to_f64(value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
}

/// Round to currency precision (two decimals).
pub fn cents(value: Decimal) -> f64 {
    round_dp(value, 2)
}

/// Round to one decimal.  Used for the displayed week count.
pub fn tenths(value: Decimal) -> f64 {
    round_dp(value, 1)
}

/// Round to the nearest whole currency unit.
pub fn whole(value: Decimal) -> f64 {
    round_dp(value, 0)
}

/// Round an amount that needs no further arithmetic to cents.
pub fn round2(value: f64) -> f64 {
    cents(to_decimal(value))
}

/// Clamp a money amount at zero, rounding it to cents on the way.
pub fn non_negative(value: Decimal) -> f64 {
    cents(value.max(Decimal::ZERO))
}

/// True when `value` carries no residue beyond two decimals.
pub fn is_cent_exact(value: f64) -> bool {
    round2(value) == value
}
