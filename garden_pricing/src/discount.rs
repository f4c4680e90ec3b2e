//! Discount code application.

use crate::models::{AppliedDiscount, DiscountTarget};
use crate::money::{cents, non_negative, to_decimal};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of applying a discount code to a stay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeDiscount {
    /// Accommodation plus food, before the code.
    pub subtotal: f64,
    /// Percentage of the targeted amount, rounded to cents.  May exceed
    /// the subtotal for codes above 100%.
    pub discount_amount: f64,
    /// Subtotal minus the discount, never below zero.
    pub final_total: f64,
}

/// Apply an optional discount code to a stay's accommodation and food
/// amounts.
pub fn apply_code(accommodation: f64, food: f64, discount: Option<&AppliedDiscount>) -> CodeDiscount {
    let subtotal = cents(to_decimal(accommodation) + to_decimal(food));
    let discount_amount = discount
        .map(|d| {
            let base = match d.applies_to {
                DiscountTarget::Accommodation => accommodation,
                DiscountTarget::FoodFacilities => food,
                DiscountTarget::Total => subtotal,
            };
            if base <= 0.0 {
                0.0
            } else {
                cents(to_decimal(base) * to_decimal(d.percentage_discount) / Decimal::ONE_HUNDRED)
            }
        })
        .unwrap_or(0.0);
    CodeDiscount {
        subtotal,
        discount_amount,
        final_total: non_negative(to_decimal(subtotal) - to_decimal(discount_amount)),
    }
}
