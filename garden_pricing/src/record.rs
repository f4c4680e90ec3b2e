//! Payment records handed to the booking store.
//!
//! A confirmed booking is persisted as discrete columns rather than as
//! the full pricing snapshot.  These records carry exactly those
//! columns.

use crate::credits::{CreditsSettlement, PaymentRoute};
use crate::extension::{ExtensionInput, ExtensionPricing};
use crate::models::{AppliedDiscount, PricingDetails, PricingInput};
use crate::weeks::selection_bounds;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Initial,
    Extension,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_type: PaymentType,
    /// Set for extensions; new bookings get their id from the store.
    pub booking_id: Option<String>,
    pub accommodation_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub accommodation_price: f64,
    pub food_contribution: f64,
    pub seasonal_discount_percent: f64,
    pub duration_discount_percent: f64,
    pub discount_code: Option<String>,
    pub discount_code_percent: Option<f64>,
    pub discount_amount: f64,
    /// Total after the discount code, before credits and VAT.
    pub total_price: f64,
    pub credits_used: f64,
    pub vat_amount: f64,
    /// What is charged through the gateway.
    pub amount_paid: f64,
    /// Gateway reference, or the credits-only placeholder.
    pub payment_reference: Option<String>,
}

impl PaymentRecord {
    fn from_parts(
        payment_type: PaymentType,
        details: &PricingDetails,
        discount: Option<&AppliedDiscount>,
        settlement: &CreditsSettlement,
    ) -> Self {
        let payment_reference = match &settlement.route {
            PaymentRoute::CreditsOnly { payment_reference } => Some(payment_reference.clone()),
            PaymentRoute::Gateway => None,
        };
        Self {
            payment_type,
            booking_id: None,
            accommodation_id: None,
            start_date: None,
            end_date: None,
            accommodation_price: details.total_accommodation_cost,
            food_contribution: details.total_food_and_facilities_cost,
            seasonal_discount_percent: details.seasonal_discount_percent,
            duration_discount_percent: details.duration_discount_percent,
            discount_code: discount.map(|d| d.code.clone()),
            discount_code_percent: discount.map(|d| d.percentage_discount),
            discount_amount: details.applied_code_discount_value,
            total_price: details.total_amount,
            credits_used: settlement.credits_used,
            vat_amount: details.vat_amount,
            amount_paid: settlement.amount_due,
            payment_reference,
        }
    }

    pub fn initial(input: &PricingInput, details: &PricingDetails, settlement: &CreditsSettlement) -> Self {
        let bounds = selection_bounds(&input.weeks);
        Self {
            accommodation_id: input.accommodation.as_ref().map(|a| a.id.clone()),
            start_date: bounds.map(|(start, _)| start),
            end_date: bounds.map(|(_, end)| end),
            ..Self::from_parts(PaymentType::Initial, details, input.discount.as_ref(), settlement)
        }
    }

    pub fn extension(
        input: &ExtensionInput,
        priced: &ExtensionPricing,
        settlement: &CreditsSettlement,
    ) -> Self {
        Self {
            booking_id: Some(input.booking.id.clone()),
            accommodation_id: input.booking.accommodation.as_ref().map(|a| a.id.clone()),
            start_date: selection_bounds(&input.extension_weeks).map(|(start, _)| start),
            end_date: priced.new_check_out,
            ..Self::from_parts(
                PaymentType::Extension,
                &priced.pricing,
                input.discount.as_ref(),
                settlement,
            )
        }
    }
}
