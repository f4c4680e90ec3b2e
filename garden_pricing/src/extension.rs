//! Pricing for extending an existing booking.
//!
//! Only the added weeks are charged, and only their nights count
//! towards the seasonal discount.  The duration discount, however, is
//! looked up with the whole stay (original plus extension), so a guest
//! who stays on unlocks the longer-stay rate for the weeks they add.

use crate::engine::{ChargedStay, PricingEngine};
use crate::error::{PricingError, Result};
use crate::models::{Accommodation, AppliedDiscount, PricingDetails, Week};
use crate::seasons::selection_breakdown;
use crate::weeks::{selection_bounds, validate_selection, StayLength};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The stored booking being extended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginalBooking {
    pub id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub accommodation: Option<Accommodation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionInput {
    pub booking: OriginalBooking,
    pub extension_weeks: Vec<Week>,
    #[serde(default)]
    pub food_contribution: Option<f64>,
    #[serde(default)]
    pub discount: Option<AppliedDiscount>,
}

impl ExtensionInput {
    /// Extension weeks must be a valid selection that starts no earlier
    /// than the original check-out.
    pub fn validate(&self) -> Result<()> {
        validate_selection(&self.extension_weeks)?;
        if let Some(first) = self.extension_weeks.first() {
            if first.start_date < self.booking.check_out {
                return Err(PricingError::OverlappingWeeks {
                    id: first.id.clone(),
                    previous: self.booking.id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionPricing {
    pub booking_id: String,
    pub original_nights: u32,
    /// Original stay in weeks, one decimal, for display.
    pub original_weeks: f64,
    /// Original stay in weeks rounded up, as counted for the discount.
    pub original_discount_weeks: u32,
    pub extension_complete_weeks: u32,
    /// Weeks the duration discount was looked up with.
    pub combined_discount_weeks: u32,
    /// Check-out date once the extension is booked.
    pub new_check_out: Option<NaiveDate>,
    /// Charges for the extension weeks only.
    pub pricing: PricingDetails,
}

impl PricingEngine {
    pub fn price_extension(&self, input: &ExtensionInput) -> ExtensionPricing {
        let booking = &input.booking;
        let original = StayLength::from_dates(booking.check_in, booking.check_out);
        let extension = StayLength::from_weeks(&input.extension_weeks);
        let original_discount_weeks = original.rounded_up_weeks();
        let combined_discount_weeks = original_discount_weeks + extension.complete_weeks;

        let breakdown = selection_breakdown(self.calendar(), &input.extension_weeks);
        let pricing = self.price_stay(ChargedStay {
            stay: extension,
            breakdown: &breakdown,
            discount_weeks: combined_discount_weeks,
            food_rate_nights: original.total_nights + extension.total_nights,
            accommodation: booking.accommodation.as_ref(),
            food_contribution: input.food_contribution,
            discount: input.discount.as_ref(),
        });

        tracing::debug!(
            booking = %booking.id,
            original_nights = original.total_nights,
            extension_nights = extension.total_nights,
            combined_discount_weeks,
            total = pricing.total_amount,
            "priced extension"
        );

        ExtensionPricing {
            booking_id: booking.id.clone(),
            original_nights: original.total_nights,
            original_weeks: original.display_weeks,
            original_discount_weeks,
            extension_complete_weeks: extension.complete_weeks,
            combined_discount_weeks,
            new_check_out: selection_bounds(&input.extension_weeks).map(|(_, end)| end),
            pricing,
        }
    }
}
