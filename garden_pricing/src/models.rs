//! Data models for the Garden pricing engine.
//!
//! The `models` module defines the serialisable inputs and outputs of
//! the engine: selected weeks, accommodations, season breakdowns,
//! applied discount codes and the derived [`PricingDetails`] snapshot.
//! They derive `Serialize` and `Deserialize` so that they can be
//! received from and returned to the booking UI as JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A calendar span selected by the guest.  Usually seven nights; the
/// first and last segments of a stay may be shorter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    /// Identifier of the span in the availability calendar.
    pub id: String,
    /// First night of the span.
    pub start_date: NaiveDate,
    /// Check-out day of the span.  Nights are `end_date - start_date`.
    pub end_date: NaiveDate,
}

impl Week {
    pub fn new(id: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            start_date,
            end_date,
        }
    }

    /// Number of nights covered by this span.  Inverted spans count
    /// as zero.
    pub fn nights(&self) -> u32 {
        (self.end_date - self.start_date).num_days().max(0) as u32
    }
}

/// A bookable accommodation as fetched from the accommodation store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accommodation {
    /// Store identifier, copied onto the payment record.
    pub id: String,
    /// Display name.  Dorm beds are recognised by their title.
    pub title: String,
    /// Weekly base price in currency units.
    pub base_price: f64,
    /// Accommodation type from the store; `"test"` marks payment test
    /// listings.
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Accommodation {
    /// Dorm beds never receive a seasonal discount.
    pub fn is_dorm(&self) -> bool {
        self.title.to_lowercase().contains("dorm")
    }

    /// Test accommodations are used to exercise the payment flow and
    /// carry no food and facilities cost.
    pub fn is_test(&self) -> bool {
        self.kind == "test"
    }
}

/// Nights spent in one named season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonNights {
    pub name: String,
    /// Discount fraction, `0..=1`.
    pub discount: f64,
    pub nights: u32,
}

/// How a date range decomposes across named seasons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonBreakdown {
    pub seasons: Vec<SeasonNights>,
}

impl SeasonBreakdown {
    pub fn total_nights(&self) -> u32 {
        self.seasons.iter().map(|s| s.nights).sum()
    }

    /// Add `nights` to the season called `name` with `discount`,
    /// appending it if this breakdown has not seen that pair yet.
    /// Seasons sharing a name but not a discount stay separate entries
    /// so the weighted average keeps both rates.
    pub fn add_nights(&mut self, name: &str, discount: f64, nights: u32) {
        if nights == 0 {
            return;
        }
        match self
            .seasons
            .iter_mut()
            .find(|s| s.name == name && s.discount == discount)
        {
            Some(season) => season.nights += nights,
            None => self.seasons.push(SeasonNights {
                name: name.to_string(),
                discount,
                nights,
            }),
        }
    }

    /// Fold another breakdown into this one, season by season.
    pub fn merge(&mut self, other: SeasonBreakdown) {
        for season in other.seasons {
            self.add_nights(&season.name, season.discount, season.nights);
        }
    }
}

/// Which part of the bill a discount code reduces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum DiscountTarget {
    Accommodation,
    FoodFacilities,
    /// The whole subtotal.  Also the fallback for unknown or null
    /// targets.
    #[default]
    Total,
}

impl From<Option<String>> for DiscountTarget {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("accommodation") => DiscountTarget::Accommodation,
            Some("food_facilities") => DiscountTarget::FoodFacilities,
            _ => DiscountTarget::Total,
        }
    }
}

/// A discount code that the validation service has already accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub code: String,
    /// Percentage, nominally `0..=100`.  Not clamped: values above 100
    /// are honoured and the total is floored at zero instead.
    pub percentage_discount: f64,
    #[serde(default)]
    pub applies_to: DiscountTarget,
}

/// Everything the engine needs to price a new booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingInput {
    #[serde(default)]
    pub weeks: Vec<Week>,
    #[serde(default)]
    pub accommodation: Option<Accommodation>,
    /// Weekly food and facilities contribution chosen on the slider,
    /// before any duration discount.  Unset means the default rate.
    #[serde(default)]
    pub food_contribution: Option<f64>,
    #[serde(default)]
    pub discount: Option<AppliedDiscount>,
}

/// Bounds for the weekly food contribution slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodContributionRange {
    pub min: f64,
    pub max: f64,
    #[serde(rename = "default")]
    pub default_value: f64,
}

impl FoodContributionRange {
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// A derived, ephemeral price snapshot.  Recomputed from scratch
/// whenever any input changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingDetails {
    /// Nights across all selected weeks.
    pub total_nights: u32,
    /// Week count rounded to one decimal.  This is the multiplier for
    /// every charged amount.
    pub weeks_staying: f64,
    /// Weekly accommodation rate times `weeks_staying`.
    pub total_accommodation_cost: f64,
    /// Rounded weekly food rate times `weeks_staying`.  Zero for test
    /// accommodations.
    pub total_food_and_facilities_cost: f64,
    /// Accommodation plus food, before the discount code.
    pub subtotal: f64,
    /// Subtotal after the discount code, floored at zero.  VAT is
    /// computed on this amount; credits are deducted from it later.
    pub total_amount: f64,
    /// Whole percent, e.g. `25.0`.
    pub duration_discount_percent: f64,
    /// What the duration discount saved on accommodation and food
    /// together.
    pub duration_discount_amount: f64,
    /// Whole percent after the dorm override.
    pub seasonal_discount_percent: f64,
    /// Amount taken off by the discount code.
    pub applied_code_discount_value: f64,
    /// VAT on `total_amount`.
    pub vat_amount: f64,
    /// `total_amount` plus `vat_amount`.
    pub total_with_vat: f64,
    /// Discounted weekly rate divided by seven, for display.
    pub nightly_accommodation_rate: f64,
    /// Weekly list price of the accommodation.
    pub base_accommodation_rate: f64,
    /// Weekly price after the seasonal discount only.
    pub effective_base_rate: f64,
    /// Weekly price after seasonal and duration discounts.
    pub weekly_accommodation_rate: f64,
    /// Slider value, or the default rate when the guest left it alone.
    pub base_weekly_food_rate: f64,
    /// Weekly food rate after the duration discount, in whole units.
    pub displayed_weekly_food_rate: f64,
    /// Food cost had no duration discount applied.
    pub total_base_food_cost: f64,
    /// `total_base_food_cost` minus the charged food cost.
    pub food_discount_amount: f64,
}
