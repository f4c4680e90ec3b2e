//! Booking pricing engine.
//!
//! The `engine` module turns a [`PricingInput`] into a
//! [`PricingDetails`] snapshot.  Each quote is a pure function of its
//! input and the engine's configuration, so quotes are recomputed from
//! scratch whenever the guest changes anything, and batches can be
//! priced in parallel with [`rayon`].

use crate::accommodation::{duration_saving, nightly_rate, total_cost, weekly_rate};
use crate::config::PricingConfig;
use crate::credits::CreditsPolicy;
use crate::discount::{apply_code, CodeDiscount};
use crate::duration::DurationDiscountTable;
use crate::error::Result;
use crate::food::{food_cost, FoodCost, FoodPolicy};
use crate::models::{
    Accommodation, AppliedDiscount, FoodContributionRange, PricingDetails, PricingInput,
    SeasonBreakdown,
};
use crate::money::{cents, round2, to_decimal};
use rust_decimal::Decimal;
use crate::seasons::{effective_discount, selection_breakdown, SeasonCalendar, SeasonTable};
use crate::vat::VatPolicy;
use crate::weeks::StayLength;
use rayon::prelude::*;
use std::sync::Arc;

/// The stay being charged and the context its discounts come from.
pub(crate) struct ChargedStay<'a> {
    /// Nights actually being charged.
    pub stay: StayLength,
    /// Seasons of the charged nights.
    pub breakdown: &'a SeasonBreakdown,
    /// Week count the duration discount is looked up with.
    pub discount_weeks: u32,
    /// Night count the default food rate is keyed on.
    pub food_rate_nights: u32,
    pub accommodation: Option<&'a Accommodation>,
    pub food_contribution: Option<f64>,
    pub discount: Option<&'a AppliedDiscount>,
}

/// Prices new bookings and extensions.
///
/// The engine owns the validated discount tables and a shared season
/// calendar.  It holds no per-quote state, so one engine can price any
/// number of quotes concurrently; [`PricingEngine::price_batch`] does
/// exactly that with rayon.
pub struct PricingEngine {
    calendar: Arc<dyn SeasonCalendar>,
    durations: DurationDiscountTable,
    food: FoodPolicy,
    vat: VatPolicy,
    credits: CreditsPolicy,
}

impl PricingEngine {
    /// Build an engine from configuration, validating every table.
    pub fn new(config: PricingConfig) -> Result<Self> {
        let calendar = SeasonTable::new(config.seasons)?;
        let durations = DurationDiscountTable::new(config.duration_discounts)?;
        config.food.validate()?;
        Ok(Self {
            calendar: Arc::new(calendar),
            durations,
            food: config.food,
            vat: VatPolicy::new(config.vat_rate)?,
            credits: config.credits,
        })
    }

    /// Replace the season calendar, e.g. with one backed by the
    /// season store.
    pub fn with_calendar(mut self, calendar: Arc<dyn SeasonCalendar>) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_duration_table(mut self, durations: DurationDiscountTable) -> Self {
        self.durations = durations;
        self
    }

    pub fn with_food_policy(mut self, food: FoodPolicy) -> Self {
        self.food = food;
        self
    }

    pub fn calendar(&self) -> &dyn SeasonCalendar {
        self.calendar.as_ref()
    }

    pub fn durations(&self) -> &DurationDiscountTable {
        &self.durations
    }

    pub fn credits(&self) -> &CreditsPolicy {
        &self.credits
    }

    /// Price a new booking.
    pub fn price_booking(&self, input: &PricingInput) -> PricingDetails {
        let stay = StayLength::from_weeks(&input.weeks);
        let breakdown = selection_breakdown(self.calendar(), &input.weeks);
        self.price_stay(ChargedStay {
            stay,
            breakdown: &breakdown,
            discount_weeks: stay.complete_weeks,
            food_rate_nights: stay.total_nights,
            accommodation: input.accommodation.as_ref(),
            food_contribution: input.food_contribution,
            discount: input.discount.as_ref(),
        })
    }

    /// Price many bookings in parallel.  Results keep the input order.
    pub fn price_batch(&self, inputs: &[PricingInput]) -> Vec<PricingDetails> {
        inputs
            .par_iter()
            .map(|input| self.price_booking(input))
            .collect()
    }

    /// Slider bounds for a stay of `total_nights`.
    pub fn food_contribution_range(&self, total_nights: u32) -> FoodContributionRange {
        let stay = StayLength::from_nights(total_nights);
        let duration = self.durations.discount_for(stay.complete_weeks);
        self.food.contribution_range(total_nights, duration)
    }

    pub(crate) fn price_stay(&self, charged: ChargedStay<'_>) -> PricingDetails {
        let ChargedStay {
            stay,
            breakdown,
            discount_weeks,
            food_rate_nights,
            accommodation,
            food_contribution,
            discount,
        } = charged;
        let weeks = stay.display_weeks;

        let seasonal = effective_discount(accommodation, breakdown);
        let duration = self.durations.discount_for(discount_weeks);
        let base_rate = accommodation.map(|a| a.base_price).unwrap_or(0.0);
        let effective_base_rate = weekly_rate(base_rate, seasonal, 0.0);
        let weekly = weekly_rate(base_rate, seasonal, duration);
        let accommodation_cost = total_cost(weekly, weeks);
        let accommodation_saving = duration_saving(effective_base_rate, weeks, accommodation_cost);

        let base_food_rate = food_contribution.unwrap_or_else(|| self.food.default_rate(food_rate_nights));
        let is_test = accommodation.map(Accommodation::is_test).unwrap_or(false);
        let (food, code) = if is_test {
            let waived = CodeDiscount {
                subtotal: accommodation_cost,
                discount_amount: 0.0,
                final_total: accommodation_cost,
            };
            (FoodCost::waived(base_food_rate), waived)
        } else {
            let food = food_cost(base_food_rate, weeks, duration);
            let code = apply_code(accommodation_cost, food.final_cost, discount);
            (food, code)
        };
        let vat = self.vat.apply(code.final_total);

        tracing::debug!(
            nights = stay.total_nights,
            weeks,
            seasonal,
            duration,
            accommodation_cost,
            food_cost = food.final_cost,
            total = code.final_total,
            "priced stay"
        );

        PricingDetails {
            total_nights: stay.total_nights,
            weeks_staying: weeks,
            total_accommodation_cost: accommodation_cost,
            total_food_and_facilities_cost: food.final_cost,
            subtotal: code.subtotal,
            total_amount: code.final_total,
            duration_discount_percent: cents(to_decimal(duration) * Decimal::ONE_HUNDRED),
            duration_discount_amount: cents(to_decimal(accommodation_saving) + to_decimal(food.discount_amount)),
            seasonal_discount_percent: cents(to_decimal(seasonal) * Decimal::ONE_HUNDRED),
            applied_code_discount_value: code.discount_amount,
            vat_amount: vat.vat_amount,
            total_with_vat: vat.total_with_vat,
            nightly_accommodation_rate: nightly_rate(weekly),
            base_accommodation_rate: base_rate,
            effective_base_rate: round2(effective_base_rate),
            weekly_accommodation_rate: round2(weekly),
            base_weekly_food_rate: food.base_weekly_rate,
            displayed_weekly_food_rate: food.displayed_weekly_rate,
            total_base_food_cost: food.total_base_cost,
            food_discount_amount: food.discount_amount,
        }
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self {
            calendar: Arc::new(SeasonTable::default()),
            durations: DurationDiscountTable::default(),
            food: FoodPolicy::default(),
            vat: VatPolicy::default(),
            credits: CreditsPolicy::default(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::duration::DurationTier;
    use crate::models::{DiscountTarget, SeasonNights, Week};
    use crate::money::is_cent_exact;
    use crate::weeks::consecutive_weeks;
    use chrono::NaiveDate;

    /// Calendar with a single season everywhere.
    pub(crate) struct FlatCalendar(pub f64);

    impl SeasonCalendar for FlatCalendar {
        fn season_breakdown(&self, start: NaiveDate, end: NaiveDate) -> SeasonBreakdown {
            let nights = (end - start).num_days().max(0) as u32;
            let mut breakdown = SeasonBreakdown::default();
            breakdown.add_nights("Flat", self.0, nights);
            breakdown
        }
    }

    pub(crate) fn engine(seasonal: f64) -> PricingEngine {
        PricingEngine::default().with_calendar(Arc::new(FlatCalendar(seasonal)))
    }

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn accommodation(title: &str, base_price: f64) -> Accommodation {
        Accommodation {
            id: title.to_lowercase().replace(' ', "-"),
            title: title.into(),
            base_price,
            kind: "room".into(),
        }
    }

    fn input(weeks: u32, base_price: f64, food: Option<f64>) -> PricingInput {
        PricingInput {
            weeks: consecutive_weeks(date(2025, 7, 7), weeks),
            accommodation: Some(accommodation("Bell Tent", base_price)),
            food_contribution: food,
            discount: None,
        }
    }

    fn code(percentage_discount: f64, applies_to: DiscountTarget) -> Option<AppliedDiscount> {
        Some(AppliedDiscount {
            code: "GARDEN".into(),
            percentage_discount,
            applies_to,
        })
    }

    #[test]
    fn one_week_without_discounts() {
        let details = engine(0.0).price_booking(&input(1, 200.0, Some(345.0)));
        assert_eq!(details.total_nights, 7);
        assert_eq!(details.weeks_staying, 1.0);
        assert_eq!(details.total_accommodation_cost, 200.0);
        assert_eq!(details.total_food_and_facilities_cost, 345.0);
        assert_eq!(details.subtotal, 545.0);
        assert_eq!(details.total_amount, 545.0);
        assert_eq!(details.duration_discount_percent, 0.0);
        assert_eq!(details.duration_discount_amount, 0.0);
        assert_eq!(details.vat_amount, 130.8);
        assert_eq!(details.total_with_vat, 675.8);
    }

    #[test]
    fn discount_code_on_accommodation_only() {
        let mut quote = input(1, 200.0, Some(345.0));
        quote.discount = code(10.0, DiscountTarget::Accommodation);
        let details = engine(0.0).price_booking(&quote);
        assert_eq!(details.subtotal, 545.0);
        assert_eq!(details.applied_code_discount_value, 20.0);
        assert_eq!(details.total_amount, 525.0);
        assert_eq!(details.vat_amount, 126.0);
    }

    #[test]
    fn eight_week_stay_gets_the_top_duration_tier() {
        let details = engine(0.0).price_booking(&input(8, 200.0, Some(240.0)));
        assert_eq!(details.duration_discount_percent, 25.0);
        assert_eq!(details.weekly_accommodation_rate, 150.0);
        assert_eq!(details.total_accommodation_cost, 1200.0);
        // 240 * 0.75 = 180 per week
        assert_eq!(details.displayed_weekly_food_rate, 180.0);
        assert_eq!(details.total_food_and_facilities_cost, 1440.0);
        // 400 off accommodation, 480 off food
        assert_eq!(details.duration_discount_amount, 880.0);
    }

    #[test]
    fn eight_weeks_at_a_discounted_weekly_rate_of_two_hundred() {
        // a tier and base price whose reduced weekly rate is exactly 200
        let table = DurationDiscountTable::new(vec![DurationTier {
            min_weeks: 8,
            discount: 0.2,
        }])
        .unwrap();
        let details = engine(0.0)
            .with_duration_table(table)
            .price_booking(&input(8, 250.0, Some(240.0)));
        assert_eq!(details.weekly_accommodation_rate, 200.0);
        assert_eq!(details.total_accommodation_cost, 1600.0);
    }

    #[test]
    fn over_one_hundred_percent_code() {
        let mut quote = input(1, 200.0, Some(345.0));
        quote.discount = code(150.0, DiscountTarget::Total);
        let details = engine(0.0).price_booking(&quote);
        assert_eq!(details.total_amount, 0.0);
        assert_eq!(details.vat_amount, 0.0);
        assert_eq!(details.total_with_vat, 0.0);
    }

    #[test]
    fn unset_food_contribution_uses_the_night_tier_default() {
        let short = PricingInput {
            weeks: vec![Week::new("w", date(2025, 7, 7), date(2025, 7, 10))],
            accommodation: Some(accommodation("Bell Tent", 210.0)),
            food_contribution: None,
            discount: None,
        };
        let details = engine(0.0).price_booking(&short);
        assert_eq!(details.base_weekly_food_rate, 345.0);
        // 3 nights display as 0.4 weeks
        assert_eq!(details.weeks_staying, 0.4);
        assert_eq!(details.total_food_and_facilities_cost, 138.0);
        assert_eq!(details.total_accommodation_cost, 84.0);

        let long = engine(0.0).price_booking(&input(3, 210.0, None));
        assert_eq!(long.base_weekly_food_rate, 240.0);
    }

    #[test]
    fn seasonal_and_duration_discounts_compound() {
        let details = engine(0.4).price_booking(&input(4, 400.0, Some(240.0)));
        assert_eq!(details.seasonal_discount_percent, 40.0);
        assert_eq!(details.duration_discount_percent, 18.0);
        assert_eq!(details.effective_base_rate, 240.0);
        // 400 * 0.6 * 0.82
        assert_eq!(details.weekly_accommodation_rate, 196.8);
        assert_eq!(details.total_accommodation_cost, 787.2);
    }

    #[test]
    fn dorms_ignore_the_season() {
        let mut quote = input(1, 150.0, Some(345.0));
        quote.accommodation = Some(accommodation("Van Parking / Dorm", 150.0));
        let details = engine(0.4).price_booking(&quote);
        assert_eq!(details.seasonal_discount_percent, 0.0);
        assert_eq!(details.total_accommodation_cost, 150.0);
    }

    #[test]
    fn test_accommodation_has_no_food_cost() {
        let mut quote = input(2, 1.0, Some(345.0));
        quote.accommodation = Some(Accommodation {
            kind: "test".into(),
            ..accommodation("Payment Test", 1.0)
        });
        quote.discount = code(50.0, DiscountTarget::Total);
        let details = engine(0.0).price_booking(&quote);
        assert_eq!(details.total_food_and_facilities_cost, 0.0);
        assert_eq!(details.total_amount, details.total_accommodation_cost);
        assert_eq!(details.subtotal, details.total_accommodation_cost);
        assert_eq!(
            details.vat_amount,
            VatPolicy::default().apply(details.total_accommodation_cost).vat_amount
        );
    }

    #[test]
    fn no_accommodation_and_no_weeks() {
        let details = engine(0.0).price_booking(&PricingInput::default());
        assert_eq!(details.total_nights, 0);
        assert_eq!(details.total_accommodation_cost, 0.0);
        assert_eq!(details.total_food_and_facilities_cost, 0.0);
        assert_eq!(details.total_amount, 0.0);
        assert_eq!(details.total_with_vat, 0.0);
    }

    #[test]
    fn amounts_are_cent_exact_and_never_negative() {
        let engine = engine(0.17);
        let targets = [
            DiscountTarget::Accommodation,
            DiscountTarget::FoodFacilities,
            DiscountTarget::Total,
        ];
        for nights in [1u32, 3, 6, 7, 10, 13, 20, 29, 45, 61] {
            for base_price in [99.99, 187.5, 333.33] {
                for food in [240.0, 287.0, 345.5] {
                    for pct in [0.0, 7.5, 33.0, 100.0, 137.0] {
                        for target in targets {
                            let quote = PricingInput {
                                weeks: vec![Week::new(
                                    "w",
                                    date(2025, 1, 1),
                                    date(2025, 1, 1) + chrono::Duration::days(i64::from(nights)),
                                )],
                                accommodation: Some(accommodation("Cabin", base_price)),
                                food_contribution: Some(food),
                                discount: code(pct, target),
                            };
                            let d = engine.price_booking(&quote);
                            for value in [
                                d.total_accommodation_cost,
                                d.total_food_and_facilities_cost,
                                d.subtotal,
                                d.total_amount,
                                d.applied_code_discount_value,
                                d.vat_amount,
                                d.total_with_vat,
                            ] {
                                assert!(is_cent_exact(value), "{value} is not cent exact");
                            }
                            assert!(d.total_amount >= 0.0);
                            assert_eq!(
                                d.total_with_vat,
                                round2(d.total_amount + d.vat_amount)
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn batch_keeps_input_order() {
        let engine = engine(0.0);
        let inputs: Vec<_> = (1..=10).map(|w| input(w, 200.0, Some(300.0))).collect();
        let batch = engine.price_batch(&inputs);
        assert_eq!(batch.len(), 10);
        for (input, details) in inputs.iter().zip(&batch) {
            assert_eq!(details, &engine.price_booking(input));
        }
        assert_eq!(batch[9].total_nights, 70);
    }

    #[test]
    fn default_engine_uses_the_season_table() {
        // January is low season
        let quote = PricingInput {
            weeks: consecutive_weeks(date(2026, 1, 5), 1),
            accommodation: Some(accommodation("Bell Tent", 200.0)),
            food_contribution: Some(345.0),
            discount: None,
        };
        let details = PricingEngine::default().price_booking(&quote);
        assert_eq!(details.seasonal_discount_percent, 40.0);
        assert_eq!(details.total_accommodation_cost, 120.0);
    }

    #[test]
    fn food_range_tracks_the_stay() {
        let engine = PricingEngine::default();
        assert_eq!(engine.food_contribution_range(4).min, 345.0);
        assert_eq!(engine.food_contribution_range(56).min, 240.0);
    }

    #[test]
    fn flat_calendar_breakdown() {
        let breakdown = FlatCalendar(0.1).season_breakdown(date(2025, 1, 1), date(2025, 1, 8));
        assert_eq!(
            breakdown.seasons,
            vec![SeasonNights {
                name: "Flat".into(),
                discount: 0.1,
                nights: 7
            }]
        );
    }
}
