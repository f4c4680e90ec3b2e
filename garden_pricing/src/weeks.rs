//! Week and night arithmetic.

use crate::error::{PricingError, Result};
use crate::models::Week;
use crate::money::tenths;
use rust_decimal::Decimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Length of a stay expressed the three ways pricing needs it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StayLength {
    pub total_nights: u32,
    /// `floor(total_nights / 7)`; the duration discount lookup key.
    pub complete_weeks: u32,
    /// `total_nights / 7` at full precision.
    pub exact_weeks: f64,
    /// `exact_weeks` rounded to one decimal.  Every charged amount is
    /// multiplied by this value, never by `exact_weeks`.
    pub display_weeks: f64,
}

impl StayLength {
    pub fn from_nights(total_nights: u32) -> Self {
        let exact_weeks = f64::from(total_nights) / 7.0;
        Self {
            total_nights,
            complete_weeks: total_nights / 7,
            exact_weeks,
            display_weeks: tenths(Decimal::from(total_nights) / Decimal::from(7)),
        }
    }

    pub fn from_weeks(weeks: &[Week]) -> Self {
        Self::from_nights(weeks.iter().map(Week::nights).sum())
    }

    /// Stay length of an already stored booking.
    pub fn from_dates(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self::from_nights((check_out - check_in).num_days().max(0) as u32)
    }

    /// Week count rounded up, so a partial week counts as a full one.
    pub fn rounded_up_weeks(&self) -> u32 {
        self.total_nights.div_ceil(7)
    }
}

/// First and last night of a selection, if any.
pub fn selection_bounds(weeks: &[Week]) -> Option<(NaiveDate, NaiveDate)> {
    let start = weeks.iter().map(|w| w.start_date).min()?;
    let end = weeks.iter().map(|w| w.end_date).max()?;
    Some((start, end))
}

/// Reject selections the calendar UI should never produce: empty or
/// inverted spans, and spans that are out of order or overlap.
pub fn validate_selection(weeks: &[Week]) -> Result<()> {
    let mut previous: Option<&Week> = None;
    for week in weeks {
        if week.end_date <= week.start_date {
            return Err(PricingError::EmptyWeek {
                id: week.id.clone(),
                start: week.start_date,
                end: week.end_date,
            });
        }
        if let Some(prev) = previous {
            if week.start_date < prev.end_date {
                return Err(PricingError::OverlappingWeeks {
                    id: week.id.clone(),
                    previous: prev.id.clone(),
                });
            }
        }
        previous = Some(week);
    }
    Ok(())
}

/// Consecutive seven-night weeks starting at `start`.  Handy for
/// building selections in tests and tools.
pub fn consecutive_weeks(start: NaiveDate, count: u32) -> Vec<Week> {
    (0..count)
        .map(|i| {
            let from = start + chrono::Duration::days(i64::from(i) * 7);
            Week::new(format!("week-{}", i + 1), from, from + chrono::Duration::days(7))
        })
        .collect()
}
