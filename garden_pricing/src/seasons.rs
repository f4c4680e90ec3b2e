//! Season calendar and seasonal discount averaging.
//!
//! The engine only needs a [`SeasonCalendar`]: something that can say
//! how many nights of a date range fall into each named season.  The
//! [`SeasonTable`] implementation reads recurring yearly season ranges
//! from configuration and walks the range one night at a time.

use crate::error::{PricingError, Result};
use crate::models::{Accommodation, SeasonBreakdown, Week};
use crate::money::{cents, to_decimal};
use rust_decimal::Decimal;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Source of season breakdowns.  Implementations must be thread-safe
/// because batches of quotes are priced in parallel.
pub trait SeasonCalendar: Send + Sync {
    /// Breakdown of the nights from `start` (inclusive) to `end`
    /// (exclusive).  An empty or inverted range yields no seasons.
    fn season_breakdown(&self, start: NaiveDate, end: NaiveDate) -> SeasonBreakdown;
}

/// Breakdown of a whole selection, merged week by week so that the
/// night total matches the selection even when weeks are not
/// contiguous.
pub fn selection_breakdown(calendar: &dyn SeasonCalendar, weeks: &[Week]) -> SeasonBreakdown {
    let mut breakdown = SeasonBreakdown::default();
    for week in weeks {
        breakdown.merge(calendar.season_breakdown(week.start_date, week.end_date));
    }
    breakdown
}

/// Night-weighted average discount of a breakdown, rounded to two
/// decimals.  A breakdown with no nights averages to zero.
pub fn average_discount(breakdown: &SeasonBreakdown) -> f64 {
    let nights = breakdown.total_nights();
    if nights == 0 {
        return 0.0;
    }
    let weighted: Decimal = breakdown
        .seasons
        .iter()
        .map(|s| to_decimal(s.discount) * Decimal::from(s.nights))
        .sum();
    cents(weighted / Decimal::from(nights))
}

/// The seasonal discount actually granted for `accommodation`.  Dorms
/// are clamped to zero after rounding.
pub fn effective_discount(accommodation: Option<&Accommodation>, breakdown: &SeasonBreakdown) -> f64 {
    let average = average_discount(breakdown);
    match accommodation {
        Some(acc) if acc.is_dorm() => 0.0,
        _ => average,
    }
}

/// A month/day pair that recurs every year, written `MM-DD` in
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Result<Self> {
        // 2024 is a leap year, so 02-29 is accepted.
        if NaiveDate::from_ymd_opt(2024, month, day).is_none() {
            return Err(PricingError::InvalidSeasonTable(format!(
                "{month:02}-{day:02} is not a calendar day"
            )));
        }
        Ok(Self { month, day })
    }

    fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl TryFrom<String> for MonthDay {
    type Error = PricingError;

    fn try_from(value: String) -> Result<Self> {
        let invalid = || PricingError::InvalidSeasonTable(format!("expected MM-DD, got {value:?}"));
        let (month, day) = value.split_once('-').ok_or_else(invalid)?;
        let month = month.parse().map_err(|_| invalid())?;
        let day = day.parse().map_err(|_| invalid())?;
        MonthDay::new(month, day)
    }
}

impl From<MonthDay> for String {
    fn from(value: MonthDay) -> Self {
        format!("{:02}-{:02}", value.month, value.day)
    }
}

/// A season that recurs every year from `from` to `to`, both
/// inclusive.  When `to` precedes `from` the range wraps the new year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonDefinition {
    pub name: String,
    pub discount: f64,
    pub from: MonthDay,
    pub to: MonthDay,
}

impl SeasonDefinition {
    fn contains(&self, day: MonthDay) -> bool {
        if self.from <= self.to {
            self.from <= day && day <= self.to
        } else {
            day >= self.from || day <= self.to
        }
    }
}

/// Season used for nights no definition covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackSeason {
    pub name: String,
    pub discount: f64,
}

/// Configuration shape of a [`SeasonTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonTableConfig {
    pub seasons: Vec<SeasonDefinition>,
    pub fallback: FallbackSeason,
}

impl Default for SeasonTableConfig {
    fn default() -> Self {
        let md = |month, day| MonthDay { month, day };
        Self {
            seasons: vec![
                SeasonDefinition {
                    name: "Low Season".into(),
                    discount: 0.4,
                    from: md(11, 1),
                    to: md(3, 31),
                },
                SeasonDefinition {
                    name: "Medium Season".into(),
                    discount: 0.15,
                    from: md(4, 1),
                    to: md(5, 31),
                },
                SeasonDefinition {
                    name: "Medium Season".into(),
                    discount: 0.15,
                    from: md(10, 1),
                    to: md(10, 31),
                },
            ],
            fallback: FallbackSeason {
                name: "Summer Season".into(),
                discount: 0.0,
            },
        }
    }
}

/// Recurring yearly season table.  The first definition that covers a
/// night wins.
#[derive(Debug, Clone)]
pub struct SeasonTable {
    seasons: Vec<SeasonDefinition>,
    fallback: FallbackSeason,
}

impl SeasonTable {
    pub fn new(config: SeasonTableConfig) -> Result<Self> {
        let discounts = config
            .seasons
            .iter()
            .map(|s| (&s.name, s.discount))
            .chain(std::iter::once((&config.fallback.name, config.fallback.discount)));
        for (name, discount) in discounts {
            if !(0.0..=1.0).contains(&discount) {
                return Err(PricingError::InvalidSeasonTable(format!(
                    "season {name} has discount {discount}, expected 0..=1"
                )));
            }
        }
        Ok(Self {
            seasons: config.seasons,
            fallback: config.fallback,
        })
    }

    fn season_of(&self, night: NaiveDate) -> (&str, f64) {
        let day = MonthDay::of(night);
        self.seasons
            .iter()
            .find(|s| s.contains(day))
            .map(|s| (s.name.as_str(), s.discount))
            .unwrap_or((self.fallback.name.as_str(), self.fallback.discount))
    }
}

impl Default for SeasonTable {
    fn default() -> Self {
        let config = SeasonTableConfig::default();
        Self {
            seasons: config.seasons,
            fallback: config.fallback,
        }
    }
}

impl SeasonCalendar for SeasonTable {
    fn season_breakdown(&self, start: NaiveDate, end: NaiveDate) -> SeasonBreakdown {
        let mut breakdown = SeasonBreakdown::default();
        for night in start.iter_days().take_while(|d| *d < end) {
            let (name, discount) = self.season_of(night);
            breakdown.add_nights(name, discount, 1);
        }
        breakdown
    }
}
