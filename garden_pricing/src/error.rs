//! Error types for the pricing engine.
//!
//! Pricing itself never fails: missing inputs degrade to zero amounts.
//! Errors arise only when a week selection or a configuration table is
//! rejected before it reaches the engine.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("week {id} ends on {end} which is not after its start {start}")]
    EmptyWeek {
        id: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("week {id} starts before the previous week {previous} ends")]
    OverlappingWeeks { id: String, previous: String },

    #[error("invalid duration discount table: {0}")]
    InvalidDurationTable(String),

    #[error("invalid season table: {0}")]
    InvalidSeasonTable(String),

    #[error("invalid food contribution range: min {min} exceeds max {max}")]
    InvalidContributionRange { min: f64, max: f64 },

    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, PricingError>;
