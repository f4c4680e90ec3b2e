//! Credits settlement.
//!
//! Credits are deducted when a booking is confirmed, after pricing.
//! If what is left to pay is too small to charge through the payment
//! gateway, the booking is settled with credits alone.

use crate::error::{PricingError, Result};
use crate::money::{non_negative, round2, to_decimal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditsPolicy {
    /// Amounts due below this are not sent to the gateway.
    pub credits_only_threshold: f64,
}

impl Default for CreditsPolicy {
    fn default() -> Self {
        Self {
            credits_only_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum PaymentRoute {
    /// Charge `amount_due` through the payment gateway.
    Gateway,
    /// Nothing is charged; the booking carries a placeholder reference.
    CreditsOnly { payment_reference: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditsSettlement {
    pub credits_used: f64,
    pub amount_due: f64,
    #[serde(flatten)]
    pub route: PaymentRoute,
}

impl CreditsSettlement {
    pub fn is_credits_only(&self) -> bool {
        matches!(self.route, PaymentRoute::CreditsOnly { .. })
    }
}

/// Largest credit amount that may be applied to `total`.
pub fn max_usable_credits(total: f64, available: f64) -> f64 {
    round2(available.min(total).max(0.0))
}

impl CreditsPolicy {
    /// Settle `total` (pre-VAT, post discount code) against the guest's
    /// credits.  `requested` is what the guest asked to use; when unset
    /// as much as possible is used.
    pub fn settle(
        &self,
        total: f64,
        available: f64,
        requested: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<CreditsSettlement> {
        for (field, value) in [("total", total), ("available_credits", available)] {
            if !value.is_finite() || value < 0.0 {
                return Err(PricingError::InvalidAmount { field, value });
            }
        }
        let ceiling = max_usable_credits(total, available);
        let credits_used = match requested {
            Some(value) if !value.is_finite() || value < 0.0 => {
                return Err(PricingError::InvalidAmount {
                    field: "credits_to_use",
                    value,
                })
            }
            Some(value) => round2(value.min(ceiling)),
            None => ceiling,
        };
        let amount_due = non_negative(to_decimal(total) - to_decimal(credits_used));
        let route = if amount_due < self.credits_only_threshold {
            let payment_reference = format!("credits-only-{}", now.timestamp_millis());
            tracing::info!(credits_used, amount_due, %payment_reference, "settling booking with credits only");
            PaymentRoute::CreditsOnly { payment_reference }
        } else {
            PaymentRoute::Gateway
        };
        Ok(CreditsSettlement {
            credits_used,
            amount_due,
            route,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn partial_credits_go_through_the_gateway() {
        let settlement = CreditsPolicy::default()
            .settle(545.0, 100.0, None, now())
            .unwrap();
        assert_eq!(settlement.credits_used, 100.0);
        assert_eq!(settlement.amount_due, 445.0);
        assert_eq!(settlement.route, PaymentRoute::Gateway);
    }

    #[test]
    fn requested_credits_are_clamped() {
        let settlement = CreditsPolicy::default()
            .settle(545.0, 1000.0, Some(800.0), now())
            .unwrap();
        assert_eq!(settlement.credits_used, 545.0);
        assert_eq!(settlement.amount_due, 0.0);
        assert!(settlement.is_credits_only());
    }

    #[test]
    fn tiny_remainders_are_credits_only() {
        let settlement = CreditsPolicy::default()
            .settle(545.0, 544.7, None, now())
            .unwrap();
        assert_eq!(settlement.amount_due, 0.3);
        assert_eq!(
            settlement.route,
            PaymentRoute::CreditsOnly {
                payment_reference: format!("credits-only-{}", now().timestamp_millis())
            }
        );
    }

    #[test]
    fn no_credits() {
        let settlement = CreditsPolicy::default()
            .settle(545.0, 0.0, None, now())
            .unwrap();
        assert_eq!(settlement.credits_used, 0.0);
        assert_eq!(settlement.amount_due, 545.0);
        assert!(!settlement.is_credits_only());
    }

    #[test]
    fn rejects_negative_requests() {
        let result = CreditsPolicy::default().settle(545.0, 10.0, Some(-5.0), now());
        assert!(matches!(
            result,
            Err(PricingError::InvalidAmount {
                field: "credits_to_use",
                ..
            })
        ));
    }

    #[test]
    fn usable_credits_never_exceed_the_total() {
        assert_eq!(max_usable_credits(50.0, 80.0), 50.0);
        assert_eq!(max_usable_credits(50.0, 20.0), 20.0);
    }
}
