//! Value added tax.
//!
//! VAT is charged on the total after the discount code and before
//! credits are deducted.

use crate::error::{PricingError, Result};
use crate::money::{cents, to_decimal};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VAT_RATE: f64 = 0.24;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VatPolicy {
    /// Rate as a fraction, e.g. `0.24`.
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VatBreakdown {
    pub vat_amount: f64,
    pub total_with_vat: f64,
}

impl VatPolicy {
    pub fn new(rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(PricingError::InvalidAmount {
                field: "vat_rate",
                value: rate,
            });
        }
        Ok(Self { rate })
    }

    /// VAT on `total`, rounded to cents, and the gross amount.
    pub fn apply(&self, total: f64) -> VatBreakdown {
        let vat_amount = cents(to_decimal(total) * to_decimal(self.rate));
        VatBreakdown {
            vat_amount,
            total_with_vat: cents(to_decimal(total) + to_decimal(vat_amount)),
        }
    }
}

impl Default for VatPolicy {
    fn default() -> Self {
        Self {
            rate: DEFAULT_VAT_RATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rate() {
        let vat = VatPolicy::default().apply(545.0);
        assert_eq!(vat.vat_amount, 130.8);
        assert_eq!(vat.total_with_vat, 675.8);
    }

    #[test]
    fn identity_holds_across_totals() {
        let policy = VatPolicy::default();
        for total_cents in (0..200_000i64).step_by(137) {
            // 24% of the total in whole cents, half up
            let vat_cents = (total_cents * 24 + 50) / 100;
            let vat = policy.apply(total_cents as f64 / 100.0);
            assert_eq!(vat.vat_amount, vat_cents as f64 / 100.0);
            assert_eq!(vat.total_with_vat, (total_cents + vat_cents) as f64 / 100.0);
        }
    }

    #[test]
    fn custom_rate() {
        let vat = VatPolicy::new(0.1).unwrap().apply(99.99);
        assert_eq!(vat.vat_amount, 10.0);
        assert_eq!(vat.total_with_vat, 109.99);
    }

    #[test]
    fn rejects_negative_rate() {
        assert!(VatPolicy::new(-0.2).is_err());
    }
}
