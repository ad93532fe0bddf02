//! Sales tax arithmetic for tax-inclusive amounts.
//!
//! Amounts recorded as income already contain GST/HST. Reports need the
//! portion that was collected on behalf of the government, so the total is
//! split back into a pre-tax amount and the embedded tax. All arithmetic is
//! fixed-point and the results are rounded half-up to cents.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::TaxError;

const CENTS: u32 = 2;

/// A fractional tax rate, e.g. `0.13` for 13%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Federal GST.
    pub const GST: TaxRate = TaxRate(Decimal::from_parts(5, 0, 0, false, 2));
    /// Ontario HST.
    pub const HST_ONTARIO: TaxRate = TaxRate(Decimal::from_parts(13, 0, 0, false, 2));
    /// HST in the Atlantic provinces.
    pub const HST_ATLANTIC: TaxRate = TaxRate(Decimal::from_parts(15, 0, 0, false, 2));

    pub fn new(rate: Decimal) -> Result<Self, TaxError> {
        if rate < Decimal::ZERO {
            return Err(TaxError::InvalidRate(rate));
        }
        Ok(Self(rate))
    }

    /// Build a rate from a percentage, so `13` becomes `0.13`.
    pub fn from_percent(percent: Decimal) -> Result<Self, TaxError> {
        let rate = percent
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or(TaxError::Overflow)?;
        Self::new(rate)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::HST_ONTARIO
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let percent = (self.0 * Decimal::ONE_HUNDRED).normalize();
        write!(f, "{}%", percent)
    }
}

impl FromStr for TaxRate {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rate = Decimal::from_str(s.trim()).map_err(|_| TaxError::Unparseable(s.to_string()))?;
        Self::new(rate)
    }
}

/// A tax-inclusive amount split into its two parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decomposition {
    pub pre_tax: Decimal,
    pub tax_collected: Decimal,
}

impl Decomposition {
    /// The tax-inclusive amount the parts add back up to.
    pub fn total(&self) -> Decimal {
        self.pre_tax + self.tax_collected
    }
}

pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENTS, RoundingStrategy::MidpointAwayFromZero)
}

/// Split a tax-inclusive `amount` into pre-tax amount and tax collected.
///
/// `pre_tax = amount / (1 + rate)`, `tax_collected = amount - pre_tax`
/// rounded half-up to cents. The pre-tax figure is derived from the rounded
/// tax so that both parts always add back up to the cent-rounded amount.
pub fn decompose(amount: Decimal, rate: Decimal) -> Result<Decomposition, TaxError> {
    if amount < Decimal::ZERO {
        return Err(TaxError::InvalidAmount(amount));
    }
    let rate = TaxRate::new(rate)?;

    let divisor = Decimal::ONE
        .checked_add(rate.value())
        .ok_or(TaxError::Overflow)?;
    let unrounded_pre_tax = amount.checked_div(divisor).ok_or(TaxError::Overflow)?;
    let tax_collected = round_cents(
        amount
            .checked_sub(unrounded_pre_tax)
            .ok_or(TaxError::Overflow)?,
    );
    let pre_tax = round_cents(amount) - tax_collected;

    Ok(Decomposition {
        pre_tax,
        tax_collected,
    })
}

/// Tax embedded in a tax-inclusive `amount`, via `amount * rate / (1 + rate)`.
///
/// Always agrees with `decompose(amount, rate)?.tax_collected`. The product
/// is taken before dividing so the quotient is exact whenever the tax is a
/// terminating decimal, half-cent midpoints included.
pub fn embedded_tax(amount: Decimal, rate: Decimal) -> Result<Decimal, TaxError> {
    if amount < Decimal::ZERO {
        return Err(TaxError::InvalidAmount(amount));
    }
    let rate = TaxRate::new(rate)?.value();
    let divisor = Decimal::ONE.checked_add(rate).ok_or(TaxError::Overflow)?;
    let tax = amount
        .checked_mul(rate)
        .and_then(|product| product.checked_div(divisor))
        .ok_or(TaxError::Overflow)?;
    Ok(round_cents(tax))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn check(amount: &str, rate: &str, pre_tax: &str, tax: &str) {
        let split = decompose(d(amount), d(rate)).unwrap();
        assert_eq!(split.pre_tax, d(pre_tax), "pre-tax of {} at {}", amount, rate);
        assert_eq!(split.tax_collected, d(tax), "tax of {} at {}", amount, rate);
        assert_eq!(embedded_tax(d(amount), d(rate)).unwrap(), d(tax));
    }

    #[test]
    fn known_hst_and_gst_amounts() {
        check("1000.00", "0.13", "884.96", "115.04");
        check("100.00", "0.13", "88.50", "11.50");
        check("500.00", "0.13", "442.48", "57.52");
        check("2000.00", "0.13", "1769.91", "230.09");
        check("999.99", "0.05", "952.37", "47.62");
        check("123.45", "0.15", "107.35", "16.10");
    }

    #[test]
    fn midpoints_round_away_from_zero() {
        // 2.01 at 100% embeds exactly 1.005 of tax
        check("2.01", "1", "1.00", "1.01");
        // 0.21 at 100% embeds exactly 0.105 of tax
        check("0.21", "1", "0.10", "0.11");
    }

    #[test]
    fn half_cent_tax_at_small_rates() {
        // 3.13 at 0.16% embeds exactly 0.005
        check("3.13", "0.0016", "3.12", "0.01");
        check("9.39", "0.0016", "9.37", "0.02");
        // 1.89 at 0.8% embeds exactly 0.015
        check("1.89", "0.0080", "1.87", "0.02");
        check("3.15", "0.0080", "3.12", "0.03");
        check("5.67", "0.0080", "5.62", "0.05");
    }

    #[test]
    fn zero_rate_collects_nothing() {
        check("250.00", "0", "250.00", "0.00");
    }

    #[test]
    fn zero_amount() {
        check("0", "0.13", "0.00", "0.00");
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert_eq!(
            decompose(d("-1.00"), d("0.13")),
            Err(TaxError::InvalidAmount(d("-1.00")))
        );
        assert_eq!(
            embedded_tax(d("-1.00"), d("0.13")),
            Err(TaxError::InvalidAmount(d("-1.00")))
        );
    }

    #[test]
    fn negative_rate_is_rejected() {
        assert_eq!(
            decompose(d("10.00"), d("-0.05")),
            Err(TaxError::InvalidRate(d("-0.05")))
        );
        assert!(TaxRate::new(d("-0.01")).is_err());
    }

    #[test]
    fn repeated_calls_agree() {
        let first = decompose(d("731.17"), d("0.13")).unwrap();
        for _ in 0..10 {
            assert_eq!(decompose(d("731.17"), d("0.13")).unwrap(), first);
        }
    }

    #[test]
    fn rate_constants_and_percent() {
        assert_eq!(TaxRate::GST.value(), d("0.05"));
        assert_eq!(TaxRate::HST_ONTARIO.value(), d("0.13"));
        assert_eq!(TaxRate::HST_ATLANTIC.value(), d("0.15"));
        assert_eq!(TaxRate::from_percent(d("13")).unwrap(), TaxRate::HST_ONTARIO);
        assert_eq!(TaxRate::HST_ONTARIO.to_string(), "13%");
        assert_eq!("0.05".parse::<TaxRate>().unwrap(), TaxRate::GST);
        assert_eq!(
            "-0.05".parse::<TaxRate>(),
            Err(TaxError::InvalidRate(d("-0.05")))
        );
        assert_eq!(
            "thirteen".parse::<TaxRate>(),
            Err(TaxError::Unparseable("thirteen".into()))
        );
    }
}
