use akowe::{TaxError, decompose, embedded_tax};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn cents() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_000).prop_map(|c| Decimal::new(c, 2))
}

fn rate() -> impl Strategy<Value = Decimal> {
    // up to 100%, in basis points
    (0i64..=10_000).prop_map(|bp| Decimal::new(bp, 4))
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Amounts whose embedded tax is an exact half cent, with the half-up result.
///
/// With a rate of `bp` basis points the tax on `a` cents is
/// `a * bp / (10000 + bp)` cents. That lands on a half cent only when `bp` is
/// 16 times an odd number; `a` is then an odd multiple of `(10000 + bp) / g`.
fn half_cent_tax() -> impl Strategy<Value = (Decimal, Decimal, Decimal)> {
    (0i64..=312, 0i64..1_000).prop_map(|(s, j)| {
        let bp = 16 * (2 * s + 1);
        let g = gcd(2 * bp, 10_000 + bp);
        let odd = 2 * j + 1;
        let amount = odd * (10_000 + bp) / g;
        let half_cents = odd * (2 * bp / g);
        (
            Decimal::new(amount, 2),
            Decimal::new(bp, 4),
            Decimal::new((half_cents + 1) / 2, 2),
        )
    })
}

#[test]
fn closed_form_agrees_on_small_amounts_at_every_basis_point() {
    for c in 0i64..1_000 {
        let amount = Decimal::new(c, 2);
        for bp in 0i64..=1_000 {
            let rate = Decimal::new(bp, 4);
            let split = decompose(amount, rate).unwrap();
            assert_eq!(
                split.tax_collected,
                embedded_tax(amount, rate).unwrap(),
                "tax of {} at {}",
                amount,
                rate
            );
        }
    }
}

proptest! {
    #[test]
    fn parts_add_back_to_amount(amount in cents(), rate in rate()) {
        let split = decompose(amount, rate).unwrap();
        prop_assert_eq!(split.pre_tax + split.tax_collected, amount);
        prop_assert!(split.pre_tax >= Decimal::ZERO);
        prop_assert!(split.tax_collected >= Decimal::ZERO);
        prop_assert!(split.tax_collected.scale() <= 2);
    }

    #[test]
    fn subtraction_and_closed_form_agree(amount in cents(), rate in rate()) {
        let split = decompose(amount, rate).unwrap();
        prop_assert_eq!(split.tax_collected, embedded_tax(amount, rate).unwrap());
    }

    #[test]
    fn half_cent_tax_rounds_up_on_both_paths((amount, rate, tax) in half_cent_tax()) {
        let split = decompose(amount, rate).unwrap();
        prop_assert_eq!(split.tax_collected, tax);
        prop_assert_eq!(split.pre_tax, amount - tax);
        prop_assert_eq!(embedded_tax(amount, rate).unwrap(), tax);
    }

    #[test]
    fn deterministic(amount in cents(), rate in rate()) {
        prop_assert_eq!(decompose(amount, rate), decompose(amount, rate));
    }

    #[test]
    fn negative_inputs_are_rejected(c in 1i64..1_000_000, bp in 1i64..10_000) {
        let negative = Decimal::new(-c, 2);
        prop_assert_eq!(
            decompose(negative, Decimal::new(bp, 4)),
            Err(TaxError::InvalidAmount(negative))
        );
        let negative_rate = Decimal::new(-bp, 4);
        prop_assert_eq!(
            decompose(Decimal::new(c, 2), negative_rate),
            Err(TaxError::InvalidRate(negative_rate))
        );
    }
}
