use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::types::Frequency;

use super::PeriodSplit;

/// level payment from the annuity formula `P × i / (1 − (1+i)^−n)`, rounded to cents.
///
/// Falls back to `P / n` when the periodic rate is zero or too small to move the
/// discount factor at 28-digit precision.
pub fn level_payment(principal: Money, periodic_rate: Decimal, periods: u32) -> Money {
    let straight_line = principal / Decimal::from(periods.max(1));
    if periodic_rate.is_zero() || periods == 0 {
        return straight_line;
    }

    // (1+i)^-n built from the discount factor so long terms decay towards zero
    // instead of overflowing
    let discount = Decimal::ONE / (Decimal::ONE + periodic_rate);
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor *= discount;
    }

    let denominator = Decimal::ONE - factor;
    match (principal.as_decimal() * periodic_rate).checked_div(denominator) {
        Some(payment) if !denominator.is_zero() => Money::from_decimal(payment),
        _ => straight_line,
    }
}

/// per-period split for an amortizing loan.
///
/// Interest is charged on the outstanding balance; principal is the level payment
/// less that interest, bounded by the balance. The final period clears whatever
/// balance is left, absorbing the rounding drift of the earlier periods.
pub fn compound_splits(
    principal: Money,
    annual_rate: Rate,
    frequency: Frequency,
    periods: u32,
) -> (Money, Vec<PeriodSplit>) {
    let periodic_rate = annual_rate.periodic(frequency.periods_per_year()).as_decimal();
    let payment = level_payment(principal, periodic_rate, periods);

    let mut balance = principal;
    let mut splits = Vec::with_capacity(periods as usize);

    for number in 1..=periods {
        let interest = Money::from_decimal(balance.as_decimal() * periodic_rate);
        let principal_portion = if number == periods {
            balance
        } else {
            (payment - interest).max(Money::ZERO).min(balance)
        };

        balance -= principal_portion;
        splits.push(PeriodSplit {
            principal: principal_portion,
            interest,
        });
    }

    (payment, splits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_level_payment() {
        let payment = level_payment(Money::from_major(1_000), dec!(0.1) / dec!(12), 12);
        assert_eq!(payment, Money::from_decimal(dec!(87.92)));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let payment = level_payment(Money::from_major(1_000), Decimal::ZERO, 4);
        assert_eq!(payment, Money::from_major(250));
    }

    #[test]
    fn test_vanishing_rate_does_not_divide_by_zero() {
        let payment = level_payment(Money::from_major(900), Decimal::new(1, 28), 3);
        assert_eq!(payment, Money::from_major(300));
    }

    #[test]
    fn test_long_high_rate_term_does_not_overflow() {
        // (1.1)^600 is far outside decimal range; the discount form stays bounded
        let payment = level_payment(Money::from_major(10_000), dec!(0.1), 600);
        assert_eq!(payment, Money::from_major(1_000));
    }

    #[test]
    fn test_splits_clear_balance() {
        let (payment, splits) = compound_splits(
            Money::from_major(1_000),
            Rate::from_percentage(10),
            Frequency::Monthly,
            12,
        );
        assert_eq!(payment, Money::from_decimal(dec!(87.92)));
        assert_eq!(splits[0].interest, Money::from_decimal(dec!(8.33)));
        assert_eq!(splits[0].principal, Money::from_decimal(dec!(79.59)));

        let principal: Money = splits.iter().map(|s| s.principal).sum();
        assert_eq!(principal, Money::from_major(1_000));

        let last = splits.last().unwrap();
        assert_eq!(last.principal, Money::from_decimal(dec!(87.14)));
        assert_eq!(last.interest, Money::from_decimal(dec!(0.73)));
    }
}
