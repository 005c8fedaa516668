use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::types::Frequency;

use super::PeriodSplit;

/// flat interest over the whole term: `P × r × n / periods_per_year`
pub fn total_simple_interest(
    principal: Money,
    annual_rate: Rate,
    frequency: Frequency,
    periods: u32,
) -> Money {
    let accrued = principal.as_decimal() * annual_rate.as_decimal() * Decimal::from(periods)
        / Decimal::from(frequency.periods_per_year());
    Money::from_decimal(accrued)
}

/// split `total` into `parts` even shares, the last share taking the rounding remainder.
///
/// A share never exceeds what is left to distribute, so tiny totals spread over many
/// parts produce trailing zero shares rather than a negative final share.
pub fn spread_evenly(total: Money, parts: u32) -> Vec<Money> {
    if parts == 0 {
        return Vec::new();
    }

    let share = total / Decimal::from(parts);
    let mut remaining = total;
    let mut shares = Vec::with_capacity(parts as usize);

    for _ in 1..parts {
        let part = share.min(remaining);
        shares.push(part);
        remaining -= part;
    }
    shares.push(remaining);

    shares
}

/// per-period split for a flat-interest loan
pub fn simple_splits(
    principal: Money,
    annual_rate: Rate,
    frequency: Frequency,
    periods: u32,
) -> Vec<PeriodSplit> {
    let total_interest = total_simple_interest(principal, annual_rate, frequency, periods);

    spread_evenly(principal, periods)
        .into_iter()
        .zip(spread_evenly(total_interest, periods))
        .map(|(principal, interest)| PeriodSplit { principal, interest })
        .collect()
}
