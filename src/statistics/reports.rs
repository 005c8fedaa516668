use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dates::YearMonth;
use crate::decimal::Money;
use crate::loan::Installment;
use crate::payments::Payment;

/// loan activity rolled up per calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyLoanSummary {
    pub month: YearMonth,
    /// Σ totals of installments due in the month
    pub scheduled: Money,
    /// Σ applied amounts of payments made in the month
    pub collected: Money,
    pub principal_collected: Money,
    pub interest_collected: Money,
    pub payment_count: usize,
}

impl MonthlyLoanSummary {
    fn empty(month: YearMonth) -> Self {
        Self {
            month,
            scheduled: Money::ZERO,
            collected: Money::ZERO,
            principal_collected: Money::ZERO,
            interest_collected: Money::ZERO,
            payment_count: 0,
        }
    }
}

/// one row per month that has either an installment due or a payment made, in
/// calendar order. Installments group by due date, payments by payment date.
pub fn loan_monthly_report(
    installments: &[Installment],
    payments: &[Payment],
) -> Vec<MonthlyLoanSummary> {
    let mut months: BTreeMap<YearMonth, MonthlyLoanSummary> = BTreeMap::new();

    for installment in installments {
        let month = YearMonth::of(installment.due_date);
        months
            .entry(month)
            .or_insert_with(|| MonthlyLoanSummary::empty(month))
            .scheduled += installment.total_amount;
    }

    for payment in payments {
        let month = YearMonth::of(payment.payment_date);
        let row = months
            .entry(month)
            .or_insert_with(|| MonthlyLoanSummary::empty(month));
        row.collected += payment.applied_amount();
        row.principal_collected += payment.principal_amount;
        row.interest_collected += payment.interest_amount;
        row.payment_count += 1;
    }

    months.into_values().collect()
}
