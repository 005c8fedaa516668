use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::StatisticsConfig;
use crate::dates;
use crate::decimal::Money;
use crate::loan::{derive_loan_status, Installment, Loan};
use crate::payments::Payment;
use crate::types::{LoanId, LoanStatus, PaymentStatus};

/// an unpaid installment as listed on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentDue {
    pub loan_id: LoanId,
    pub borrower: String,
    pub sequence: u32,
    #[serde(with = "dates::dmy")]
    pub due_date: NaiveDate,
    /// still owed on the installment
    pub amount_due: Money,
    pub status: PaymentStatus,
    /// negative once past due
    pub days_until_due: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(with = "dates::dmy")]
    pub as_of: NaiveDate,
    pub active_loans: usize,
    pub completed_loans: usize,
    pub overdue_loans: usize,
    pub defaulted_loans: usize,
    pub total_lent: Money,
    pub total_outstanding: Money,
    pub total_collected: Money,
    pub total_interest_earned: Money,
    pub overdue_amount: Money,
    /// due within the look-ahead window, soonest first
    pub upcoming_payments: Vec<InstallmentDue>,
    /// past due and not fully paid, oldest first
    pub overdue_installments: Vec<InstallmentDue>,
}

/// loan dashboard projection.
///
/// Rows belonging to loans missing from `loans` are ignored. Installments of
/// defaulted loans still count towards the outstanding total but are left off the
/// upcoming and overdue lists.
pub fn loan_dashboard(
    config: &StatisticsConfig,
    loans: &[Loan],
    installments: &[Installment],
    payments: &[Payment],
    as_of: NaiveDate,
) -> DashboardStats {
    let by_id: HashMap<LoanId, &Loan> = loans.iter().map(|l| (l.id, l)).collect();
    let window = config.upcoming_window_days as i64;

    let mut stats = DashboardStats {
        as_of,
        active_loans: 0,
        completed_loans: 0,
        overdue_loans: 0,
        defaulted_loans: 0,
        total_lent: Money::ZERO,
        total_outstanding: Money::ZERO,
        total_collected: Money::ZERO,
        total_interest_earned: Money::ZERO,
        overdue_amount: Money::ZERO,
        upcoming_payments: Vec::new(),
        overdue_installments: Vec::new(),
    };

    for loan in loans {
        stats.total_lent += loan.principal;
        match derive_loan_status(loan, installments, as_of) {
            LoanStatus::Active => stats.active_loans += 1,
            LoanStatus::Completed => stats.completed_loans += 1,
            LoanStatus::Overdue => stats.overdue_loans += 1,
            LoanStatus::Defaulted => stats.defaulted_loans += 1,
        }
    }

    for installment in installments {
        let Some(loan) = by_id.get(&installment.loan_id) else {
            continue;
        };
        if installment.is_paid() {
            continue;
        }

        let amount_due = installment.remaining();
        stats.total_outstanding += amount_due;
        if loan.defaulted {
            continue;
        }

        let days_until_due = dates::days_between(as_of, installment.due_date);
        let row = || InstallmentDue {
            loan_id: loan.id,
            borrower: loan.borrower.clone(),
            sequence: installment.sequence,
            due_date: installment.due_date,
            amount_due,
            status: installment.status(as_of),
            days_until_due,
        };

        if days_until_due < 0 {
            stats.overdue_amount += amount_due;
            stats.overdue_installments.push(row());
        } else if days_until_due <= window {
            stats.upcoming_payments.push(row());
        }
    }

    for payment in payments.iter().filter(|p| by_id.contains_key(&p.loan_id)) {
        stats.total_collected += payment.applied_amount();
        stats.total_interest_earned += payment.interest_amount;
    }

    let order = |a: &InstallmentDue, b: &InstallmentDue| {
        (a.due_date, a.loan_id, a.sequence).cmp(&(b.due_date, b.loan_id, b.sequence))
    };
    stats.upcoming_payments.sort_by(order);
    stats.overdue_installments.sort_by(order);

    stats
}
