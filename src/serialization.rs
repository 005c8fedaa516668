//! Serializable views for display layers.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::account::LoanAccount;
use crate::dates;
use crate::decimal::Money;
use crate::loan::{derive_loan_status, Installment, Loan};
use crate::types::{Frequency, InterestType, LoanId, LoanStatus, PaymentStatus};

/// loan with its schedule and every status resolved as of one date
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub borrower: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: LoanStatus,
    #[serde(with = "dates::dmy")]
    pub as_of: NaiveDate,
    pub terms: TermsView,
    pub totals: TotalsView,
    pub installments: Vec<InstallmentView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TermsView {
    pub principal: Money,
    pub annual_rate_percent: rust_decimal::Decimal,
    pub interest_type: InterestType,
    pub frequency: Frequency,
    pub number_of_installments: u32,
    #[serde(with = "dates::dmy")]
    pub start_date: NaiveDate,
    #[serde(with = "dates::dmy")]
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TotalsView {
    pub total_amount: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub outstanding: Money,
    pub payment_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstallmentView {
    pub sequence: u32,
    #[serde(with = "dates::dmy")]
    pub due_date: NaiveDate,
    pub principal_amount: Money,
    pub interest_amount: Money,
    pub total_amount: Money,
    pub paid_amount: Money,
    pub remaining: Money,
    #[serde(with = "dates::dmy_option", default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    pub status: PaymentStatus,
}

impl InstallmentView {
    pub fn from_installment(installment: &Installment, as_of: NaiveDate) -> Self {
        InstallmentView {
            sequence: installment.sequence,
            due_date: installment.due_date,
            principal_amount: installment.principal_amount,
            interest_amount: installment.interest_amount,
            total_amount: installment.total_amount,
            paid_amount: installment.paid_amount,
            remaining: installment.remaining(),
            paid_date: installment.paid_date,
            status: installment.status(as_of),
        }
    }
}

impl LoanView {
    /// view over a loan and its installments; rows of other loans are skipped
    pub fn from_parts(
        loan: &Loan,
        installments: &[Installment],
        payment_count: usize,
        as_of: NaiveDate,
    ) -> Self {
        let own: Vec<&Installment> =
            installments.iter().filter(|i| i.loan_id == loan.id).collect();

        LoanView {
            id: loan.id,
            borrower: loan.borrower.clone(),
            notes: loan.notes.clone(),
            status: derive_loan_status(loan, installments, as_of),
            as_of,
            terms: TermsView {
                principal: loan.principal,
                annual_rate_percent: loan.annual_rate_percent,
                interest_type: loan.interest_type,
                frequency: loan.frequency,
                number_of_installments: loan.number_of_installments,
                start_date: loan.start_date,
                end_date: loan.end_date,
            },
            totals: TotalsView {
                total_amount: own.iter().map(|i| i.total_amount).sum(),
                total_interest: own.iter().map(|i| i.interest_amount).sum(),
                total_paid: own.iter().map(|i| i.paid_amount).sum(),
                outstanding: own.iter().map(|i| i.remaining()).sum(),
                payment_count,
            },
            installments: own
                .iter()
                .map(|i| InstallmentView::from_installment(i, as_of))
                .collect(),
        }
    }

    pub fn from_account(account: &LoanAccount, as_of: NaiveDate) -> Self {
        Self::from_parts(&account.loan, &account.installments, account.payments.len(), as_of)
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::generate_schedule;
    use crate::config::LoanTerms;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_view_resolves_statuses() {
        let terms = LoanTerms::simple_monthly(Money::from_major(300), dec!(0), 3, d(2024, 1, 1));
        let loan = Loan::new(Uuid::new_v4(), "ida", &terms).unwrap();
        let mut installments = generate_schedule(loan.id, &terms).unwrap().into_installments();
        installments[0].paid_amount = Money::from_major(100);
        installments[0].paid_date = Some(d(2024, 1, 30));
        installments[2].paid_amount = Money::from_major(30);

        let view = LoanView::from_parts(&loan, &installments, 2, d(2024, 3, 5));
        assert_eq!(view.status, LoanStatus::Overdue);
        let statuses: Vec<PaymentStatus> = view.installments.iter().map(|i| i.status).collect();
        assert_eq!(
            statuses,
            vec![PaymentStatus::Paid, PaymentStatus::Overdue, PaymentStatus::Partial]
        );
        assert_eq!(view.totals.outstanding, Money::from_major(170));
        assert_eq!(view.totals.total_paid, Money::from_major(130));

        let json = view.to_json_pretty().unwrap();
        assert!(json.contains("\"paid_date\": \"30-01-2024\""));
        assert!(json.contains("\"interest_type\": \"simple\""));
    }
}
