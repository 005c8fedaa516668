use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LoanTerms;
use crate::dates;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::types::{Frequency, InterestType, LoanId, LoanStatus, PaymentStatus};

/// a loan record as stored by the caller
///
/// There is no status field. Status is recomputed from the installments with
/// [`derive_loan_status`]; the only lender-controlled state is `defaulted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub borrower: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub principal: Money,
    pub annual_rate_percent: Decimal,
    pub interest_type: InterestType,
    #[serde(with = "dates::dmy")]
    pub start_date: NaiveDate,
    #[serde(with = "dates::dmy")]
    pub end_date: NaiveDate,
    pub frequency: Frequency,
    pub number_of_installments: u32,
    #[serde(default)]
    pub defaulted: bool,
}

impl Loan {
    /// build a loan record from validated terms
    pub fn new(id: LoanId, borrower: impl Into<String>, terms: &LoanTerms) -> Result<Self> {
        let end_date = terms.validate()?;
        Ok(Self {
            id,
            borrower: borrower.into(),
            notes: None,
            principal: terms.principal,
            annual_rate_percent: terms.annual_rate_percent,
            interest_type: terms.interest_type,
            start_date: terms.start_date,
            end_date,
            frequency: terms.frequency,
            number_of_installments: terms.installments,
            defaulted: false,
        })
    }

    /// terms this loan was created from
    pub fn terms(&self) -> LoanTerms {
        LoanTerms {
            principal: self.principal,
            annual_rate_percent: self.annual_rate_percent,
            interest_type: self.interest_type,
            start_date: self.start_date,
            frequency: self.frequency,
            installments: self.number_of_installments,
            end_date: Some(self.end_date),
        }
    }

    /// replace the terms in place after validating them
    pub(crate) fn apply_terms(&mut self, terms: &LoanTerms) -> Result<()> {
        let end_date = terms.validate()?;
        self.principal = terms.principal;
        self.annual_rate_percent = terms.annual_rate_percent;
        self.interest_type = terms.interest_type;
        self.start_date = terms.start_date;
        self.end_date = end_date;
        self.frequency = terms.frequency;
        self.number_of_installments = terms.installments;
        Ok(())
    }

    pub fn rate(&self) -> Rate {
        Rate::from_percent(self.annual_rate_percent)
    }

    pub fn status(&self, installments: &[Installment], as_of: NaiveDate) -> LoanStatus {
        derive_loan_status(self, installments, as_of)
    }
}

/// one scheduled slice of a loan's repayment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub loan_id: LoanId,
    /// 1-based position in the schedule
    pub sequence: u32,
    #[serde(with = "dates::dmy")]
    pub due_date: NaiveDate,
    pub principal_amount: Money,
    pub interest_amount: Money,
    pub total_amount: Money,
    pub paid_amount: Money,
    #[serde(with = "dates::dmy_option", default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
}

impl Installment {
    pub fn new(
        loan_id: LoanId,
        sequence: u32,
        due_date: NaiveDate,
        principal_amount: Money,
        interest_amount: Money,
    ) -> Self {
        Self {
            loan_id,
            sequence,
            due_date,
            principal_amount,
            interest_amount,
            total_amount: principal_amount + interest_amount,
            paid_amount: Money::ZERO,
            paid_date: None,
        }
    }

    /// amount still owed on this installment
    pub fn remaining(&self) -> Money {
        (self.total_amount - self.paid_amount).max(Money::ZERO)
    }

    pub fn is_paid(&self) -> bool {
        self.paid_amount >= self.total_amount
    }

    pub fn status(&self, as_of: NaiveDate) -> PaymentStatus {
        derive_installment_status(self, as_of)
    }

    /// interest portion of `paid` received towards this installment, in the
    /// installment's principal:interest ratio. Settled installments report exactly
    /// `interest_amount`.
    pub fn interest_share(&self, paid: Money) -> Money {
        if paid >= self.total_amount {
            self.interest_amount
        } else {
            self.interest_amount.prorate(paid, self.total_amount)
        }
    }

    /// interest received so far
    pub fn interest_paid(&self) -> Money {
        self.interest_share(self.paid_amount)
    }

    /// principal received so far
    pub fn principal_paid(&self) -> Money {
        self.paid_amount.min(self.total_amount) - self.interest_paid()
    }
}

/// installment status from paid amount, total, due date and the as-of date.
///
/// Paid and partial take precedence over the due date: a partly paid installment
/// past its due date is still `Partial`.
pub fn derive_installment_status(installment: &Installment, as_of: NaiveDate) -> PaymentStatus {
    status_from_parts(
        installment.paid_amount,
        installment.total_amount,
        installment.due_date,
        as_of,
    )
}

pub fn status_from_parts(
    paid_amount: Money,
    total_amount: Money,
    due_date: NaiveDate,
    as_of: NaiveDate,
) -> PaymentStatus {
    if paid_amount >= total_amount {
        PaymentStatus::Paid
    } else if paid_amount.is_positive() {
        PaymentStatus::Partial
    } else if as_of > due_date {
        PaymentStatus::Overdue
    } else {
        PaymentStatus::Pending
    }
}

/// loan status from its installments.
///
/// `installments` may hold other loans' rows; only this loan's are considered.
pub fn derive_loan_status(
    loan: &Loan,
    installments: &[Installment],
    as_of: NaiveDate,
) -> LoanStatus {
    if loan.defaulted {
        return LoanStatus::Defaulted;
    }

    let mut owned = installments_of(loan.id, installments).peekable();
    if owned.peek().is_none() {
        return LoanStatus::Active;
    }

    let mut all_paid = true;
    let mut any_overdue = false;
    for installment in owned {
        match derive_installment_status(installment, as_of) {
            PaymentStatus::Paid => {}
            PaymentStatus::Overdue => {
                all_paid = false;
                any_overdue = true;
            }
            PaymentStatus::Pending | PaymentStatus::Partial => all_paid = false,
        }
    }

    if all_paid {
        LoanStatus::Completed
    } else if any_overdue {
        LoanStatus::Overdue
    } else {
        LoanStatus::Active
    }
}

/// the installments belonging to `loan_id`
pub fn installments_of(
    loan_id: LoanId,
    installments: &[Installment],
) -> impl Iterator<Item = &Installment> {
    installments.iter().filter(move |i| i.loan_id == loan_id)
}
