pub mod carry_forward;
pub mod ledger;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::loan::{derive_loan_status, Installment, Loan};
use crate::types::{LoanId, PaymentId, PaymentMethod};

pub use carry_forward::{plan_allocations, split_allocation, AllocationPlan};
pub use ledger::{merge_installments, record_payment, PaymentLedger};

/// payment request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub payment_id: PaymentId,
    pub loan_id: LoanId,
    /// installment the payment is made against
    pub installment_sequence: u32,
    pub amount: Money,
    #[serde(with = "dates::dmy")]
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl PaymentRequest {
    /// new request with a fresh payment id
    pub fn new(
        loan_id: LoanId,
        installment_sequence: u32,
        amount: Money,
        payment_date: NaiveDate,
        method: PaymentMethod,
    ) -> Self {
        Self {
            payment_id: Uuid::new_v4(),
            loan_id,
            installment_sequence,
            amount,
            payment_date,
            method,
            reference: None,
        }
    }

    /// use a caller-chosen payment id, e.g. when replaying stored requests
    pub fn with_id(mut self, payment_id: PaymentId) -> Self {
        self.payment_id = payment_id;
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// reject non-positive amounts, unknown targets and closed loans
    pub fn validate(&self, loan: &Loan, installments: &[Installment]) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(LedgerError::InvalidPaymentAmount {
                amount: self.amount,
            });
        }

        let target_exists = installments
            .iter()
            .any(|i| i.loan_id == loan.id && i.sequence == self.installment_sequence);
        if self.loan_id != loan.id || !target_exists {
            return Err(LedgerError::InstallmentNotFound {
                loan_id: self.loan_id,
                sequence: self.installment_sequence,
            });
        }

        let status = derive_loan_status(loan, installments, self.payment_date);
        if status.is_closed() {
            return Err(LedgerError::LoanClosed {
                loan_id: loan.id,
                status,
            });
        }

        Ok(())
    }
}

/// share of a payment applied to one installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub sequence: u32,
    pub amount: Money,
    pub principal: Money,
    pub interest: Money,
}

/// recorded payment, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub loan_id: LoanId,
    /// the installment the payment was made against
    pub installment_sequence: u32,
    /// amount tendered, including any discarded excess
    pub amount: Money,
    pub principal_amount: Money,
    pub interest_amount: Money,
    #[serde(with = "dates::dmy")]
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub allocations: Vec<Allocation>,
}

impl Payment {
    /// amount that actually reached installments
    pub fn applied_amount(&self) -> Money {
        self.principal_amount + self.interest_amount
    }
}

/// result of recording a payment
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOutcome {
    /// installments whose paid amount changed, in allocation order
    pub updated_installments: Vec<Installment>,
    pub payment: Payment,
    /// excess left after every later installment was settled
    pub discarded: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoanTerms;
    use crate::amortization::generate_schedule;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn fixture() -> (Loan, Vec<Installment>) {
        let terms = LoanTerms::simple_monthly(Money::from_major(200), dec!(0), 2, d(2024, 1, 1));
        let loan = Loan::new(Uuid::new_v4(), "cy", &terms).unwrap();
        let installments = generate_schedule(loan.id, &terms).unwrap().into_installments();
        (loan, installments)
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let (loan, installments) = fixture();
        for amount in [Money::ZERO, Money::from_major(-10)] {
            let request =
                PaymentRequest::new(loan.id, 1, amount, d(2024, 1, 5), PaymentMethod::Cash);
            let err = request.validate(&loan, &installments).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidPaymentAmount { .. }));
            assert!(err.is_invalid_payment());
        }
    }

    #[test]
    fn test_sub_cent_amount_from_json_is_rejected() {
        let (loan, installments) = fixture();
        let raw = serde_json::json!({
            "payment_id": Uuid::nil(),
            "loan_id": loan.id,
            "installment_sequence": 1,
            "amount": "0.001",
            "payment_date": "05-01-2024",
            "method": "cash"
        });
        let request: PaymentRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(request.amount, Money::ZERO);
        assert!(matches!(
            request.validate(&loan, &installments),
            Err(LedgerError::InvalidPaymentAmount { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_installment() {
        let (loan, installments) = fixture();
        let ten = Money::from_major(10);
        let request = PaymentRequest::new(loan.id, 3, ten, d(2024, 1, 5), PaymentMethod::Cash);
        assert!(matches!(
            request.validate(&loan, &installments),
            Err(LedgerError::InstallmentNotFound { sequence: 3, .. })
        ));

        let foreign =
            PaymentRequest::new(Uuid::new_v4(), 1, ten, d(2024, 1, 5), PaymentMethod::Cash);
        assert!(foreign.validate(&loan, &installments).is_err());
    }

    #[test]
    fn test_rejects_closed_loans() {
        let (mut loan, mut installments) = fixture();
        let ten = Money::from_major(10);
        let request = PaymentRequest::new(loan.id, 1, ten, d(2024, 1, 5), PaymentMethod::Card);

        loan.defaulted = true;
        assert!(matches!(
            request.validate(&loan, &installments),
            Err(LedgerError::LoanClosed { .. })
        ));

        loan.defaulted = false;
        for installment in installments.iter_mut() {
            installment.paid_amount = installment.total_amount;
        }
        assert!(matches!(
            request.validate(&loan, &installments),
            Err(LedgerError::LoanClosed { .. })
        ));
    }

    #[test]
    fn test_request_json() {
        let fifty = Money::from_major(50);
        let request =
            PaymentRequest::new(Uuid::nil(), 2, fifty, d(2024, 3, 2), PaymentMethod::Mobile)
                .with_id(Uuid::nil())
                .with_reference("txn-88");
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"payment_date\":\"02-03-2024\""));
        assert!(json.contains("\"method\":\"mobile\""));
        let back: PaymentRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
