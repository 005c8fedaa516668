use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::LoanStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("invalid loan terms: {message}")]
    InvalidLoanTerms {
        message: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("loan {loan_id} does not accept payments: current status is {status:?}")]
    LoanClosed {
        loan_id: Uuid,
        status: LoanStatus,
    },

    #[error("installment {sequence} not found on loan {loan_id}")]
    InstallmentNotFound {
        loan_id: Uuid,
        sequence: u32,
    },

    #[error("invalid date {input:?}: {reason}")]
    Parse {
        input: String,
        reason: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid state: current {current}, expected {expected}")]
    InvalidState {
        current: String,
        expected: String,
    },
}

impl LedgerError {
    pub(crate) fn terms(message: impl Into<String>) -> Self {
        LedgerError::InvalidLoanTerms {
            message: message.into(),
        }
    }

    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        LedgerError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// true for every rejection of a payment request
    pub fn is_invalid_payment(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidPaymentAmount { .. }
                | LedgerError::LoanClosed { .. }
                | LedgerError::InstallmentNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
