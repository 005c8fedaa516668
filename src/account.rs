use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::info;
use uuid::Uuid;

use crate::amortization::generate_schedule;
use crate::config::LoanTerms;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::loan::{derive_loan_status, Installment, Loan};
use crate::payments::{merge_installments, Payment, PaymentLedger, PaymentOutcome, PaymentRequest};
use crate::serialization::LoanView;
use crate::types::{LoanId, LoanStatus};

/// a loan together with its schedule, payments and pending events
#[derive(Debug)]
pub struct LoanAccount {
    pub loan: Loan,
    pub installments: Vec<Installment>,
    pub payments: Vec<Payment>,
    pub events: EventStore,
}

impl LoanAccount {
    /// open a loan with a fresh id and generate its schedule
    pub fn open(borrower: impl Into<String>, terms: LoanTerms) -> Result<Self> {
        Self::open_with_id(Uuid::new_v4(), borrower, terms)
    }

    /// open with a caller-chosen id, e.g. when rebuilding from storage
    pub fn open_with_id(id: LoanId, borrower: impl Into<String>, terms: LoanTerms) -> Result<Self> {
        let loan = Loan::new(id, borrower, &terms)?;
        let schedule = generate_schedule(id, &terms)?;

        let mut events = EventStore::new();
        events.emit(Event::ScheduleGenerated {
            loan_id: id,
            installments: terms.installments,
            total_interest: schedule.total_interest,
            total_amount: schedule.total_amount,
            first_due: schedule
                .installments
                .first()
                .map_or(terms.start_date, |i| i.due_date),
        });

        info!(loan_id = %id, borrower = %loan.borrower, principal = %loan.principal, "loan opened");

        Ok(Self {
            loan,
            installments: schedule.into_installments(),
            payments: Vec::new(),
            events,
        })
    }

    pub fn id(&self) -> LoanId {
        self.loan.id
    }

    /// replace the terms and regenerate the schedule.
    ///
    /// Only allowed while no payment has been recorded; the new schedule would
    /// otherwise drop paid amounts on the floor.
    pub fn amend_terms(&mut self, terms: LoanTerms) -> Result<()> {
        if !self.payments.is_empty() {
            return Err(LedgerError::InvalidState {
                current: format!("{} payment(s) recorded", self.payments.len()),
                expected: "no recorded payments".to_string(),
            });
        }

        let schedule = generate_schedule(self.loan.id, &terms)?;
        let old_principal = self.loan.principal;
        self.loan.apply_terms(&terms)?;
        self.installments = schedule.into_installments();

        self.events.emit(Event::TermsAmended {
            loan_id: self.loan.id,
            old_principal,
            new_principal: self.loan.principal,
            installments: terms.installments,
        });

        Ok(())
    }

    /// record a payment and write the changed installments back
    pub fn record_payment(&mut self, request: PaymentRequest) -> Result<PaymentOutcome> {
        let ledger = PaymentLedger::new();
        let outcome =
            ledger.record_payment(&self.loan, &self.installments, &request, &mut self.events)?;

        merge_installments(&mut self.installments, &outcome.updated_installments);
        self.payments.push(outcome.payment.clone());

        Ok(outcome)
    }

    /// flag the loan as defaulted. A completed or already defaulted loan is rejected.
    pub fn mark_defaulted(&mut self, as_of: NaiveDate) -> Result<()> {
        let old_status = self.status(as_of);
        if old_status.is_closed() {
            return Err(LedgerError::InvalidState {
                current: format!("{:?}", old_status),
                expected: "Active or Overdue".to_string(),
            });
        }

        self.loan.defaulted = true;
        let outstanding = self.outstanding();

        self.events.emit(Event::LoanDefaulted {
            loan_id: self.loan.id,
            outstanding,
            as_of,
        });
        self.events.emit(Event::LoanStatusChanged {
            loan_id: self.loan.id,
            old_status,
            new_status: LoanStatus::Defaulted,
            as_of,
        });

        info!(loan_id = %self.loan.id, %outstanding, "loan marked as defaulted");
        Ok(())
    }

    pub fn status(&self, as_of: NaiveDate) -> LoanStatus {
        derive_loan_status(&self.loan, &self.installments, as_of)
    }

    /// status as of the provider's current date
    pub fn status_now(&self, time: &SafeTimeProvider) -> LoanStatus {
        self.status(time.now().date_naive())
    }

    /// Σ remaining over every installment
    pub fn outstanding(&self) -> Money {
        self.installments.iter().map(Installment::remaining).sum()
    }

    /// earliest unpaid installment due on or after `as_of`
    pub fn next_due(&self, as_of: NaiveDate) -> Option<&Installment> {
        self.installments
            .iter()
            .filter(|i| !i.is_paid() && i.due_date >= as_of)
            .min_by_key(|i| (i.due_date, i.sequence))
    }

    pub fn view(&self, as_of: NaiveDate) -> LoanView {
        LoanView::from_account(self, as_of)
    }

    /// pretty JSON of the account's view as of `as_of`
    pub fn to_json(&self, as_of: NaiveDate) -> std::result::Result<String, serde_json::Error> {
        self.view(as_of).to_json_pretty()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}
