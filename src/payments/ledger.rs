use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::loan::{derive_loan_status, Installment, Loan};

use super::{plan_allocations, split_allocation, Payment, PaymentOutcome, PaymentRequest};

/// applies payments to installment schedules
#[derive(Debug, Clone, Default)]
pub struct PaymentLedger;

impl PaymentLedger {
    pub fn new() -> Self {
        Self
    }

    /// record `request` against the loan's installments.
    ///
    /// Nothing is mutated in place: the outcome carries copies of the installments
    /// that changed, which the caller writes back (see [`merge_installments`]).
    pub fn record_payment(
        &self,
        loan: &Loan,
        installments: &[Installment],
        request: &PaymentRequest,
        events: &mut EventStore,
    ) -> Result<PaymentOutcome> {
        request.validate(loan, installments)?;

        let plan = plan_allocations(
            installments,
            loan.id,
            request.installment_sequence,
            request.amount,
        )?;

        let mut updated = Vec::with_capacity(plan.steps.len());
        let mut allocations = Vec::with_capacity(plan.steps.len());

        for (index, amount) in plan.steps.iter().copied() {
            let current = &installments[index];
            let allocation = split_allocation(current, amount);

            let mut next = current.clone();
            next.paid_amount += amount;
            if next.is_paid() {
                next.paid_date = Some(request.payment_date);
                events.emit(Event::InstallmentSettled {
                    loan_id: loan.id,
                    sequence: next.sequence,
                    paid_date: request.payment_date,
                });
            }

            if next.sequence != request.installment_sequence {
                events.emit(Event::OverpaymentCarried {
                    loan_id: loan.id,
                    from_sequence: request.installment_sequence,
                    to_sequence: next.sequence,
                    amount,
                });
            }

            debug!(
                loan_id = %loan.id,
                sequence = next.sequence,
                %amount,
                paid = %next.paid_amount,
                total = %next.total_amount,
                "allocated payment"
            );

            allocations.push(allocation);
            updated.push(next);
        }

        if plan.excess.is_positive() {
            warn!(
                loan_id = %loan.id,
                payment_id = %request.payment_id,
                excess = %plan.excess,
                "payment exceeds everything owed from the target installment on, discarding excess"
            );
            events.emit(Event::ExcessDiscarded {
                loan_id: loan.id,
                payment_id: request.payment_id,
                amount: plan.excess,
            });
        }

        let payment = Payment {
            id: request.payment_id,
            loan_id: loan.id,
            installment_sequence: request.installment_sequence,
            amount: request.amount,
            principal_amount: allocations.iter().map(|a| a.principal).sum(),
            interest_amount: allocations.iter().map(|a| a.interest).sum(),
            payment_date: request.payment_date,
            method: request.method,
            reference: request.reference.clone(),
            allocations,
        };

        events.emit(Event::PaymentRecorded {
            loan_id: loan.id,
            payment_id: payment.id,
            amount: payment.amount,
            applied_to_principal: payment.principal_amount,
            applied_to_interest: payment.interest_amount,
            payment_date: payment.payment_date,
        });

        let old_status = derive_loan_status(loan, installments, request.payment_date);
        let mut after = installments.to_vec();
        merge_installments(&mut after, &updated);
        let new_status = derive_loan_status(loan, &after, request.payment_date);
        if old_status != new_status {
            info!(loan_id = %loan.id, ?old_status, ?new_status, "loan status changed");
            events.emit(Event::LoanStatusChanged {
                loan_id: loan.id,
                old_status,
                new_status,
                as_of: request.payment_date,
            });
        }

        info!(
            loan_id = %loan.id,
            payment_id = %payment.id,
            amount = %payment.amount,
            installments = updated.len(),
            "payment recorded"
        );

        Ok(PaymentOutcome {
            updated_installments: updated,
            payment,
            discarded: plan.excess,
        })
    }
}

/// write updated installments back over the matching (loan, sequence) rows
pub fn merge_installments(installments: &mut [Installment], updated: &[Installment]) {
    for change in updated {
        if let Some(row) = installments
            .iter_mut()
            .find(|i| i.loan_id == change.loan_id && i.sequence == change.sequence)
        {
            *row = change.clone();
        }
    }
}

/// record a payment without collecting events
pub fn record_payment(
    loan: &Loan,
    installments: &[Installment],
    request: &PaymentRequest,
) -> Result<PaymentOutcome> {
    PaymentLedger::new().record_payment(loan, installments, request, &mut EventStore::new())
}
