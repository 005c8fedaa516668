use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::loan::Installment;
use crate::types::LoanId;

use super::Allocation;

/// where a payment lands: (index into the installment slice, amount) pairs, plus
/// whatever could not be placed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    pub steps: Vec<(usize, Money)>,
    pub excess: Money,
}

impl AllocationPlan {
    pub fn allocated(&self) -> Money {
        self.steps.iter().map(|(_, amount)| *amount).sum()
    }
}

/// plan how `amount` is spread over a loan's installments.
///
/// The target installment is filled first. Anything beyond its remaining due moves
/// to the next unpaid installments in (due date, sequence) order; installments due
/// before the target are never touched. What is left once every later installment
/// is settled becomes `excess`.
pub fn plan_allocations(
    installments: &[Installment],
    loan_id: LoanId,
    target_sequence: u32,
    amount: Money,
) -> Result<AllocationPlan> {
    let mut order: Vec<usize> = installments
        .iter()
        .enumerate()
        .filter(|(_, i)| i.loan_id == loan_id)
        .map(|(index, _)| index)
        .collect();
    order.sort_by_key(|&index| (installments[index].due_date, installments[index].sequence));

    let start = order
        .iter()
        .position(|&index| installments[index].sequence == target_sequence)
        .ok_or(LedgerError::InstallmentNotFound {
            loan_id,
            sequence: target_sequence,
        })?;

    let mut remaining = amount;
    let mut steps = Vec::new();
    for &index in &order[start..] {
        if !remaining.is_positive() {
            break;
        }

        let due = installments[index].remaining();
        if due.is_zero() {
            continue;
        }

        let applied = remaining.min(due);
        steps.push((index, applied));
        remaining -= applied;
    }

    Ok(AllocationPlan {
        steps,
        excess: remaining.max(Money::ZERO),
    })
}

/// principal/interest split of `amount` paid towards `installment`.
///
/// The interest portion is the growth of the installment's cumulative interest
/// share, so the allocations of a settled installment add up to exactly its
/// principal and interest however many payments it took.
pub fn split_allocation(installment: &Installment, amount: Money) -> Allocation {
    let before = installment.interest_paid();
    let after = installment.interest_share(installment.paid_amount + amount);
    let interest = after - before;

    Allocation {
        sequence: installment.sequence,
        amount,
        principal: amount - interest,
        interest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rows(loan_id: LoanId) -> Vec<Installment> {
        (1..=3)
            .map(|n| {
                Installment::new(
                    loan_id,
                    n,
                    d(2024, n + 1, 1),
                    Money::from_major(100),
                    Money::from_major(12),
                )
            })
            .collect()
    }

    #[test]
    fn test_exact_payment_stays_on_target() {
        let loan_id = Uuid::new_v4();
        let rows = rows(loan_id);
        let plan = plan_allocations(&rows, loan_id, 2, Money::from_major(112)).unwrap();
        assert_eq!(plan.steps, vec![(1, Money::from_major(112))]);
        assert_eq!(plan.excess, Money::ZERO);
    }

    #[test]
    fn test_excess_moves_forward_only() {
        let loan_id = Uuid::new_v4();
        let rows = rows(loan_id);
        let plan = plan_allocations(&rows, loan_id, 2, Money::from_major(150)).unwrap();
        assert_eq!(
            plan.steps,
            vec![(1, Money::from_major(112)), (2, Money::from_major(38))]
        );
        assert_eq!(plan.allocated(), Money::from_major(150));
    }

    #[test]
    fn test_excess_past_last_installment() {
        let loan_id = Uuid::new_v4();
        let rows = rows(loan_id);
        let plan = plan_allocations(&rows, loan_id, 3, Money::from_major(200)).unwrap();
        assert_eq!(plan.steps, vec![(2, Money::from_major(112))]);
        assert_eq!(plan.excess, Money::from_major(88));
    }

    #[test]
    fn test_skips_paid_and_foreign_rows() {
        let loan_id = Uuid::new_v4();
        let mut rows = rows(loan_id);
        rows[1].paid_amount = Money::from_major(112);
        // another loan's row interleaved by due date must be ignored
        rows.insert(
            1,
            Installment::new(Uuid::new_v4(), 2, d(2024, 2, 15), Money::from_major(50), Money::ZERO),
        );

        let plan = plan_allocations(&rows, loan_id, 1, Money::from_major(130)).unwrap();
        assert_eq!(
            plan.steps,
            vec![(0, Money::from_major(112)), (3, Money::from_major(18))]
        );
    }

    #[test]
    fn test_unknown_target() {
        let loan_id = Uuid::new_v4();
        assert!(plan_allocations(&rows(loan_id), loan_id, 9, Money::from_major(1)).is_err());
    }

    #[test]
    fn test_split_follows_installment_ratio() {
        let row = &rows(Uuid::new_v4())[0];
        let full = split_allocation(row, Money::from_major(112));
        assert_eq!(full.principal, Money::from_major(100));
        assert_eq!(full.interest, Money::from_major(12));

        let part = split_allocation(row, Money::from_major(50));
        assert_eq!(part.principal, Money::from_decimal(dec!(44.64)));
        assert_eq!(part.interest, Money::from_decimal(dec!(5.36)));
    }

    #[test]
    fn test_split_settles_remaining_parts() {
        let mut row = rows(Uuid::new_v4())[0].clone();
        row.paid_amount = Money::from_major(50);

        // 5.36 of interest already received, so the rest is 6.64 + 55.36
        let rest = split_allocation(&row, Money::from_major(62));
        assert_eq!(rest.interest, Money::from_decimal(dec!(6.64)));
        assert_eq!(rest.principal, Money::from_decimal(dec!(55.36)));
    }

    #[test]
    fn test_many_small_payments_split_exactly() {
        let mut row = rows(Uuid::new_v4())[0].clone();
        let step = Money::from_decimal(dec!(0.50));
        let mut principal = Money::ZERO;
        let mut interest = Money::ZERO;

        while !row.is_paid() {
            let allocation = split_allocation(&row, step.min(row.remaining()));
            assert!(!allocation.principal.is_negative());
            assert!(!allocation.interest.is_negative());
            principal += allocation.principal;
            interest += allocation.interest;
            row.paid_amount += allocation.amount;
        }

        assert_eq!(principal, row.principal_amount);
        assert_eq!(interest, row.interest_amount);
    }
}
