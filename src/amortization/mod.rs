pub mod compound;
pub mod simple;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::LoanTerms;
use crate::dates;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::loan::Installment;
use crate::types::{Frequency, InterestType, LoanId};

pub use compound::{compound_splits, level_payment};
pub use simple::{simple_splits, spread_evenly, total_simple_interest};

/// principal and interest owed in one period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSplit {
    pub principal: Money,
    pub interest: Money,
}

/// generated installment schedule for a loan
#[derive(Debug, Clone, PartialEq)]
pub struct AmortizationSchedule {
    pub loan_id: LoanId,
    pub principal: Money,
    pub interest_rate: Rate,
    pub interest_type: InterestType,
    pub frequency: Frequency,
    pub end_date: NaiveDate,
    pub installments: Vec<Installment>,
    /// level payment of an amortizing loan, `None` for flat interest
    pub level_payment: Option<Money>,
    pub total_interest: Money,
    pub total_amount: Money,
}

impl AmortizationSchedule {
    /// validate terms and generate the full schedule
    pub fn generate(loan_id: LoanId, terms: &LoanTerms) -> Result<Self> {
        let end_date = terms.validate()?;
        let engine = AmortizationEngine::new(terms.interest_type);
        let (level_payment, splits) = engine.calculate_splits(
            terms.principal,
            terms.rate(),
            terms.frequency,
            terms.installments,
        );

        let mut installments = Vec::with_capacity(splits.len());
        for (index, split) in splits.into_iter().enumerate() {
            let sequence = index as u32 + 1;
            let due_date = dates::add_period(terms.start_date, terms.frequency, sequence)?;
            installments.push(Installment::new(
                loan_id,
                sequence,
                due_date,
                split.principal,
                split.interest,
            ));
        }

        let total_interest: Money = installments.iter().map(|i| i.interest_amount).sum();
        let total_amount: Money = installments.iter().map(|i| i.total_amount).sum();

        debug!(
            %loan_id,
            installments = installments.len(),
            interest_type = ?terms.interest_type,
            %total_interest,
            "generated installment schedule"
        );

        Ok(Self {
            loan_id,
            principal: terms.principal,
            interest_rate: terms.rate(),
            interest_type: terms.interest_type,
            frequency: terms.frequency,
            end_date,
            installments,
            level_payment,
            total_interest,
            total_amount,
        })
    }

    /// installment by 1-based sequence number
    pub fn get_installment(&self, sequence: u32) -> Option<&Installment> {
        sequence
            .checked_sub(1)
            .and_then(|index| self.installments.get(index as usize))
    }

    /// principal still outstanding once installment `sequence` is paid as scheduled
    pub fn balance_after(&self, sequence: u32) -> Money {
        let repaid: Money = self
            .installments
            .iter()
            .take(sequence as usize)
            .map(|i| i.principal_amount)
            .sum();
        self.principal - repaid
    }

    pub fn into_installments(self) -> Vec<Installment> {
        self.installments
    }
}

/// schedule generator for one interest type
pub struct AmortizationEngine {
    interest_type: InterestType,
}

impl AmortizationEngine {
    pub fn new(interest_type: InterestType) -> Self {
        Self { interest_type }
    }

    /// per-period principal/interest split, plus the level payment for amortizing loans
    pub fn calculate_splits(
        &self,
        principal: Money,
        annual_rate: Rate,
        frequency: Frequency,
        periods: u32,
    ) -> (Option<Money>, Vec<PeriodSplit>) {
        match self.interest_type {
            InterestType::Simple => {
                (None, simple_splits(principal, annual_rate, frequency, periods))
            }
            InterestType::Compound => {
                let (payment, splits) = compound_splits(principal, annual_rate, frequency, periods);
                (Some(payment), splits)
            }
        }
    }
}

/// generate the installment schedule for `terms` under `loan_id`
pub fn generate_schedule(loan_id: LoanId, terms: &LoanTerms) -> Result<AmortizationSchedule> {
    AmortizationSchedule::generate(loan_id, terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn assert_totals(schedule: &AmortizationSchedule) {
        let principal: Money = schedule.installments.iter().map(|i| i.principal_amount).sum();
        assert_eq!(principal, schedule.principal);

        let total: Money = schedule.installments.iter().map(|i| i.total_amount).sum();
        assert_eq!(total, schedule.principal + schedule.total_interest);

        for installment in &schedule.installments {
            assert!(!installment.principal_amount.is_negative());
            assert!(!installment.interest_amount.is_negative());
            assert_eq!(installment.paid_amount, Money::ZERO);
        }
    }

    #[test]
    fn test_simple_monthly_example() {
        let terms =
            LoanTerms::simple_monthly(Money::from_major(1_200), dec!(12), 12, d(2024, 1, 1));
        let schedule = generate_schedule(Uuid::new_v4(), &terms).unwrap();

        assert_eq!(schedule.installments.len(), 12);
        assert_eq!(schedule.total_interest, Money::from_major(144));
        assert_eq!(schedule.level_payment, None);
        for (index, installment) in schedule.installments.iter().enumerate() {
            assert_eq!(installment.sequence, index as u32 + 1);
            assert_eq!(
                installment.due_date,
                dates::add_period(d(2024, 1, 1), Frequency::Monthly, index as u32 + 1).unwrap()
            );
            assert_eq!(installment.principal_amount, Money::from_major(100));
            assert_eq!(installment.interest_amount, Money::from_major(12));
            assert_eq!(installment.total_amount, Money::from_major(112));
        }
        assert_eq!(schedule.installments[0].due_date, d(2024, 2, 1));
        assert_eq!(schedule.installments[11].due_date, d(2025, 1, 1));
        assert_eq!(schedule.end_date, d(2025, 1, 1));
        assert_totals(&schedule);
    }

    #[test]
    fn test_compound_monthly_example() {
        let terms =
            LoanTerms::amortizing_monthly(Money::from_major(1_000), dec!(10), 12, d(2024, 1, 1));
        let schedule = generate_schedule(Uuid::new_v4(), &terms).unwrap();

        assert_eq!(schedule.level_payment, Some(Money::from_decimal(dec!(87.92))));
        let first = schedule.get_installment(1).unwrap();
        assert_eq!(first.interest_amount, Money::from_decimal(dec!(8.33)));
        assert_eq!(first.principal_amount, Money::from_decimal(dec!(79.59)));

        let mut previous = schedule.principal;
        for sequence in 1..=12 {
            let balance = schedule.balance_after(sequence);
            assert!(balance < previous);
            previous = balance;
        }
        assert_eq!(schedule.balance_after(12), Money::ZERO);
        assert_eq!(schedule.total_interest, Money::from_decimal(dec!(54.99)));
        assert_totals(&schedule);
    }

    #[test]
    fn test_month_end_due_dates() {
        let terms = LoanTerms::simple_monthly(Money::from_major(300), dec!(0), 3, d(2024, 1, 31));
        let schedule = generate_schedule(Uuid::new_v4(), &terms).unwrap();
        let due: Vec<NaiveDate> = schedule.installments.iter().map(|i| i.due_date).collect();
        assert_eq!(due, vec![d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30)]);
    }

    #[test]
    fn test_weekly_interest_remainder_on_last() {
        let terms = LoanTerms::simple_weekly(Money::from_major(1_000), dec!(10), 10, d(2024, 1, 1));
        let schedule = generate_schedule(Uuid::new_v4(), &terms).unwrap();
        assert_eq!(schedule.total_interest, Money::from_decimal(dec!(19.23)));
        assert_eq!(schedule.installments[0].interest_amount, Money::from_decimal(dec!(1.92)));
        assert_eq!(schedule.installments[9].interest_amount, Money::from_decimal(dec!(1.95)));
        assert_eq!(schedule.installments[9].due_date, d(2024, 3, 11));
        assert_totals(&schedule);
    }

    #[test]
    fn test_totals_hold_across_shapes() {
        let shapes = [
            (InterestType::Simple, Frequency::Biweekly, 7u32, dec!(999.99), dec!(18.5)),
            (InterestType::Compound, Frequency::Quarterly, 9, dec!(12345.67), dec!(7.25)),
            (InterestType::Compound, Frequency::Weekly, 104, dec!(5000), dec!(36)),
            (InterestType::Simple, Frequency::Yearly, 1, dec!(0.01), dec!(3)),
            (InterestType::Compound, Frequency::Monthly, 360, dec!(250000), dec!(6.5)),
        ];
        for (interest_type, frequency, n, principal, rate) in shapes {
            let terms = LoanTerms::new(
                Money::from_decimal(principal),
                rate,
                interest_type,
                d(2024, 2, 29),
                frequency,
                n,
            );
            let schedule = generate_schedule(Uuid::new_v4(), &terms).unwrap();
            assert_eq!(schedule.installments.len(), n as usize);
            assert_totals(&schedule);

            if interest_type == InterestType::Compound {
                let mut previous = schedule.principal;
                for sequence in 1..=n {
                    let balance = schedule.balance_after(sequence);
                    assert!(balance < previous, "balance rose at {} of {}", sequence, n);
                    previous = balance;
                }
                assert_eq!(previous, Money::ZERO);
            }
        }
    }

    #[test]
    fn test_schedule_from_json_terms_stays_in_cents() {
        let raw = r#"{
            "principal": "1000.005",
            "annual_rate_percent": "0",
            "interest_type": "simple",
            "start_date": "01-01-2024",
            "frequency": "monthly",
            "installments": 3
        }"#;
        let terms: LoanTerms = serde_json::from_str(raw).unwrap();
        let schedule = generate_schedule(Uuid::new_v4(), &terms).unwrap();

        let principals: Vec<Money> =
            schedule.installments.iter().map(|i| i.principal_amount).collect();
        assert_eq!(
            principals,
            vec![
                Money::from_decimal(dec!(333.34)),
                Money::from_decimal(dec!(333.34)),
                Money::from_decimal(dec!(333.33)),
            ]
        );
        for installment in &schedule.installments {
            assert!(installment.total_amount.as_decimal().scale() <= 2);
        }
        assert_totals(&schedule);
    }

    #[test]
    fn test_tiny_principal_over_long_term() {
        let terms = LoanTerms::new(
            Money::from_major(2),
            Decimal::ZERO,
            InterestType::Compound,
            d(2024, 1, 1),
            Frequency::Monthly,
            300,
        );
        let schedule = generate_schedule(Uuid::new_v4(), &terms).unwrap();
        assert_totals(&schedule);
    }

    #[test]
    fn test_rejects_invalid_terms() {
        let bad = LoanTerms::simple_monthly(Money::from_major(-5), dec!(12), 12, d(2024, 1, 1));
        assert!(matches!(
            generate_schedule(Uuid::new_v4(), &bad),
            Err(LedgerError::InvalidLoanTerms { .. })
        ));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let id = Uuid::new_v4();
        let terms =
            LoanTerms::amortizing_monthly(Money::from_major(7_500), dec!(9.9), 18, d(2024, 5, 31));
        let first = generate_schedule(id, &terms).unwrap();
        let second = generate_schedule(id, &terms).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.installments).unwrap(),
            serde_json::to_string(&second.installments).unwrap()
        );
    }
}
