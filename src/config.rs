use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::{Frequency, InterestType};

/// loan creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// annual rate in percent (12 for 12%)
    pub annual_rate_percent: Decimal,
    pub interest_type: InterestType,
    #[serde(with = "dates::dmy")]
    pub start_date: NaiveDate,
    pub frequency: Frequency,
    pub installments: u32,
    /// when supplied, must equal the end date derived from the other terms
    #[serde(with = "dates::dmy_option", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl LoanTerms {
    pub fn new(
        principal: Money,
        annual_rate_percent: Decimal,
        interest_type: InterestType,
        start_date: NaiveDate,
        frequency: Frequency,
        installments: u32,
    ) -> Self {
        Self {
            principal,
            annual_rate_percent,
            interest_type,
            start_date,
            frequency,
            installments,
            end_date: None,
        }
    }

    /// flat-interest monthly loan, the most common informal lending shape
    pub fn simple_monthly(
        principal: Money,
        annual_rate_percent: Decimal,
        months: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self::new(
            principal,
            annual_rate_percent,
            InterestType::Simple,
            start_date,
            Frequency::Monthly,
            months,
        )
    }

    /// amortizing monthly loan with a level payment
    pub fn amortizing_monthly(
        principal: Money,
        annual_rate_percent: Decimal,
        months: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self::new(
            principal,
            annual_rate_percent,
            InterestType::Compound,
            start_date,
            Frequency::Monthly,
            months,
        )
    }

    /// short-term weekly loan with flat interest
    pub fn simple_weekly(
        principal: Money,
        annual_rate_percent: Decimal,
        weeks: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self::new(
            principal,
            annual_rate_percent,
            InterestType::Simple,
            start_date,
            Frequency::Weekly,
            weeks,
        )
    }

    /// attach an expected end date to be checked against the derived one
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn rate(&self) -> Rate {
        Rate::from_percent(self.annual_rate_percent)
    }

    /// end date implied by start, frequency and installment count
    pub fn derived_end_date(&self) -> Result<NaiveDate> {
        dates::add_period(self.start_date, self.frequency, self.installments)
    }

    /// reject invalid terms, returning the derived end date
    pub fn validate(&self) -> Result<NaiveDate> {
        if !self.principal.is_positive() {
            return Err(LedgerError::terms(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(LedgerError::terms(format!(
                "interest rate must not be negative, got {}%",
                self.annual_rate_percent
            )));
        }
        if self.installments < 1 {
            return Err(LedgerError::terms("at least one installment is required"));
        }

        let derived = self.derived_end_date()?;
        if let Some(expected) = self.end_date {
            if expected != derived {
                return Err(LedgerError::terms(format!(
                    "end date {} does not match {} derived from {} {} installments",
                    dates::format_date(expected),
                    dates::format_date(derived),
                    self.installments,
                    self.frequency.label()
                )));
            }
        }

        Ok(derived)
    }
}

/// windows used by the read-side projections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// unpaid installments due within this many days of the as-of date are "upcoming"
    pub upcoming_window_days: u32,
    /// rental agreements ending within this many days are "expiring"
    pub expiring_agreement_window_days: u32,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            upcoming_window_days: 7,
            expiring_agreement_window_days: 30,
        }
    }
}

impl StatisticsConfig {
    const MAX_WINDOW_DAYS: u32 = 3_660;

    /// load from a JSON document, missing fields fall back to defaults
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: StatisticsConfig =
            serde_json::from_str(raw).map_err(|e| LedgerError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, days) in [
            ("upcoming_window_days", self.upcoming_window_days),
            ("expiring_agreement_window_days", self.expiring_agreement_window_days),
        ] {
            if days > Self::MAX_WINDOW_DAYS {
                return Err(LedgerError::InvalidConfiguration {
                    message: format!(
                        "{} must be at most {}, got {}",
                        name,
                        Self::MAX_WINDOW_DAYS,
                        days
                    ),
                });
            }
        }
        Ok(())
    }
}
