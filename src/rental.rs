//! Rental bookkeeping records. These are plain data; the only logic here is the
//! date checks the statistics projections rely on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::{self, YearMonth};
use crate::decimal::Money;
use crate::types::{AgreementId, PaymentMethod, PropertyId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: address.into(),
            notes: None,
        }
    }
}

/// tenancy agreement on a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agreement {
    pub id: AgreementId,
    pub property_id: PropertyId,
    pub tenant_name: String,
    pub monthly_rent: Money,
    pub security_deposit: Money,
    #[serde(with = "dates::dmy")]
    pub start_date: NaiveDate,
    /// open-ended when absent
    #[serde(with = "dates::dmy_option", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// day of month rent falls due
    pub rent_due_day: u32,
    #[serde(default)]
    pub terminated: bool,
}

impl Agreement {
    pub fn new(
        property_id: PropertyId,
        tenant_name: impl Into<String>,
        monthly_rent: Money,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_id,
            tenant_name: tenant_name.into(),
            monthly_rent,
            security_deposit: Money::ZERO,
            start_date,
            end_date: None,
            rent_due_day: 1,
            terminated: false,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_deposit(mut self, deposit: Money) -> Self {
        self.security_deposit = deposit;
        self
    }

    /// in force on `date`: started, not ended, not terminated
    pub fn is_active(&self, date: NaiveDate) -> bool {
        !self.terminated
            && self.start_date <= date
            && self.end_date.map_or(true, |end| date <= end)
    }
}

/// rent received against an agreement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentPayment {
    pub id: Uuid,
    pub agreement_id: AgreementId,
    pub amount: Money,
    #[serde(with = "dates::dmy")]
    pub payment_date: NaiveDate,
    /// month the rent is for, which may differ from the month it was paid in
    pub period: YearMonth,
    pub method: PaymentMethod,
}

impl RentPayment {
    pub fn new(agreement_id: AgreementId, amount: Money, payment_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            agreement_id,
            amount,
            payment_date,
            period: YearMonth::of(payment_date),
            method: PaymentMethod::default(),
        }
    }

    pub fn for_period(mut self, period: YearMonth) -> Self {
        self.period = period;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Open,
    InProgress,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub property_id: PropertyId,
    pub description: String,
    pub cost: Money,
    #[serde(with = "dates::dmy")]
    pub date: NaiveDate,
    pub status: MaintenanceStatus,
}

impl MaintenanceRecord {
    pub fn new(
        property_id: PropertyId,
        description: impl Into<String>,
        cost: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_id,
            description: description.into(),
            cost,
            date,
            status: MaintenanceStatus::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status != MaintenanceStatus::Done
    }
}
