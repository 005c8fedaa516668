//! Read-side projections over loan and rental collections. Nothing here mutates its
//! inputs; every figure is derived from the collections and the `as_of` date passed in.

pub mod dashboard;
pub mod rental;
pub mod reports;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::StatisticsConfig;
use crate::errors::Result;
use crate::loan::{Installment, Loan};
use crate::payments::Payment;
use crate::rental::{Agreement, MaintenanceRecord, Property, RentPayment};

pub use dashboard::{loan_dashboard, DashboardStats, InstallmentDue};
pub use rental::{
    rental_dashboard, rental_monthly_report, ExpiringAgreement, MonthlyRentalSummary,
    RentalDashboard,
};
pub use reports::{loan_monthly_report, MonthlyLoanSummary};

/// statistics calculator bound to a set of windows
#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator {
    config: StatisticsConfig,
}

impl StatisticsAggregator {
    pub fn new(config: StatisticsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StatisticsConfig {
        &self.config
    }

    pub fn dashboard(
        &self,
        loans: &[Loan],
        installments: &[Installment],
        payments: &[Payment],
        as_of: NaiveDate,
    ) -> DashboardStats {
        let stats = loan_dashboard(&self.config, loans, installments, payments, as_of);
        debug!(
            loans = loans.len(),
            upcoming = stats.upcoming_payments.len(),
            overdue = stats.overdue_installments.len(),
            outstanding = %stats.total_outstanding,
            "loan dashboard computed"
        );
        stats
    }

    pub fn monthly_report(
        &self,
        installments: &[Installment],
        payments: &[Payment],
    ) -> Vec<MonthlyLoanSummary> {
        loan_monthly_report(installments, payments)
    }

    pub fn rental_dashboard(
        &self,
        properties: &[Property],
        agreements: &[Agreement],
        rent_payments: &[RentPayment],
        maintenance: &[MaintenanceRecord],
        as_of: NaiveDate,
    ) -> RentalDashboard {
        let dash = rental_dashboard(
            &self.config,
            properties,
            agreements,
            rent_payments,
            maintenance,
            as_of,
        );
        debug!(
            properties = dash.property_count,
            occupied = dash.occupied,
            pending = %dash.rent_pending,
            "rental dashboard computed"
        );
        dash
    }

    pub fn rental_monthly_report(
        &self,
        rent_payments: &[RentPayment],
        maintenance: &[MaintenanceRecord],
    ) -> Vec<MonthlyRentalSummary> {
        rental_monthly_report(rent_payments, maintenance)
    }
}

/// loan dashboard with the default windows
pub fn compute_dashboard_stats(
    loans: &[Loan],
    installments: &[Installment],
    payments: &[Payment],
    as_of: NaiveDate,
) -> DashboardStats {
    StatisticsAggregator::default().dashboard(loans, installments, payments, as_of)
}
