pub mod account;
pub mod amortization;
pub mod config;
pub mod dates;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod loan;
pub mod payments;
pub mod rental;
pub mod serialization;
pub mod statistics;
pub mod types;

// re-export key types
pub use account::LoanAccount;
pub use amortization::{generate_schedule, AmortizationEngine, AmortizationSchedule, PeriodSplit};
pub use config::{LoanTerms, StatisticsConfig};
pub use dates::{format_date, parse_date, YearMonth};
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use loan::{derive_installment_status, derive_loan_status, Installment, Loan};
pub use payments::{
    record_payment, Allocation, Payment, PaymentLedger, PaymentOutcome, PaymentRequest,
};
pub use rental::{Agreement, MaintenanceRecord, MaintenanceStatus, Property, RentPayment};
pub use serialization::{InstallmentView, LoanView};
pub use statistics::{
    compute_dashboard_stats, DashboardStats, InstallmentDue, MonthlyLoanSummary,
    MonthlyRentalSummary, RentalDashboard, StatisticsAggregator,
};
pub use types::{
    AgreementId, Frequency, InterestType, LoanId, LoanStatus, PaymentId, PaymentMethod,
    PaymentStatus, PropertyId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
