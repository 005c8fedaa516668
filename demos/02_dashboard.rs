/// dashboard - loan and rental statistics over a small portfolio
use lending_tracker_rs::chrono::NaiveDate;
use lending_tracker_rs::{
    format_date, Agreement, Decimal, LoanAccount, LoanTerms, MaintenanceRecord, Money,
    PaymentMethod, PaymentRequest, Property, RentPayment, StatisticsAggregator, StatisticsConfig,
};

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    Ok(NaiveDate::from_ymd_opt(y, m, d).ok_or("bad date")?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = StatisticsConfig::from_json(r#"{ "upcoming_window_days": 14 }"#)?;
    let stats = StatisticsAggregator::new(config)?;

    let casey = LoanTerms::simple_monthly(
        Money::from_major(1_200),
        Decimal::from(12),
        12,
        date(2024, 1, 1)?,
    );
    let drew = LoanTerms::amortizing_monthly(
        Money::from_major(5_000),
        Decimal::from(8),
        24,
        date(2024, 1, 20)?,
    );
    let emery =
        LoanTerms::simple_weekly(Money::from_major(500), Decimal::from(5), 10, date(2024, 2, 1)?);
    let mut accounts = vec![
        LoanAccount::open("casey", casey)?,
        LoanAccount::open("drew", drew)?,
        LoanAccount::open("emery", emery)?,
    ];

    let first = accounts[0].id();
    accounts[0].record_payment(PaymentRequest::new(
        first,
        1,
        Money::from_major(112),
        date(2024, 2, 1)?,
        PaymentMethod::Cash,
    ))?;
    let second = accounts[1].id();
    accounts[1].record_payment(PaymentRequest::new(
        second,
        1,
        Money::from_major(150),
        date(2024, 2, 18)?,
        PaymentMethod::Mobile,
    ))?;

    let loans: Vec<_> = accounts.iter().map(|a| a.loan.clone()).collect();
    let installments: Vec<_> =
        accounts.iter().flat_map(|a| a.installments.iter().cloned()).collect();
    let payments: Vec<_> = accounts.iter().flat_map(|a| a.payments.iter().cloned()).collect();

    let as_of = date(2024, 2, 25)?;
    let dash = stats.dashboard(&loans, &installments, &payments, as_of);
    println!("=== loans as of {} ===", format_date(as_of));
    println!(
        "active {} / overdue {} / completed {} / defaulted {}",
        dash.active_loans, dash.overdue_loans, dash.completed_loans, dash.defaulted_loans
    );
    println!(
        "lent {}, outstanding {}, collected {}",
        dash.total_lent, dash.total_outstanding, dash.total_collected
    );
    for due in &dash.overdue_installments {
        println!(
            "  OVERDUE  {} #{} {} ({} days)",
            due.borrower, due.sequence, due.amount_due, -due.days_until_due
        );
    }
    for due in &dash.upcoming_payments {
        println!(
            "  upcoming {} #{} {} on {}",
            due.borrower,
            due.sequence,
            due.amount_due,
            format_date(due.due_date)
        );
    }

    println!("\nmonthly:");
    for month in stats.monthly_report(&installments, &payments).iter().take(4) {
        println!(
            "  {}  scheduled {:>8}  collected {:>8}",
            month.month, month.scheduled, month.collected
        );
    }

    let flat = Property::new("Flat 4", "22 Canal St");
    let garage = Property::new("Garage", "22 Canal St (rear)");
    let lease = Agreement::new(flat.id, "finley", Money::from_major(850), date(2023, 9, 1)?)
        .with_end_date(date(2024, 3, 15)?)
        .with_deposit(Money::from_major(850));
    let rent = vec![RentPayment::new(lease.id, Money::from_major(850), date(2024, 2, 1)?)];
    let repairs = vec![MaintenanceRecord::new(
        flat.id,
        "leaking tap",
        Money::from_major(60),
        date(2024, 2, 12)?,
    )];

    let rental = stats.rental_dashboard(&[flat, garage], &[lease], &rent, &repairs, as_of);
    println!("\n=== rentals ===");
    println!(
        "occupancy {}% ({} of {}), collected {}, pending {}, maintenance {}",
        rental.occupancy_rate,
        rental.occupied,
        rental.property_count,
        rental.rent_collected,
        rental.rent_pending,
        rental.maintenance_spend
    );
    for expiring in &rental.expiring_agreements {
        println!(
            "  {} ends {} ({} days)",
            expiring.tenant_name,
            format_date(expiring.end_date),
            expiring.days_remaining
        );
    }
    for month in stats.rental_monthly_report(&rent, &repairs) {
        println!("  {}  net {}", month.month, month.net_income);
    }

    Ok(())
}
