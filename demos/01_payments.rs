/// payments - partial payments, overpayment carry-forward and discarded excess
use lending_tracker_rs::chrono::NaiveDate;
use lending_tracker_rs::{
    format_date, Decimal, Event, LoanAccount, LoanTerms, Money, PaymentMethod, PaymentRequest,
};

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    Ok(NaiveDate::from_ymd_opt(y, m, d).ok_or("bad date")?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lending_tracker_rs=debug".parse()?),
        )
        .init();

    println!("=== payments example ===\n");

    // 1,000 at 10% amortizing over 12 months
    let terms = LoanTerms::amortizing_monthly(
        Money::from_major(1_000),
        Decimal::from(10),
        12,
        date(2024, 1, 1)?,
    );
    let mut account = LoanAccount::open("blake", terms)?;
    let id = account.id();

    println!("schedule:");
    for installment in &account.installments {
        println!(
            "  #{:<2} {}  principal {:>7}  interest {:>6}  total {:>7}",
            installment.sequence,
            format_date(installment.due_date),
            installment.principal_amount,
            installment.interest_amount,
            installment.total_amount,
        );
    }

    // a partial payment, then one large enough to spill into the next installments
    let partial = Money::from_major(40);
    account.record_payment(PaymentRequest::new(
        id,
        1,
        partial,
        date(2024, 1, 25)?,
        PaymentMethod::Cash,
    ))?;
    let spill = Money::from_major(200);
    account.record_payment(PaymentRequest::new(
        id,
        1,
        spill,
        date(2024, 2, 1)?,
        PaymentMethod::Card,
    ))?;

    let as_of = date(2024, 2, 2)?;
    println!("\nstatus {:?}, outstanding {}", account.status(as_of), account.outstanding());
    if let Some(next) = account.next_due(as_of) {
        println!(
            "next due #{} on {} ({} left)",
            next.sequence,
            format_date(next.due_date),
            next.remaining()
        );
    }

    // paying off more than is owed discards the excess
    let payoff = account.outstanding() + Money::from_major(25);
    let request = PaymentRequest::new(id, 3, payoff, as_of, PaymentMethod::BankTransfer);
    let outcome = account.record_payment(request)?;
    println!("\npaid off with {}, {} discarded", payoff, outcome.discarded);
    println!("status {:?}", account.status(as_of));

    println!("\nevents:");
    for event in account.take_events() {
        match event {
            Event::OverpaymentCarried { from_sequence, to_sequence, amount, .. } => {
                println!("  carried {} from #{} to #{}", amount, from_sequence, to_sequence)
            }
            Event::ExcessDiscarded { amount, .. } => println!("  discarded {}", amount),
            other => println!("  {:?}", other),
        }
    }

    Ok(())
}
