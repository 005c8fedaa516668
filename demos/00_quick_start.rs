/// quick start - open a loan, pay the first installment, print the result
use lending_tracker_rs::chrono::NaiveDate;
use lending_tracker_rs::{Decimal, LoanAccount, LoanTerms, Money, PaymentMethod, PaymentRequest};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;

    // 1,200 lent at 12% flat, repaid monthly over a year
    let terms = LoanTerms::simple_monthly(Money::from_major(1_200), Decimal::from(12), 12, start);
    let mut account = LoanAccount::open("alex", terms)?;

    let first_due = account.installments[0].due_date;
    account.record_payment(PaymentRequest::new(
        account.id(),
        1,
        Money::from_major(112),
        first_due,
        PaymentMethod::BankTransfer,
    ))?;

    println!("{}", account.to_json(first_due)?);

    Ok(())
}
