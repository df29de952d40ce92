#![allow(dead_code)]
use amortize::loan::*;
use log::info;
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    let terms = LoanTerms::with_prepayment(600000.0, 3.6, 360, 50000.0);
    let method = RepaymentMethod::EqualPrincipal;
    let schedule = compute_schedule(&terms, method).unwrap();

    schedule.show_amortization();

    let (years, months) = schedule.payoff_years_months();
    info!(
        "{} monthly payment ${:.2}",
        method,
        schedule.monthly_payment()
    );
    info!("paid off in {} years {} months", years, months);
}

// verifies that types can implement the gated traits below
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<ScheduleEntry>();
    is_normal::<Schedule>();
}
