use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RepaymentMethod {
    /// Constant total payment (annuity); the principal/interest split
    /// shifts toward principal over time.
    EqualInstallment,
    /// Constant principal portion; the total payment declines as the
    /// interest charge shrinks.
    EqualPrincipal,
}

impl fmt::Display for RepaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepaymentMethod::EqualInstallment => write!(f, "equal-installment"),
            RepaymentMethod::EqualPrincipal => write!(f, "equal-principal"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LoanError {
    #[error("invalid input: {field} ({reason})")]
    InvalidInput { field: &'static str, reason: String },
}

/// Loan inputs. Amounts are in currency units, the rate is an annual
/// percentage (3.6 means 3.6%).
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoanTerms {
    pub principal: f64,
    pub annual_rate: f64,
    pub term_months: u32,
    pub annual_prepayment: f64,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate: f64, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
            annual_prepayment: 0.,
        }
    }

    /// Terms with a fixed extra principal reduction applied every 12th month.
    pub fn with_prepayment(
        principal: f64,
        annual_rate: f64,
        term_months: u32,
        annual_prepayment: f64,
    ) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
            annual_prepayment,
        }
    }

    fn validate(&self) -> Result<(), LoanError> {
        if self.principal <= 0. {
            return Err(LoanError::InvalidInput {
                field: "principal",
                reason: format!("must be positive, got {}", self.principal),
            });
        }
        if self.term_months == 0 {
            return Err(LoanError::InvalidInput {
                field: "term_months",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.annual_rate < 0. {
            return Err(LoanError::InvalidInput {
                field: "annual_rate",
                reason: format!("must not be negative, got {}", self.annual_rate),
            });
        }
        if self.annual_prepayment < 0. {
            return Err(LoanError::InvalidInput {
                field: "annual_prepayment",
                reason: format!("must not be negative, got {}", self.annual_prepayment),
            });
        }
        Ok(())
    }
}

/// One month of the amortization schedule.
#[derive(PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleEntry {
    pub month_index: u32,
    pub year_number: u32,
    pub month_in_year: u32,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub total_paid: f64,
    pub prepayment_applied: f64,
    pub remaining_principal: f64,
    pub remaining_total: f64,
}

impl ScheduleEntry {
    fn new(
        month_index: u32,
        principal_paid: f64,
        interest_paid: f64,
        prepayment_applied: f64,
        remaining_principal: f64,
    ) -> Self {
        Self {
            month_index,
            year_number: (month_index - 1) / 12 + 1,
            month_in_year: (month_index - 1) % 12 + 1,
            principal_paid,
            interest_paid,
            total_paid: principal_paid + interest_paid,
            prepayment_applied,
            remaining_principal,
            // filled in by the backward pass once the schedule is complete
            remaining_total: 0.,
        }
    }
}

impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "month {} (year {}, month {}): principal ${:.2}, interest ${:.2}, total ${:.2}, prepayment ${:.2}, remaining principal ${:.2}, remaining total ${:.2}",
            self.month_index,
            self.year_number,
            self.month_in_year,
            self.principal_paid,
            self.interest_paid,
            self.total_paid,
            self.prepayment_applied,
            self.remaining_principal,
            self.remaining_total
        )
    }
}

/// Full amortization schedule plus the derived summary figures.
#[derive(PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schedule {
    method: RepaymentMethod,
    entries: Vec<ScheduleEntry>,
    monthly_payment: f64,
}

impl Schedule {
    pub fn method(&self) -> RepaymentMethod {
        self.method
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// 1-based lookup, mirroring `ScheduleEntry::month_index`.
    pub fn entry(&self, month_index: usize) -> Option<&ScheduleEntry> {
        if month_index >= 1 {
            self.entries.get(month_index - 1)
        } else {
            None
        }
    }

    /// The representative monthly payment: the constant annuity payment
    /// for equal-installment, the first month's total for equal-principal
    /// (later payments only get smaller).
    pub fn monthly_payment(&self) -> f64 {
        self.monthly_payment
    }

    /// Number of months until the loan is paid off. Shorter than the
    /// nominal term when prepayments retire the principal early.
    pub fn payoff_months(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Payoff duration as (whole years, leftover months).
    pub fn payoff_years_months(&self) -> (u32, u32) {
        let months = self.payoff_months();
        (months / 12, months % 12)
    }

    pub fn show_amortization(&self) {
        for entry in &self.entries {
            println!("{}", entry);
        }
    }
}

/// Builds the month-by-month schedule for `terms` under `method`.
///
/// Both methods share the same recurrence: charge interest on the
/// outstanding balance, pay down the method's principal portion (clamped
/// so the balance never goes negative), then apply the annual prepayment
/// on every 12th month. The loop stops the first month the balance
/// reaches zero.
pub fn compute_schedule(terms: &LoanTerms, method: RepaymentMethod) -> Result<Schedule, LoanError> {
    terms.validate()?;

    let monthly_rate = terms.annual_rate / 12. / 100.;
    // the fixed per-month figure: principal portion for equal-principal,
    // total annuity payment for equal-installment
    let nominal = match method {
        RepaymentMethod::EqualPrincipal => terms.principal / terms.term_months as f64,
        RepaymentMethod::EqualInstallment => {
            annuity_payment(terms.principal, monthly_rate, terms.term_months)
        }
    };

    let mut entries: Vec<ScheduleEntry> = Vec::new();
    let mut remaining = terms.principal;

    for month in 1..=terms.term_months {
        let interest = remaining * monthly_rate;
        let principal_due = match method {
            RepaymentMethod::EqualPrincipal => nominal,
            RepaymentMethod::EqualInstallment => nominal - interest,
        };
        let principal_paid = principal_due.min(remaining);
        remaining -= principal_paid;

        let mut prepayment = 0.;
        if month % 12 == 0 && terms.annual_prepayment > 0. && remaining > 0. {
            prepayment = terms.annual_prepayment.min(remaining);
            remaining -= prepayment;
        }

        trace!(
            "month {}, principal {}, interest {}, prepayment {}, remaining {}",
            month,
            principal_paid,
            interest,
            prepayment,
            remaining
        );

        entries.push(ScheduleEntry::new(
            month,
            principal_paid,
            interest,
            prepayment,
            remaining,
        ));

        if remaining <= 0. {
            break;
        }
    }

    // total still owed after each month, accumulated back to front so it
    // stays exact against the schedule itself
    let mut owed = 0.;
    for entry in entries.iter_mut().rev() {
        entry.remaining_total = owed;
        owed += entry.total_paid + entry.prepayment_applied;
    }

    let monthly_payment = match method {
        RepaymentMethod::EqualInstallment => nominal,
        RepaymentMethod::EqualPrincipal => entries.first().map_or(0., |e| e.total_paid),
    };

    Ok(Schedule {
        method,
        entries,
        monthly_payment,
    })
}

// standard annuity formula; a zero rate degrades to flat amortization
fn annuity_payment(principal: f64, monthly_rate: f64, term_months: u32) -> f64 {
    if monthly_rate > 0. {
        let factor = (1. + monthly_rate).powi(term_months as i32);
        principal * monthly_rate * factor / (factor - 1.)
    } else {
        principal / term_months as f64
    }
}
