//! Forward payroll computation: gross salary in, net salary out.
//!
//! The solver only ever sees [`DeductionEngine`]. The concrete engines here
//! exist so that searches can run against a realistic payroll out of the box.

mod brackets;
mod payroll;

pub use brackets::{Bracket, BracketSchedule};
pub use payroll::{PayrollBreakdown, PayrollDeductions};

use rust_decimal::Decimal;

/// Maps a gross salary to the net salary left after deductions.
///
/// Implementations must be pure and deterministic. Searches also assume the
/// mapping never decreases as the gross salary grows; an engine that breaks
/// this can keep an unbounded search running forever.
pub trait DeductionEngine: Send + Sync {
    fn net_salary(&self, gross_salary: Decimal) -> Decimal;
}

impl<F> DeductionEngine for F
where
    F: Fn(Decimal) -> Decimal + Send + Sync,
{
    fn net_salary(&self, gross_salary: Decimal) -> Decimal {
        self(gross_salary)
    }
}

/// Pays out the gross salary untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl DeductionEngine for Identity {
    fn net_salary(&self, gross_salary: Decimal) -> Decimal {
        gross_salary
    }
}
