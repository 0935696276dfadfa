//! # grossup
//!
//! **The gross salary behind a net salary**
//!
//! Payroll formulas run one way: from a gross salary, through contributions
//! and taxes, to the net salary that gets paid. `grossup` runs them the other
//! way. Given any [`DeductionEngine`] and a target net salary it walks the
//! gross salary upwards, in steps of 1.00 while far from the target and 0.01
//! once within 5.00 of it, and stops at the first gross salary whose net
//! salary reaches the target.
//!
//! ## Quick Start
//!
//! ```rust
//! use grossup::{GrossUpResult, PayrollDeductions, SearchRequest, Solver};
//! use rust_decimal::Decimal;
//!
//! fn main() -> GrossUpResult<()> {
//!     let payroll = PayrollDeductions::default();
//!     let target = Decimal::new(300_000, 2);
//!
//!     let outcome = Solver::new().solve(&payroll, SearchRequest::from_target(target))?;
//!     assert!(outcome.net_salary() >= target);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Live searches
//!
//! [`Searcher`] runs the same walk on tokio, one step per tick, and publishes
//! every visited state so a UI can follow along. Starting a new search cancels
//! the previous one.

pub mod config;
pub mod deduction;
pub mod error;
pub mod limits;
pub mod outcome;
pub mod solver;
pub mod state;
pub mod timeout;

pub use config::Config;
pub use deduction::{
    Bracket, BracketSchedule, DeductionEngine, Identity, PayrollBreakdown, PayrollDeductions,
};
pub use error::GrossUpError;
pub use limits::SearchLimits;
pub use outcome::SearchOutcome;
pub use solver::{
    AdaptiveStep, Phase, Probe, SearchHandle, SearchStatus, Searcher, Snapshot, Solver, Walk,
};
pub use state::{SalaryState, SearchRequest};

/// Result type for grossup operations
pub type GrossUpResult<T> = Result<T, GrossUpError>;

#[cfg(test)]
mod tests;
