use crate::DeductionEngine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A gross salary together with the net salary it pays.
///
/// Only built through a [`DeductionEngine`], so the net figure always belongs
/// to the gross figure next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalaryState {
    gross_salary: Decimal,
    net_salary: Decimal,
}

impl SalaryState {
    pub fn compute<E>(engine: &E, gross_salary: Decimal) -> Self
    where
        E: DeductionEngine + ?Sized,
    {
        Self {
            gross_salary,
            net_salary: engine.net_salary(gross_salary),
        }
    }

    pub fn gross_salary(&self) -> Decimal {
        self.gross_salary
    }

    pub fn net_salary(&self) -> Decimal {
        self.net_salary
    }

    /// Whether this state pays at least `target_net_salary`
    pub fn meets(&self, target_net_salary: Decimal) -> bool {
        self.net_salary >= target_net_salary
    }

    pub fn distance_to(&self, target_net_salary: Decimal) -> Decimal {
        (self.net_salary - target_net_salary).abs()
    }
}

/// What to search for, and where to start walking from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub starting_gross_salary: Decimal,
    pub target_net_salary: Decimal,
}

impl SearchRequest {
    pub fn new(starting_gross_salary: Decimal, target_net_salary: Decimal) -> Self {
        Self {
            starting_gross_salary,
            target_net_salary,
        }
    }

    /// Start the walk at the target itself.
    ///
    /// Deductions only ever take money away, so no gross salary below the
    /// target net salary can reach it.
    pub fn from_target(target_net_salary: Decimal) -> Self {
        Self::new(target_net_salary, target_net_salary)
    }
}
