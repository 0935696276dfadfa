use super::{Bracket, BracketSchedule, DeductionEngine};
use crate::GrossUpResult;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Two-stage payroll: a social contribution on the gross salary, then income
/// tax on what is left.
///
/// Each stage is rounded to cents, half away from zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollDeductions {
    pub contribution: BracketSchedule,
    pub income_tax: BracketSchedule,
}

/// Every intermediate figure of one forward computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayrollBreakdown {
    pub gross_salary: Decimal,
    pub contribution: Decimal,
    pub taxable_income: Decimal,
    pub income_tax: Decimal,
    pub net_salary: Decimal,
}

impl PayrollBreakdown {
    pub fn total_deductions(&self) -> Decimal {
        self.contribution + self.income_tax
    }
}

impl Default for PayrollDeductions {
    fn default() -> Self {
        Self::brazil_2024()
    }
}

impl PayrollDeductions {
    pub fn new(contribution: BracketSchedule, income_tax: BracketSchedule) -> GrossUpResult<Self> {
        let deductions = Self {
            contribution,
            income_tax,
        };
        deductions.validate()?;
        Ok(deductions)
    }

    pub fn validate(&self) -> GrossUpResult<()> {
        self.contribution.validate()?;
        self.income_tax.validate()
    }

    /// Brazilian INSS contribution and IRRF withholding tables in force from
    /// February 2024
    pub fn brazil_2024() -> Self {
        let cents = |value: i64| Decimal::new(value, 2);
        let rate = |permille: i64| Decimal::new(permille, 3);

        Self {
            contribution: BracketSchedule {
                brackets: vec![
                    Bracket::new(Some(cents(141_200)), rate(75)),
                    Bracket::new(Some(cents(266_668)), rate(90)),
                    Bracket::new(Some(cents(400_003)), rate(120)),
                    Bracket::new(Some(cents(778_602)), rate(140)),
                ],
                ceiling: None,
            },
            income_tax: BracketSchedule {
                brackets: vec![
                    Bracket::new(Some(cents(225_920)), Decimal::ZERO),
                    Bracket::new(Some(cents(282_665)), rate(75)),
                    Bracket::new(Some(cents(375_105)), rate(150)),
                    Bracket::new(Some(cents(466_468)), rate(225)),
                    Bracket::new(None, rate(275)),
                ],
                ceiling: None,
            },
        }
    }

    pub fn breakdown(&self, gross_salary: Decimal) -> PayrollBreakdown {
        let contribution = round_cents(self.contribution.apply(gross_salary));
        let taxable_income = gross_salary - contribution;
        let income_tax = round_cents(self.income_tax.apply(taxable_income));

        PayrollBreakdown {
            gross_salary,
            contribution,
            taxable_income,
            income_tax,
            net_salary: taxable_income - income_tax,
        }
    }
}

impl DeductionEngine for PayrollDeductions {
    fn net_salary(&self, gross_salary: Decimal) -> Decimal {
        self.breakdown(gross_salary).net_salary
    }
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
