use crate::{GrossUpError, GrossUpResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal band of a progressive schedule.
///
/// The band starts where the previous one ends (zero for the first) and runs
/// up to `up_to`. `None` marks the open top band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    #[serde(default)]
    pub up_to: Option<Decimal>,
    pub rate: Decimal,
}

impl Bracket {
    pub fn new(up_to: Option<Decimal>, rate: Decimal) -> Self {
        Self { up_to, rate }
    }
}

/// Progressive marginal schedule with an optional ceiling on the base.
///
/// Amounts above the last bounded band are not charged when the schedule has
/// no open band, which is how contribution caps are usually expressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSchedule {
    pub brackets: Vec<Bracket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<Decimal>,
}

impl BracketSchedule {
    pub fn new(brackets: Vec<Bracket>, ceiling: Option<Decimal>) -> GrossUpResult<Self> {
        let schedule = Self { brackets, ceiling };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Check that rates and bounds describe a non-decreasing charge with a
    /// marginal rate below one, so net pay never falls as gross pay rises
    pub fn validate(&self) -> GrossUpResult<()> {
        let mut lower = Decimal::ZERO;
        let last = self.brackets.len().saturating_sub(1);

        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate >= Decimal::ONE {
                return Err(GrossUpError::InvalidSchedule(format!(
                    "bracket {} has rate {}, expected a value in [0, 1)",
                    index + 1,
                    bracket.rate
                )));
            }

            match bracket.up_to {
                Some(upper) if upper <= lower => {
                    return Err(GrossUpError::InvalidSchedule(format!(
                        "bracket {} ends at {}, which is not above {}",
                        index + 1,
                        upper,
                        lower
                    )));
                }
                Some(upper) => lower = upper,
                None if index != last => {
                    return Err(GrossUpError::InvalidSchedule(format!(
                        "bracket {} is open-ended but is not the last bracket",
                        index + 1
                    )));
                }
                None => {}
            }
        }

        if let Some(ceiling) = self.ceiling {
            if ceiling <= Decimal::ZERO {
                return Err(GrossUpError::InvalidSchedule(format!(
                    "ceiling must be positive, got {}",
                    ceiling
                )));
            }
        }

        Ok(())
    }

    /// Unrounded amount charged on `base`
    pub fn apply(&self, base: Decimal) -> Decimal {
        if base <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let base = match self.ceiling {
            Some(ceiling) => base.min(ceiling),
            None => base,
        };

        let mut owed = Decimal::ZERO;
        let mut lower = Decimal::ZERO;
        for bracket in &self.brackets {
            if base <= lower {
                break;
            }
            let top = match bracket.up_to {
                Some(upper) => base.min(upper),
                None => base,
            };
            owed += (top - lower) * bracket.rate;
            match bracket.up_to {
                Some(upper) => lower = upper,
                None => break,
            }
        }
        owed
    }
}
