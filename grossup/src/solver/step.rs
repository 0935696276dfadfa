use crate::{GrossUpError, GrossUpResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Step policy of the walk: coarse steps while the net salary is far from the
/// target, fine steps once it is within `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveStep {
    pub threshold: Decimal,
    pub coarse: Decimal,
    pub fine: Decimal,
}

impl Default for AdaptiveStep {
    fn default() -> Self {
        Self {
            threshold: Decimal::new(5, 0),
            coarse: Decimal::ONE,
            fine: Decimal::new(1, 2),
        }
    }
}

impl AdaptiveStep {
    /// Step to take when the current net salary is `distance` away from the target
    pub fn for_distance(&self, distance: Decimal) -> Decimal {
        if distance >= self.threshold {
            self.coarse
        } else {
            self.fine
        }
    }

    pub fn validate(&self) -> GrossUpResult<()> {
        if self.coarse <= Decimal::ZERO || self.fine <= Decimal::ZERO {
            return Err(GrossUpError::Config(format!(
                "step sizes must be positive, got coarse {} and fine {}",
                self.coarse, self.fine
            )));
        }
        if self.threshold < Decimal::ZERO {
            return Err(GrossUpError::Config(format!(
                "step threshold must not be negative, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
