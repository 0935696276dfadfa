use crate::{GrossUpError, GrossUpResult};
use serde::{Deserialize, Serialize};

/// Bounds placed around a search by its caller
///
/// A walk towards an unreachable target never ends on its own. These bounds
/// turn that into an error without changing which state a successful search
/// returns. `None` disables a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Maximum number of steps after the starting state
    /// Real usage: a few thousand, Limit: 10 million
    pub max_iterations: Option<u64>,

    /// Maximum time one search may spend stepping, in milliseconds.
    /// A live search's waits between ticks do not count.
    pub max_search_time_ms: Option<u64>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_iterations: Some(10_000_000),
            max_search_time_ms: Some(10_000), // 10 seconds
        }
    }
}

impl SearchLimits {
    /// Create a new SearchLimits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// No bounds at all: the search runs until it reaches its target
    pub fn unbounded() -> Self {
        Self {
            max_iterations: None,
            max_search_time_ms: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_iterations.is_none() && self.max_search_time_ms.is_none()
    }

    /// Fail once `iterations` steps have been taken without reaching the target
    pub fn check_iterations(&self, iterations: u64) -> GrossUpResult<()> {
        match self.max_iterations {
            Some(max) if iterations >= max => Err(GrossUpError::limit_exceeded(
                "max_iterations",
                max,
                iterations,
                "The target may be out of reach of the deduction engine. Check the target or raise the iteration limit.",
            )),
            _ => Ok(()),
        }
    }
}
