use crate::{AdaptiveStep, GrossUpError, GrossUpResult, PayrollDeductions, SearchLimits, Solver};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings shared by the command line and the server, read from JSON.
///
/// Every field is optional; missing ones fall back to their defaults.
///
/// ```json
/// {
///   "step": { "threshold": "5", "coarse": "1", "fine": "0.01" },
///   "limits": { "max_iterations": 100000, "max_search_time_ms": null },
///   "tick_ms": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub deductions: PayrollDeductions,
    pub step: AdaptiveStep,
    pub limits: SearchLimits,
    /// Milliseconds between two steps of a live search
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deductions: PayrollDeductions::default(),
            step: AdaptiveStep::default(),
            limits: SearchLimits::default(),
            tick_ms: 1,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> GrossUpResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> GrossUpResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            GrossUpError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> GrossUpResult<()> {
        self.deductions.validate()?;
        self.step.validate()
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Solver carrying this configuration's step policy and limits
    pub fn solver(&self) -> Solver {
        Solver::with_limits(self.limits).step(self.step)
    }
}
