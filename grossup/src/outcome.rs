use crate::{Probe, SalaryState, SearchRequest};
use rust_decimal::Decimal;
use serde::Serialize;

/// Result of a completed search
///
/// `result` is the first state whose net salary reached the target. It may
/// pay more than the target by up to one step's worth of net salary.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub request: SearchRequest,
    pub result: SalaryState,
    pub iterations: u64,
    /// How far the result's net salary lies above the target
    pub overshoot: Decimal,
    /// Every probe of the walk, when tracing was requested
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<Probe>,
}

impl SearchOutcome {
    pub fn new(request: SearchRequest, last: Probe, trace: Vec<Probe>) -> Self {
        Self {
            request,
            result: last.state,
            iterations: last.iteration,
            overshoot: last.state.net_salary() - request.target_net_salary,
            trace,
        }
    }

    pub fn gross_salary(&self) -> Decimal {
        self.result.gross_salary()
    }

    pub fn net_salary(&self) -> Decimal {
        self.result.net_salary()
    }
}
