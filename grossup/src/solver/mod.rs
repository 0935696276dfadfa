//! Inverse search from a target net salary back to a gross salary
//!
//! Three layers, each driving the one before it:
//! - [`Walk`]: the adaptive-step walk as a lazy, unbounded iterator
//! - [`Solver`]: runs a walk to completion under [`SearchLimits`]
//! - [`Searcher`]: runs walks one tick at a time on tokio, publishing every
//!   probe to observers and keeping at most one search alive

mod session;
mod step;
mod walk;

pub use session::{SearchHandle, SearchStatus, Searcher, Snapshot};
pub use step::AdaptiveStep;
pub use walk::{Phase, Probe, Walk};

use crate::timeout::TimeoutTracker;
use crate::{DeductionEngine, GrossUpResult, SearchLimits, SearchOutcome, SearchRequest};
use tracing::{debug, trace};

/// Synchronous search driver.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    step: AdaptiveStep,
    limits: SearchLimits,
    record_trace: bool,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with custom search limits
    pub fn with_limits(limits: SearchLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn step(mut self, step: AdaptiveStep) -> Self {
        self.step = step;
        self
    }

    pub fn limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Keep every probe in the outcome
    pub fn trace(mut self, record_trace: bool) -> Self {
        self.record_trace = record_trace;
        self
    }

    pub fn search_limits(&self) -> &SearchLimits {
        &self.limits
    }

    pub fn adaptive_step(&self) -> &AdaptiveStep {
        &self.step
    }

    pub fn walk<'e, E>(&self, engine: &'e E, request: SearchRequest) -> Walk<'e, E>
    where
        E: DeductionEngine + ?Sized,
    {
        Walk::new(engine, self.step, request)
    }

    /// Walk until the target is met or a limit is hit
    pub fn solve<E>(&self, engine: &E, request: SearchRequest) -> GrossUpResult<SearchOutcome>
    where
        E: DeductionEngine + ?Sized,
    {
        let tracker = TimeoutTracker::new();
        let mut walk = self.walk(engine, request);
        let mut last = Probe::start(walk.current());
        let mut probes = Vec::new();

        debug!(
            start = %request.starting_gross_salary,
            target = %request.target_net_salary,
            "starting search"
        );

        while let Some(probe) = walk.advance()? {
            trace!(
                iteration = probe.iteration,
                gross = %probe.state.gross_salary(),
                net = %probe.state.net_salary(),
                "probe"
            );
            if self.record_trace {
                probes.push(probe);
            }
            last = probe;

            if walk.is_done() {
                break;
            }
            self.limits.check_iterations(probe.iteration)?;
            tracker.check_timeout(&self.limits)?;
        }

        debug!(
            iterations = last.iteration,
            gross = %last.state.gross_salary(),
            net = %last.state.net_salary(),
            elapsed_ms = tracker.elapsed_ms(),
            "search finished"
        );
        Ok(SearchOutcome::new(request, last, probes))
    }
}
