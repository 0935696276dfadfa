use super::AdaptiveStep;
use crate::{DeductionEngine, GrossUpError, GrossUpResult, SalaryState, SearchRequest};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Searching,
    Done,
}

/// One state visited by a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Probe {
    /// Steps taken so far; zero for the starting state
    pub iteration: u64,
    /// Step that led here, absent for the starting state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<Decimal>,
    pub state: SalaryState,
}

impl Probe {
    pub fn start(state: SalaryState) -> Self {
        Self {
            iteration: 0,
            step: None,
            state,
        }
    }

    pub fn is_start(&self) -> bool {
        self.step.is_none()
    }
}

/// Lazy walk from a starting gross salary towards a target net salary.
///
/// Each step picks its size from the distance between the *current* net
/// salary and the target, moves the gross salary up, and recomputes the net
/// salary. The walk ends with the first probe whose net salary is at or above
/// the target. When the starting state already pays enough, that state is the
/// only probe and no step is taken.
///
/// The walk itself is unbounded; see [`Solver`](super::Solver) for a bounded
/// driver and [`Searcher`](super::Searcher) for a tick-driven one.
///
/// Iterating yields probes until the walk is done, but it also stops if the
/// next gross salary would overflow `Decimal`. In that case the walk stays
/// [`Phase::Searching`], so check [`Walk::is_done`] after collecting, or drive
/// the walk with [`Walk::advance`] to get the
/// [`GrossUpError::Overflow`](crate::GrossUpError::Overflow) itself.
///
/// ```
/// use grossup::{AdaptiveStep, Identity, SearchRequest, Walk};
/// use rust_decimal::Decimal;
///
/// let request = SearchRequest::new(Decimal::ZERO, Decimal::from(3));
/// let mut walk = Walk::new(&Identity, AdaptiveStep::default(), request);
/// let probes: Vec<_> = walk.by_ref().collect();
///
/// assert!(walk.is_done());
/// assert_eq!(probes.len(), 3);
/// assert_eq!(probes[2].state.gross_salary(), Decimal::from(3));
/// ```
pub struct Walk<'e, E: ?Sized> {
    engine: &'e E,
    step: AdaptiveStep,
    target: Decimal,
    current: SalaryState,
    iteration: u64,
    phase: Phase,
}

impl<'e, E> Walk<'e, E>
where
    E: DeductionEngine + ?Sized,
{
    pub fn new(engine: &'e E, step: AdaptiveStep, request: SearchRequest) -> Self {
        Self {
            engine,
            step,
            target: request.target_net_salary,
            current: SalaryState::compute(engine, request.starting_gross_salary),
            iteration: 0,
            phase: Phase::Searching,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Latest state, the starting state before the first step
    pub fn current(&self) -> SalaryState {
        self.current
    }

    pub fn target(&self) -> Decimal {
        self.target
    }

    pub fn iterations(&self) -> u64 {
        self.iteration
    }

    /// Produce the next probe, or `None` once the walk is done.
    ///
    /// Fails only if the gross salary would leave the decimal range.
    pub fn advance(&mut self) -> GrossUpResult<Option<Probe>> {
        if self.phase == Phase::Done {
            return Ok(None);
        }

        if self.iteration == 0 && self.current.meets(self.target) {
            self.phase = Phase::Done;
            return Ok(Some(Probe::start(self.current)));
        }

        let step = self.step.for_distance(self.current.distance_to(self.target));
        let gross_salary = self
            .current
            .gross_salary()
            .checked_add(step)
            .ok_or(GrossUpError::Overflow {
                gross_salary: self.current.gross_salary(),
            })?;

        self.current = SalaryState::compute(self.engine, gross_salary);
        self.iteration += 1;
        if self.current.meets(self.target) {
            self.phase = Phase::Done;
        }

        Ok(Some(Probe {
            iteration: self.iteration,
            step: Some(step),
            state: self.current,
        }))
    }
}

/// Yields probes until the walk is done. A walk that overflows stops short of
/// `Done`; see the [`Walk`] docs.
impl<E> Iterator for Walk<'_, E>
where
    E: DeductionEngine + ?Sized,
{
    type Item = Probe;

    fn next(&mut self) -> Option<Probe> {
        self.advance().ok().flatten()
    }
}
