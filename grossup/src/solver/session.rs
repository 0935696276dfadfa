use super::{AdaptiveStep, Probe, Walk};
use crate::timeout::TimeoutTracker;
use crate::{
    Config, DeductionEngine, GrossUpError, GrossUpResult, SearchLimits, SearchOutcome,
    SearchRequest,
};
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Idle,
    Searching,
    Done,
    Cancelled,
    Failed,
}

/// What observers see of the searcher's shared state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Id of the search that owns this state, zero before the first search
    pub search_id: u64,
    pub status: SearchStatus,
    /// Latest probe of that search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<Probe>,
}

impl Snapshot {
    fn idle() -> Self {
        Self {
            search_id: 0,
            status: SearchStatus::Idle,
            probe: None,
        }
    }
}

/// Tick-driven search with a single shared, observable salary state.
///
/// Every search runs as its own tokio task that takes one step per tick and
/// publishes each probe before checking whether it is done, so the state
/// observers see last is always the state the search returns. Starting a
/// search cancels the one in flight. A search only writes while the shared
/// state still carries its id and the `Searching` status, checked under the
/// channel's lock, so a cancelled search cannot touch the state even if its
/// task has not stopped yet.
///
/// [`Searcher::start`] must be called from within a tokio runtime.
pub struct Searcher<E> {
    engine: Arc<E>,
    step: AdaptiveStep,
    limits: SearchLimits,
    tick: Duration,
    shared: Arc<watch::Sender<Snapshot>>,
    active: Mutex<Option<AbortHandle>>,
}

impl<E> Searcher<E>
where
    E: DeductionEngine + 'static,
{
    pub fn new(engine: E) -> Self {
        let (shared, _) = watch::channel(Snapshot::idle());
        Self {
            engine: Arc::new(engine),
            step: AdaptiveStep::default(),
            limits: SearchLimits::default(),
            tick: Duration::from_millis(1),
            shared: Arc::new(shared),
            active: Mutex::new(None),
        }
    }

    pub fn from_config(engine: E, config: &Config) -> Self {
        Self::new(engine)
            .step(config.step)
            .limits(config.limits)
            .tick(config.tick())
    }

    pub fn step(mut self, step: AdaptiveStep) -> Self {
        self.step = step;
        self
    }

    pub fn limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Time between two steps. Zero yields to the scheduler instead of sleeping.
    pub fn tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn snapshot(&self) -> Snapshot {
        *self.shared.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.subscribe()
    }

    pub fn is_searching(&self) -> bool {
        self.snapshot().status == SearchStatus::Searching
    }

    /// Cancel whatever search is running and start a new one
    pub fn start(&self, request: SearchRequest) -> SearchHandle {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = active.take() {
            previous.abort();
        }

        let mut search_id = 0;
        self.shared.send_modify(|snapshot| {
            if snapshot.status == SearchStatus::Searching {
                info!(search_id = snapshot.search_id, "cancelling search in flight");
            }
            snapshot.search_id += 1;
            snapshot.status = SearchStatus::Searching;
            snapshot.probe = None;
            search_id = snapshot.search_id;
        });

        let run = LiveRun {
            search_id,
            engine: Arc::clone(&self.engine),
            step: self.step,
            limits: self.limits,
            tick: self.tick,
            shared: Arc::clone(&self.shared),
        };
        let handle = tokio::spawn(run.execute(request));
        *active = Some(handle.abort_handle());

        debug!(
            search_id,
            start = %request.starting_gross_salary,
            target = %request.target_net_salary,
            "search started"
        );
        SearchHandle { search_id, handle }
    }

    /// Stop the running search, if any. Returns whether one was stopped.
    pub fn cancel(&self) -> bool {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(handle) = active.take() else {
            return false;
        };
        handle.abort();

        let cancelled = self.shared.send_if_modified(|snapshot| {
            if snapshot.status != SearchStatus::Searching {
                return false;
            }
            snapshot.status = SearchStatus::Cancelled;
            true
        });
        if cancelled {
            info!(search_id = self.snapshot().search_id, "search cancelled");
        }
        cancelled
    }
}

impl<E> Drop for Searcher<E> {
    fn drop(&mut self) {
        let active = self.active.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = active.take() {
            handle.abort();
        }
    }
}

/// Awaitable result of one live search
#[derive(Debug)]
pub struct SearchHandle {
    search_id: u64,
    handle: JoinHandle<GrossUpResult<SearchOutcome>>,
}

impl SearchHandle {
    pub fn search_id(&self) -> u64 {
        self.search_id
    }

    /// Wait for the search to finish.
    ///
    /// A search replaced or cancelled before reaching its target resolves to
    /// [`GrossUpError::Cancelled`]. A panic inside the deduction engine is
    /// resumed on the caller.
    pub async fn outcome(self) -> GrossUpResult<SearchOutcome> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(GrossUpError::Cancelled {
                search_id: self.search_id,
            }),
            Err(err) => panic::resume_unwind(err.into_panic()),
        }
    }
}

struct LiveRun<E> {
    search_id: u64,
    engine: Arc<E>,
    step: AdaptiveStep,
    limits: SearchLimits,
    tick: Duration,
    shared: Arc<watch::Sender<Snapshot>>,
}

impl<E> LiveRun<E>
where
    E: DeductionEngine + 'static,
{
    async fn execute(self, request: SearchRequest) -> GrossUpResult<SearchOutcome> {
        let result = self.walk(request).await;
        match &result {
            Ok(outcome) => debug!(
                search_id = self.search_id,
                iterations = outcome.iterations,
                gross = %outcome.gross_salary(),
                net = %outcome.net_salary(),
                "search finished"
            ),
            Err(GrossUpError::Cancelled { .. }) => {}
            Err(err) => {
                warn!(search_id = self.search_id, error = %err, "search failed");
                self.fail();
            }
        }
        result
    }

    async fn walk(&self, request: SearchRequest) -> GrossUpResult<SearchOutcome> {
        let mut tracker = TimeoutTracker::new();
        let mut ticker = Ticker::new(self.tick);
        let mut walk = self.guard(|| Walk::new(&*self.engine, self.step, request));
        let mut last = Probe::start(walk.current());

        if !walk.current().meets(request.target_net_salary) {
            self.publish(last, SearchStatus::Searching)?;
        }

        while !walk.is_done() {
            tracker.idle(ticker.tick()).await;
            let Some(probe) = self.guard(|| walk.advance())? else {
                break;
            };
            last = probe;

            let status = if walk.is_done() {
                SearchStatus::Done
            } else {
                SearchStatus::Searching
            };
            self.publish(probe, status)?;
            trace!(
                search_id = self.search_id,
                iteration = probe.iteration,
                gross = %probe.state.gross_salary(),
                net = %probe.state.net_salary(),
                "probe"
            );

            if !walk.is_done() {
                self.limits.check_iterations(probe.iteration)?;
                tracker.check_timeout(&self.limits)?;
            }
        }

        Ok(SearchOutcome::new(request, last, Vec::new()))
    }

    /// Run an engine call. If the engine panics the search is marked failed
    /// before the panic carries on to whoever awaits the handle.
    fn guard<T>(&self, call: impl FnOnce() -> T) -> T {
        match panic::catch_unwind(AssertUnwindSafe(call)) {
            Ok(value) => value,
            Err(payload) => {
                warn!(search_id = self.search_id, "deduction engine panicked");
                self.fail();
                panic::resume_unwind(payload)
            }
        }
    }

    fn fail(&self) {
        self.shared.send_if_modified(|snapshot| {
            if !self.owns(snapshot) {
                return false;
            }
            snapshot.status = SearchStatus::Failed;
            true
        });
    }

    /// Write `probe` to the shared state unless another search took it over
    fn publish(&self, probe: Probe, status: SearchStatus) -> GrossUpResult<()> {
        let written = self.shared.send_if_modified(|snapshot| {
            if !self.owns(snapshot) {
                return false;
            }
            snapshot.probe = Some(probe);
            snapshot.status = status;
            true
        });
        if written {
            Ok(())
        } else {
            Err(GrossUpError::Cancelled {
                search_id: self.search_id,
            })
        }
    }

    fn owns(&self, snapshot: &Snapshot) -> bool {
        snapshot.search_id == self.search_id && snapshot.status == SearchStatus::Searching
    }
}

enum Ticker {
    Interval(Interval),
    Yield,
}

impl Ticker {
    fn new(period: Duration) -> Self {
        if period.is_zero() {
            return Self::Yield;
        }
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self::Interval(interval)
    }

    async fn tick(&mut self) {
        match self {
            Self::Interval(interval) => {
                interval.tick().await;
            }
            Self::Yield => tokio::task::yield_now().await,
        }
    }
}
