//! Timeout tracking for searches
//!
//! On native targets elapsed time comes from std::time::Instant. On WASM the
//! check is a no-op since std::time::Instant is not available there.
//!
//! Time spent waiting between steps can be left out of the budget with
//! [`TimeoutTracker::idle`], so a slow tick never fails a search by itself.

use crate::{GrossUpError, SearchLimits};
use std::future::Future;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

/// Timeout tracker for one search
pub struct TimeoutTracker {
    #[cfg(not(target_arch = "wasm32"))]
    start_time: Instant,
    #[cfg(not(target_arch = "wasm32"))]
    idle_time: Duration,
}

impl TimeoutTracker {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            idle_time: Duration::ZERO,
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        Self {}
    }

    /// Milliseconds spent searching, idle waits excluded
    #[cfg(not(target_arch = "wasm32"))]
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time
            .elapsed()
            .saturating_sub(self.idle_time)
            .as_millis() as u64
    }

    #[cfg(target_arch = "wasm32")]
    pub fn elapsed_ms(&self) -> u64 {
        0
    }

    /// Await `wait` without charging its duration to the search
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn idle<F: Future>(&mut self, wait: F) -> F::Output {
        let started = Instant::now();
        let output = wait.await;
        self.idle_time += started.elapsed();
        output
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn idle<F: Future>(&mut self, wait: F) -> F::Output {
        wait.await
    }

    /// Returns an error once the search has run longer than max_search_time_ms
    pub fn check_timeout(&self, limits: &SearchLimits) -> Result<(), GrossUpError> {
        let Some(max_ms) = limits.max_search_time_ms else {
            return Ok(());
        };
        let elapsed_ms = self.elapsed_ms();
        if elapsed_ms > max_ms {
            return Err(GrossUpError::limit_exceeded(
                "max_search_time_ms",
                max_ms,
                elapsed_ms,
                format!(
                    "Search took {}ms, exceeding the limit of {}ms. Start closer to the target or increase the timeout.",
                    elapsed_ms, max_ms
                ),
            ));
        }
        Ok(())
    }
}

impl Default for TimeoutTracker {
    fn default() -> Self {
        Self::new()
    }
}
