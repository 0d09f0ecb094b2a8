//! Operator control state for runtime simulation management.
//!
//! Shared between the tick loop and the console reader. The operator can
//! pause, resume, single-step, change tick speed, and request a clean stop
//! without touching the grid, which stays owned by the tick loop.
//!
//! All control fields are atomics so the console task never blocks the
//! loop.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::config::SimulationBoundsConfig;
use crate::tick::TickSummary;

/// Smallest tick interval the operator may set, in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 1;

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// Reached the configured `max_real_time_seconds` limit.
    MaxRealTimeReached,
    /// The operator asked to quit.
    OperatorStop,
    /// No living cell remains and `stop_on_extinction` is set.
    Extinction,
}

/// Shared operator control state, usually held in an `Arc`.
#[derive(Debug)]
pub struct OperatorState {
    paused: AtomicBool,

    /// The next tick should run its update pass even if paused.
    step_requested: AtomicBool,

    stop_requested: AtomicBool,

    /// Current tick interval in milliseconds (runtime-adjustable).
    tick_interval_ms: AtomicU64,

    /// Wall-clock start, for logs.
    started_at: DateTime<Utc>,

    /// Monotonic start, for the real-time bound.
    clock: Instant,

    bounds: SimulationBoundsConfig,

    /// Set once; later reasons are ignored.
    end_reason: OnceLock<SimulationEndReason>,
}

impl OperatorState {
    /// Create a new operator state from configuration.
    pub fn new(tick_interval_ms: u64, bounds: &SimulationBoundsConfig) -> Self {
        Self {
            paused: AtomicBool::new(false),
            step_requested: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            started_at: Utc::now(),
            clock: Instant::now(),
            bounds: bounds.clone(),
            end_reason: OnceLock::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume / Step
    // -----------------------------------------------------------------------

    /// Check whether the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the simulation. Ticks keep refreshing selection highlights.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the simulation.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    /// Flip the pause flag, returning the new state.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::AcqRel)
    }

    /// Ask for one update pass while paused.
    pub fn request_step(&self) {
        self.step_requested.store(true, Ordering::Release);
    }

    /// Consume a pending step request.
    pub fn take_step_request(&self) -> bool {
        self.step_requested.swap(false, Ordering::AcqRel)
    }

    /// Ask the loop to stop before its next tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Whether a stop has been asked for.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    // -----------------------------------------------------------------------
    // Tick Speed
    // -----------------------------------------------------------------------

    /// Get the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval in milliseconds.
    ///
    /// Returns the previous interval, or `None` if `ms` is below
    /// [`MIN_TICK_INTERVAL_MS`].
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < MIN_TICK_INTERVAL_MS {
            return None;
        }
        Some(self.tick_interval_ms.swap(ms, Ordering::AcqRel))
    }

    // -----------------------------------------------------------------------
    // Run bounds
    // -----------------------------------------------------------------------

    /// The configured bounds.
    pub const fn bounds(&self) -> &SimulationBoundsConfig {
        &self.bounds
    }

    /// Wall-clock time the run started.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time since the run started, on the runtime's monotonic clock.
    pub fn run_time(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Whether the real-time bound has passed. A bound of 0 never does.
    pub fn out_of_time(&self) -> bool {
        match self.bounds.max_real_time_seconds {
            0 => false,
            limit => self.run_time() >= Duration::from_secs(limit),
        }
    }

    /// The bound a completed tick hits, if any. Paused ticks never end the
    /// run; extinction is checked before the tick limit.
    pub const fn bound_reached(&self, summary: &TickSummary) -> Option<SimulationEndReason> {
        if summary.paused {
            return None;
        }
        if self.bounds.stop_on_extinction && summary.living == 0 {
            return Some(SimulationEndReason::Extinction);
        }
        if self.bounds.max_ticks > 0 && summary.tick >= self.bounds.max_ticks {
            return Some(SimulationEndReason::MaxTicksReached);
        }
        None
    }

    /// Record why the run ended and return the reason that sticks: the
    /// first one recorded.
    pub fn record_end(&self, reason: SimulationEndReason) -> SimulationEndReason {
        *self.end_reason.get_or_init(|| reason)
    }

    /// Why the run ended, once it has.
    pub fn end_reason(&self) -> Option<SimulationEndReason> {
        self.end_reason.get().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unbounded() -> SimulationBoundsConfig {
        SimulationBoundsConfig::default()
    }

    #[test]
    fn initial_state_is_running() {
        let state = OperatorState::new(50, &unbounded());
        assert!(!state.is_paused());
        assert!(!state.is_stop_requested());
        assert!(!state.take_step_request());
        assert_eq!(state.bounds(), &unbounded());
    }

    #[test]
    fn pause_and_resume() {
        let state = OperatorState::new(50, &unbounded());
        state.pause();
        assert!(state.is_paused());
        state.resume();
        assert!(!state.is_paused());
    }

    #[test]
    fn toggle_pause_reports_new_state() {
        let state = OperatorState::new(50, &unbounded());
        assert!(state.toggle_pause());
        assert!(state.is_paused());
        assert!(!state.toggle_pause());
        assert!(!state.is_paused());
    }

    #[test]
    fn step_request_is_consumed_once() {
        let state = OperatorState::new(50, &unbounded());
        state.request_step();
        assert!(state.take_step_request());
        assert!(!state.take_step_request());
    }

    #[test]
    fn stop_request() {
        let state = OperatorState::new(50, &unbounded());
        state.request_stop();
        assert!(state.is_stop_requested());
    }

    #[test]
    fn set_tick_interval() {
        let state = OperatorState::new(50, &unbounded());
        assert_eq!(state.set_tick_interval_ms(200), Some(50));
        assert_eq!(state.tick_interval_ms(), 200);
        assert!(state.set_tick_interval_ms(0).is_none());
        assert_eq!(state.tick_interval_ms(), 200);
    }

    fn finished(tick: u64, living: usize) -> TickSummary {
        TickSummary {
            tick,
            living,
            ..TickSummary::default()
        }
    }

    #[test]
    fn zero_bounds_never_end_the_run() {
        let state = OperatorState::new(50, &unbounded());
        assert_eq!(state.bound_reached(&finished(999_999, 0)), None);
        assert!(!state.out_of_time());
    }

    #[test]
    fn tick_bound_ends_the_run() {
        let bounds = SimulationBoundsConfig {
            max_ticks: 100,
            ..SimulationBoundsConfig::default()
        };
        let state = OperatorState::new(50, &bounds);
        assert_eq!(state.bound_reached(&finished(99, 5)), None);
        assert_eq!(
            state.bound_reached(&finished(100, 5)),
            Some(SimulationEndReason::MaxTicksReached)
        );
    }

    #[test]
    fn extinction_wins_over_tick_bound_but_not_while_paused() {
        let bounds = SimulationBoundsConfig {
            max_ticks: 10,
            max_real_time_seconds: 0,
            stop_on_extinction: true,
        };
        let state = OperatorState::new(50, &bounds);
        assert_eq!(
            state.bound_reached(&finished(10, 0)),
            Some(SimulationEndReason::Extinction)
        );
        let paused = TickSummary {
            paused: true,
            ..finished(10, 0)
        };
        assert_eq!(state.bound_reached(&paused), None);
    }

    #[tokio::test(start_paused = true)]
    async fn real_time_bound_uses_runtime_clock() {
        let bounds = SimulationBoundsConfig {
            max_real_time_seconds: 2,
            ..SimulationBoundsConfig::default()
        };
        let state = OperatorState::new(50, &bounds);
        assert!(!state.out_of_time());
        tokio::time::advance(Duration::from_millis(1999)).await;
        assert!(!state.out_of_time());
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(state.out_of_time());
    }

    #[test]
    fn first_end_reason_sticks() {
        let state = OperatorState::new(50, &unbounded());
        assert!(state.end_reason().is_none());
        assert_eq!(
            state.record_end(SimulationEndReason::Extinction),
            SimulationEndReason::Extinction
        );
        assert_eq!(
            state.record_end(SimulationEndReason::OperatorStop),
            SimulationEndReason::Extinction
        );
        assert_eq!(state.end_reason(), Some(SimulationEndReason::Extinction));
    }
}
