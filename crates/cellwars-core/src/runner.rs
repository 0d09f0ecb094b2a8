//! Simulation loop runner with operator controls.
//!
//! [`run_simulation`] drives the grid tick by tick with support for:
//!
//! - **Bounded runs**: stop after `max_ticks` or `max_real_time_seconds`
//! - **Pause/step**: paused ticks only refresh highlights; a step request
//!   runs exactly one update pass
//! - **Variable tick speed**: interval adjustable at runtime
//! - **Queued grid commands**: clicks, reseeds and reports arrive over a
//!   channel and are applied between ticks
//! - **Extinction stop**: optional end once nothing is alive

use std::sync::Arc;

use cellwars_types::TraitSummary;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::GridError;
use crate::grid::CellGrid;
use crate::input::{InputEvent, InputOutcome};
use crate::operator::{OperatorState, SimulationEndReason};
use crate::tick::TickSummary;

/// Everything the tick loop owns.
#[derive(Debug)]
pub struct SimulationState {
    /// The world.
    pub grid: CellGrid,
    /// The single source of randomness.
    pub rng: StdRng,
    /// Simulated seconds per tick.
    pub step_seconds: f64,
}

impl SimulationState {
    /// Wrap `grid`, seeding the RNG from `seed` or from the OS.
    pub fn new(grid: CellGrid, seed: Option<u64>, step_seconds: f64) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            grid,
            rng,
            step_seconds,
        }
    }

    /// Apply one queued command to the grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] for coordinates outside the grid.
    pub fn apply(&mut self, command: GridCommand) -> Result<(), GridError> {
        match command {
            GridCommand::Input(event) => {
                match self.grid.apply_input(event, &mut self.rng)? {
                    InputOutcome::Selected {
                        x,
                        y,
                        mode,
                        description,
                    } => {
                        info!(x, y, mode = ?mode, "Selection changed");
                        if let Some(text) = description {
                            info!("\n{text}");
                        }
                    }
                    InputOutcome::Spawned { x, y } => info!(x, y, "Colony spawned"),
                }
            }
            GridCommand::Reseed => self.grid.reseed(&mut self.rng),
            GridCommand::Clear => self.grid.clear_all(),
            GridCommand::Describe { x, y } => {
                let text = self.grid.describe(x, y)?;
                info!("\n{text}");
            }
            GridCommand::Report => report_population(&self.grid),
        }
        Ok(())
    }
}

/// A request to change or inspect the grid, applied between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCommand {
    /// A pointer click.
    Input(InputEvent),
    /// Clear, then spawn a parentless cell in every slot.
    Reseed,
    /// Kill and empty every slot.
    Clear,
    /// Log the info text of slot `(x, y)`.
    Describe {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },
    /// Log population statistics.
    Report,
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Number of unpaused ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick, paused or not.
pub trait TickCallback: Send {
    /// Called after a tick completes.
    fn on_tick(&mut self, summary: &TickSummary, state: &mut SimulationState);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &mut SimulationState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// Queued commands are drained before every tick. A closed command channel
/// is not a stop signal; only the operator or a configured bound ends the
/// run.
pub async fn run_simulation(
    state: &mut SimulationState,
    commands: &mut mpsc::Receiver<GridCommand>,
    operator: &Arc<OperatorState>,
    callback: &mut dyn TickCallback,
) -> SimulationResult {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    let bounds = operator.bounds();
    info!(
        started_at = %operator.started_at(),
        max_ticks = bounds.max_ticks,
        max_real_time_seconds = bounds.max_real_time_seconds,
        tick_interval_ms = operator.tick_interval_ms(),
        stop_on_extinction = bounds.stop_on_extinction,
        "Simulation starting"
    );

    loop {
        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            return finish(
                operator,
                SimulationEndReason::OperatorStop,
                last_summary,
                total_ticks,
            );
        }

        // --- Check time limit (before tick) ---
        if operator.out_of_time() {
            info!(
                max_seconds = operator.bounds().max_real_time_seconds,
                run_time = ?operator.run_time(),
                "Real-time limit reached"
            );
            return finish(
                operator,
                SimulationEndReason::MaxRealTimeReached,
                last_summary,
                total_ticks,
            );
        }

        // --- Apply queued commands ---
        while let Ok(command) = commands.try_recv() {
            if let Err(e) = state.apply(command) {
                warn!(error = %e, ?command, "Command rejected");
            }
        }

        // --- Execute tick ---
        // A step request made while running is spent on this tick.
        let step = operator.take_step_request();
        let paused = operator.is_paused() && !step;
        let summary = state
            .grid
            .tick(state.step_seconds, paused, &mut state.rng);
        if !paused {
            total_ticks = total_ticks.saturating_add(1);
        }

        callback.on_tick(&summary, state);

        // --- Check bounds (after tick) ---
        if let Some(reason) = operator.bound_reached(&summary) {
            info!(
                tick = summary.tick,
                living = summary.living,
                ?reason,
                "Simulation bound reached"
            );
            return finish(operator, reason, Some(summary), total_ticks);
        }

        last_summary = Some(summary);

        // --- Sleep for tick interval ---
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

fn finish(
    operator: &OperatorState,
    reason: SimulationEndReason,
    final_summary: Option<TickSummary>,
    total_ticks: u64,
) -> SimulationResult {
    SimulationResult {
        end_reason: operator.record_end(reason),
        final_summary,
        total_ticks,
    }
}

/// Log living and corpse counts with trait maxima and means.
pub fn report_population(grid: &CellGrid) {
    let stats = grid.population_stats();
    let (Some(max), Some(avg)) = (stats.maxima, stats.averages) else {
        info!(
            tick = grid.ticks(),
            living = stats.living,
            corpses = stats.corpses,
            "Population report: nothing alive"
        );
        return;
    };
    info!(
        tick = grid.ticks(),
        living = stats.living,
        corpses = stats.corpses,
        max = %format_traits(&max),
        avg = %format_traits(&avg),
        "Population report"
    );
}

fn format_traits(t: &TraitSummary) -> String {
    format!(
        "MaxHP {:.3} | MHD {:.3} | BC {:.3} | HP {:.3}",
        t.max_health, t.max_hue_distance, t.breed_chance, t.health
    )
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        final_living = result.final_summary.as_ref().map(|s| s.living),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            living = summary.living,
            births = summary.births,
            deaths = summary.deaths(),
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
