//! Headless console engine for the Cell Wars simulation.
//!
//! Loads configuration, builds and seeds the grid, then runs the tick loop
//! while reading operator commands from stdin.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `cellwars-config.yaml` (or the path given as
//!    the first argument)
//! 2. Initialize structured logging (tracing)
//! 3. Build the grid from the world section
//! 4. Seed the initial population
//! 5. Create operator state from simulation bounds
//! 6. Spawn the console reader and the Ctrl-C listener
//! 7. Run the simulation loop
//! 8. Log the result

mod commands;
mod console;
mod error;
mod reporter;
mod seeding;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use cellwars_core::config::{LogFormat, LoggingConfig, SimulationConfig};
use cellwars_core::grid::CellGrid;
use cellwars_core::operator::OperatorState;
use cellwars_core::runner::{self, SimulationState};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::reporter::ConsoleReporter;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "cellwars-config.yaml";

/// Queued grid commands before the console reader waits.
const COMMAND_QUEUE_DEPTH: usize = 64;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration loading or grid construction fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = SimulationConfig::load_or_default(&config_path)
        .map_err(EngineError::from)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        path = %config_path.display(),
        found = config_path.exists(),
        seed = ?config.world.seed,
        tick_interval_ms = config.time.tick_interval_ms,
        step_seconds = config.time.step_seconds,
        "cellwars-engine starting"
    );

    // 3. Build the grid.
    let grid = build_grid(&config)?;

    // 4. Seed the initial population.
    let mut state = SimulationState::new(grid, config.world.seed, config.time.step_seconds);
    seeding::seed_grid(&mut state.grid, &config.seeding, &mut state.rng)
        .map_err(EngineError::from)?;

    // 5. Create operator state.
    let operator = Arc::new(OperatorState::new(
        config.time.tick_interval_ms,
        &config.simulation,
    ));

    // 6. Console input and Ctrl-C.
    let (grid_tx, mut grid_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
    let cell_size = state.grid.cell_size();
    tokio::spawn(console::read_commands(
        BufReader::new(tokio::io::stdin()),
        Arc::clone(&operator),
        grid_tx,
        cell_size,
    ));
    tokio::spawn(console::stop_on_ctrl_c(Arc::clone(&operator)));
    info!("{}", commands::USAGE);

    // 7. Run the simulation.
    let mut reporter = ConsoleReporter::new(config.logging.report_interval_ticks);
    let result = runner::run_simulation(&mut state, &mut grid_rx, &operator, &mut reporter).await;

    // 8. Log results.
    runner::log_simulation_end(&result);
    runner::report_population(&state.grid);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        lineages = state.grid.living_lineages(),
        "cellwars-engine shutdown complete"
    );

    // The console reader may still be parked in a blocking stdin read.
    std::process::exit(0);
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    match logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

/// Build the grid from explicit dimensions or from a pixel viewport.
fn build_grid(config: &SimulationConfig) -> Result<CellGrid, EngineError> {
    let world = &config.world;
    let grid = match world.viewport() {
        Some((width_px, height_px)) => CellGrid::from_viewport(
            width_px,
            height_px,
            world.cell_size,
            config.life.clone(),
        )?,
        None => CellGrid::new(world.width, world.height, config.life.clone())?,
    };
    Ok(grid)
}
