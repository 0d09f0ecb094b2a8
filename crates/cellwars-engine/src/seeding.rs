//! Initial population for a fresh grid.
//!
//! `fill_on_start` spawns a parentless cell in every slot first; then
//! `initial_colonies` nine-cell colonies are founded at uniform random
//! positions, overwriting whatever is there.

use cellwars_core::config::SeedingConfig;
use cellwars_core::error::GridError;
use cellwars_core::grid::CellGrid;
use rand::Rng;
use tracing::info;

/// Populate `grid` according to `seeding`.
///
/// # Errors
///
/// Returns [`GridError`] only if a sampled position falls off the grid,
/// which cannot happen for a grid built through [`CellGrid::new`].
pub fn seed_grid(
    grid: &mut CellGrid,
    seeding: &SeedingConfig,
    rng: &mut impl Rng,
) -> Result<(), GridError> {
    if seeding.fill_on_start {
        grid.reseed(rng);
    }
    for _ in 0..seeding.initial_colonies {
        let x = rng.random_range(0..grid.width());
        let y = rng.random_range(0..grid.height());
        grid.spawn(x, y, true, rng)?;
    }
    info!(
        colonies = seeding.initial_colonies,
        filled = seeding.fill_on_start,
        living = grid.living_count(),
        "Grid seeded"
    );
    Ok(())
}
