//! End-to-end grid scenarios driven through the public API.
//!
//! Each test builds a small grid, places cells, runs ticks with a seeded RNG,
//! and checks the observable outcome.

#![allow(clippy::unwrap_used)]

use cellwars_cells::{Genome, LifeConfig, Span, is_close_family, provokes_hostility};
use cellwars_core::grid::CellGrid;
use cellwars_core::input::InputEvent;
use cellwars_core::runner::{GridCommand, SimulationState};
use cellwars_types::{LineageId, Modifier, SelectionMode};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const EPS: f64 = 1e-9;

fn sterile() -> LifeConfig {
    LifeConfig {
        breed_chance_bounds: Span::new(0.0, 0.35),
        ..LifeConfig::default()
    }
}

#[test]
fn lone_cell_never_turns_hostile_and_starves() {
    let cfg = sterile();
    let mut grid = CellGrid::new(5, 5, cfg.clone()).unwrap();
    let genome = Genome::clamped(10.0, 0.0, 8.0, 1.0, &cfg);
    grid.implant(2, 2, genome, 42.0, None).unwrap();
    let mut rng = SmallRng::seed_from_u64(11);

    for _ in 0..5 {
        grid.tick(0.5, false, &mut rng);
        assert!(!grid.get_cell(2, 2).unwrap().is_hostile());
    }
    assert!((grid.get_cell(2, 2).unwrap().health() - 7.5).abs() < EPS);

    let summary = grid.tick(genome.max_health() + 1.0, false, &mut rng);
    assert_eq!(summary.starved, 1);
    let cell = grid.get_cell(2, 2).unwrap();
    assert!(!cell.is_alive());
    assert!(cell.has_corpse());
}

#[test]
fn hue_gap_decides_family_or_war() {
    let cfg = sterile();
    let mut grid = CellGrid::new(2, 1, cfg.clone()).unwrap();
    let wide = Genome::clamped(50.0, 0.0, 15.0, 1.0, &cfg);
    grid.implant(0, 0, wide, 10.0, None).unwrap();
    grid.implant(1, 0, wide, 20.0, None).unwrap();
    {
        let a = grid.get_cell(0, 0).unwrap();
        let b = grid.get_cell(1, 0).unwrap();
        assert!(is_close_family(a, b));
        assert!(!provokes_hostility(a, b));
    }

    let narrow = Genome::clamped(50.0, 0.0, 5.0, 1.0, &cfg);
    grid.implant(0, 0, narrow, 10.0, None).unwrap();
    grid.implant(1, 0, narrow, 20.0, None).unwrap();
    let mut rng = SmallRng::seed_from_u64(12);
    grid.tick(0.01, false, &mut rng);
    assert!(grid.get_cell(0, 0).unwrap().is_hostile());
    assert!(grid.get_cell(1, 0).unwrap().is_hostile());
}

#[test]
fn shared_lineage_keeps_the_peace() {
    let cfg = sterile();
    let mut grid = CellGrid::new(2, 1, cfg.clone()).unwrap();
    let mut rng = SmallRng::seed_from_u64(13);
    let lineage = Some(LineageId::from_rng(&mut rng));
    let genome = Genome::clamped(50.0, 0.0, 5.0, 1.0, &cfg);
    // Eight degrees apart: outside the radius, inside twice the radius.
    grid.implant(0, 0, genome, 10.0, lineage).unwrap();
    grid.implant(1, 0, genome, 18.0, lineage).unwrap();

    grid.tick(0.01, false, &mut rng);
    assert!(!grid.get_cell(0, 0).unwrap().is_hostile());
    assert!(!grid.get_cell(1, 0).unwrap().is_hostile());
}

#[test]
fn colony_spawn_shares_hue_and_lineage() {
    let mut grid = CellGrid::new(5, 5, LifeConfig::default()).unwrap();
    let mut rng = SmallRng::seed_from_u64(14);
    grid.spawn(2, 2, true, &mut rng).unwrap();

    assert_eq!(grid.living_count(), 9);
    let origin = grid.get_cell(2, 2).unwrap();
    let colony: Vec<_> = grid.cells().iter().filter(|c| c.is_alive()).collect();
    assert!(
        colony
            .iter()
            .all(|c| (c.color().hue() - origin.color().hue()).abs() < EPS)
    );
    assert!(colony.iter().all(|c| c.lineage() == origin.lineage()));
    assert!(origin.lineage().is_some());
    assert!(colony.iter().all(|c| (c.health() - 10.0).abs() < EPS));
}

#[test]
fn eating_raises_health_and_clears_corpse() {
    let cfg = sterile();
    let mut grid = CellGrid::new(3, 1, cfg.clone()).unwrap();
    grid.implant(0, 0, Genome::clamped(30.0, 0.0, 5.0, 1.0, &cfg), 0.0, None)
        .unwrap();
    grid.implant(1, 0, Genome::clamped(10.0, 0.0, 5.0, 1.0, &cfg), 0.0, None)
        .unwrap();
    let mut rng = SmallRng::seed_from_u64(15);

    // A long step starves the middle cell; the left one survives it.
    let summary = grid.tick(15.0, false, &mut rng);
    assert_eq!(summary.starved, 1);
    assert!(grid.get_cell(1, 0).unwrap().has_corpse());
    let before = grid.get_cell(0, 0).unwrap().health();

    let summary = grid.tick(0.0, false, &mut rng);
    assert_eq!(summary.meals, 1);
    assert!(grid.get_cell(1, 0).unwrap().is_empty());
    assert!(grid.get_cell(0, 0).unwrap().health() > before);
}

#[test]
fn alive_and_corpse_never_coexist() {
    let mut grid = CellGrid::new(12, 12, LifeConfig::default()).unwrap();
    let mut rng = SmallRng::seed_from_u64(16);
    grid.reseed(&mut rng);
    grid.spawn(3, 3, true, &mut rng).unwrap();
    grid.spawn(8, 8, true, &mut rng).unwrap();

    for _ in 0..200 {
        grid.tick(0.2, false, &mut rng);
        for cell in grid.cells() {
            assert!(!(cell.is_alive() && cell.has_corpse()));
            let hue = cell.color().hue();
            assert!((0.0..360.0).contains(&hue));
            let genome = cell.genome();
            if cell.is_alive() {
                assert!(genome.max_health() >= 10.0);
                assert!((0.05..=0.35).contains(&genome.breed_chance()));
                assert!((0.25..=9.0).contains(&genome.damage()));
                assert!(genome.max_hue_distance() >= 0.0);
            }
        }
        if let Some(avg) = grid.population_averages() {
            let max = grid.population_maxima().unwrap();
            assert!(avg.max_health <= max.max_health + EPS);
        }
    }
}

#[test]
fn lineage_highlight_follows_the_colony_while_paused() {
    let grid = CellGrid::new(6, 6, LifeConfig::default()).unwrap();
    let mut state = SimulationState::new(grid, Some(17), 0.01);
    state
        .apply(GridCommand::Input(InputEvent::Secondary { px: 2, py: 2 }))
        .unwrap();
    state
        .apply(GridCommand::Input(InputEvent::Primary {
            px: 2,
            py: 2,
            modifier: Modifier::Shift,
        }))
        .unwrap();
    assert_eq!(state.grid.selection().mode(), SelectionMode::Lineage);

    for _ in 0..3 {
        let summary = state.grid.tick(0.01, true, &mut state.rng);
        assert!(summary.paused);
        let mut highlighted = 0_usize;
        state.grid.render_pass(|c| {
            if c.selected {
                highlighted = highlighted.saturating_add(1);
            }
        });
        // The whole 3x3 colony around (2, 2), re-marked every paused tick.
        assert_eq!(highlighted, 9);
    }
}

#[test]
fn empty_grid_reports_no_aggregates() {
    let mut grid = CellGrid::new(4, 4, LifeConfig::default()).unwrap();
    assert!(grid.population_averages().is_none());
    let mut rng = SmallRng::seed_from_u64(18);
    grid.spawn(0, 0, false, &mut rng).unwrap();
    grid.clear_all();
    let stats = grid.population_stats();
    assert_eq!((stats.living, stats.corpses), (0, 0));
    assert!(stats.maxima.is_none());
}
