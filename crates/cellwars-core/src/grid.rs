//! The cell arena and its fixed neighborhood topology.
//!
//! Cells live in one row-major `Vec` (`index = y * width + x`). Each slot's
//! Moore neighborhood is resolved to arena indices once at construction and
//! never recomputed: positions are fixed for the lifetime of the grid.
//!
//! The per-tick update lives in [`crate::tick`], selection in
//! [`crate::selection`], aggregates in [`crate::stats`], and the draw
//! hand-off in [`crate::render`]; all of them are further `impl CellGrid`
//! blocks over the fields defined here.

use cellwars_cells::{Birth, Cell, Genome, LifeConfig};
use cellwars_types::{GridPos, LineageId};
use rand::Rng;
use tracing::{debug, info};

use crate::error::GridError;
use crate::selection::Selection;

/// Moore neighborhood offsets `(dx, dy)` in slot order: row-major, self
/// excluded.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Arena indices of a slot's neighbors in [`NEIGHBOR_OFFSETS`] order;
/// `None` where the offset falls off the grid edge.
pub type Neighborhood = [Option<usize>; 8];

/// The simulation world: a fixed rectangle of cells.
#[derive(Debug, Clone)]
pub struct CellGrid {
    pub(crate) width: usize,
    pub(crate) height: usize,
    /// Pixels per cell edge, used to map pointer input onto slots.
    pub(crate) cell_size: u32,
    pub(crate) cells: Vec<Cell>,
    pub(crate) neighbors: Vec<Neighborhood>,
    pub(crate) selection: Selection,
    pub(crate) config: LifeConfig,
    /// Unpaused ticks executed so far.
    pub(crate) ticks: u64,
    /// Simulated seconds elapsed over those ticks.
    pub(crate) elapsed: f64,
}

impl CellGrid {
    /// Build an empty `width` x `height` grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyGrid`] if either dimension is zero,
    /// [`GridError::TooLarge`] if the slot count overflows, or
    /// [`GridError::Life`] if `config` fails validation.
    pub fn new(width: usize, height: usize, config: LifeConfig) -> Result<Self, GridError> {
        Self::with_cell_size(width, height, 1, config)
    }

    /// Build a grid that fills a `width_px` x `height_px` viewport with
    /// square cells of `cell_size` pixels. Partial cells at the right and
    /// bottom edges are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ZeroCellSize`] for a zero cell size, otherwise
    /// the same errors as [`CellGrid::new`].
    pub fn from_viewport(
        width_px: u32,
        height_px: u32,
        cell_size: u32,
        config: LifeConfig,
    ) -> Result<Self, GridError> {
        let width = width_px.checked_div(cell_size).ok_or(GridError::ZeroCellSize)?;
        let height = height_px.checked_div(cell_size).ok_or(GridError::ZeroCellSize)?;
        Self::with_cell_size(to_usize(width), to_usize(height), cell_size, config)
    }

    fn with_cell_size(
        width: usize,
        height: usize,
        cell_size: u32,
        config: LifeConfig,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        if cell_size == 0 {
            return Err(GridError::ZeroCellSize);
        }
        let len = width
            .checked_mul(height)
            .ok_or(GridError::TooLarge { width, height })?;
        config.validate()?;

        let cfg = &config;
        let cells: Vec<Cell> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::new(GridPos::new(x, y), cfg)))
            .collect();
        let neighbors: Vec<Neighborhood> = (0..height)
            .flat_map(|y| (0..width).map(move |x| neighborhood(x, y, width, height)))
            .collect();
        debug_assert_eq!(cells.len(), len);

        info!(width, height, cell_size, slots = len, "Grid built");

        Ok(Self {
            width,
            height,
            cell_size,
            cells,
            neighbors,
            selection: Selection::default(),
            config,
            ticks: 0,
            elapsed: 0.0,
        })
    }

    // -----------------------------------------------------------------------
    // Geometry and lookup
    // -----------------------------------------------------------------------

    /// Width in cells.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Pixels per cell edge.
    pub const fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// The life mechanics this grid runs with.
    pub const fn config(&self) -> &LifeConfig {
        &self.config
    }

    /// Unpaused ticks executed so far.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds elapsed.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Arena index of `(x, y)`, if it lies on the grid.
    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        linear_index(x, y, self.width)
    }

    /// The cell at `(x, y)`. Negative or out-of-range coordinates give `None`.
    pub fn get_cell(&self, x: i64, y: i64) -> Option<&Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.cells.get(self.index_of(x, y)?)
    }

    /// The cell at arena `index`.
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Cached neighbor indices of the slot at arena `index`.
    pub fn neighbors_of(&self, index: usize) -> Option<&Neighborhood> {
        self.neighbors.get(index)
    }

    /// Number of living cells.
    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Number of uneaten corpses.
    pub fn corpse_count(&self) -> usize {
        self.cells.iter().filter(|c| c.has_corpse()).count()
    }

    /// Arena index of `(x, y)` or an [`GridError::OutOfBounds`] error.
    pub(crate) fn checked_index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        self.index_of(x, y).ok_or(GridError::OutOfBounds {
            x: to_i64(x),
            y: to_i64(y),
            width: self.width,
            height: self.height,
        })
    }

    // -----------------------------------------------------------------------
    // Operator actions
    // -----------------------------------------------------------------------

    /// Bring a parentless cell to life at `(x, y)`, overwriting whatever is
    /// there.
    ///
    /// With `spawn_neighbors`, every neighbor slot is spawned as well and
    /// adopts the origin's hue and lineage, founding a nine-cell colony.
    /// Neighbors do not spawn their own neighbors.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `(x, y)` is not on the grid.
    pub fn spawn(
        &mut self,
        x: usize,
        y: usize,
        spawn_neighbors: bool,
        rng: &mut impl Rng,
    ) -> Result<(), GridError> {
        let index = self.checked_index(x, y)?;
        let config = &self.config;
        let Some(origin) = self.cells.get_mut(index) else {
            return Ok(());
        };
        origin.be_born(&Birth::Spontaneous, config, rng);
        let hue = origin.color().hue();
        let lineage = origin.lineage();

        if spawn_neighbors {
            let slots = self.neighbors.get(index).copied().unwrap_or_default();
            for n in slots.into_iter().flatten() {
                if let Some(cell) = self.cells.get_mut(n) {
                    cell.be_born(&Birth::Spontaneous, config, rng);
                    cell.join_colony(hue, lineage);
                }
            }
            info!(x, y, hue, lineage = ?lineage, "Colony founded");
        } else {
            debug!(x, y, hue, "Cell spawned");
        }
        Ok(())
    }

    /// Place a living cell with exactly the given genome, hue, and lineage.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `(x, y)` is not on the grid.
    pub fn implant(
        &mut self,
        x: usize,
        y: usize,
        genome: Genome,
        hue: f64,
        lineage: Option<LineageId>,
    ) -> Result<(), GridError> {
        let index = self.checked_index(x, y)?;
        if let Some(cell) = self.cells.get_mut(index) {
            cell.implant(genome, hue, lineage);
        }
        Ok(())
    }

    /// Kill every cell and return every slot to Empty. Clears the selection.
    pub fn clear_all(&mut self) {
        for cell in &mut self.cells {
            cell.die(&self.config);
            cell.reset(&self.config);
        }
        self.clear_selection();
        info!("Grid cleared");
    }

    /// Clear the grid, then spawn a parentless cell in every slot.
    pub fn reseed(&mut self, rng: &mut impl Rng) {
        self.clear_all();
        for cell in &mut self.cells {
            cell.be_born(&Birth::Spontaneous, &self.config, rng);
        }
        info!(slots = self.cells.len(), "Grid reseeded");
    }

    /// Human-readable description of the cell at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `(x, y)` is not on the grid.
    pub fn describe(&self, x: usize, y: usize) -> Result<String, GridError> {
        let index = self.checked_index(x, y)?;
        Ok(self.cells.get(index).map(ToString::to_string).unwrap_or_default())
    }
}

/// Mutable access to two distinct cells of the arena at once.
///
/// Returns `None` if `a == b` or either index is out of range.
pub(crate) fn pair_mut(cells: &mut [Cell], a: usize, b: usize) -> Option<(&mut Cell, &mut Cell)> {
    use core::cmp::Ordering;

    match a.cmp(&b) {
        Ordering::Less => {
            let (head, tail) = cells.split_at_mut_checked(b)?;
            Some((head.get_mut(a)?, tail.first_mut()?))
        }
        Ordering::Greater => {
            let (head, tail) = cells.split_at_mut_checked(a)?;
            let first = tail.first_mut()?;
            Some((first, head.get_mut(b)?))
        }
        Ordering::Equal => None,
    }
}

fn neighborhood(x: usize, y: usize, width: usize, height: usize) -> Neighborhood {
    let mut slots: Neighborhood = [None; 8];
    for (slot, (dx, dy)) in slots.iter_mut().zip(NEIGHBOR_OFFSETS) {
        *slot = shift(x, dx, width)
            .zip(shift(y, dy, height))
            .and_then(|(nx, ny)| linear_index(nx, ny, width));
    }
    slots
}

fn shift(v: usize, delta: isize, limit: usize) -> Option<usize> {
    v.checked_add_signed(delta).filter(|n| *n < limit)
}

fn linear_index(x: usize, y: usize, width: usize) -> Option<usize> {
    y.checked_mul(width)?.checked_add(x)
}

fn to_usize(v: u32) -> usize {
    usize::try_from(v).unwrap_or(usize::MAX)
}

fn to_i64(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
