//! Error types for grid construction and coordinate lookups.
//!
//! Nothing inside a tick can fail. These errors only surface when the grid is
//! built or when an operator addresses a slot that does not exist.

use cellwars_cells::CellError;

/// Errors raised by [`CellGrid`](crate::grid::CellGrid) operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// The grid would have no slots.
    #[error("grid must have at least one slot, got {width}x{height}")]
    EmptyGrid {
        /// Requested width in cells.
        width: usize,
        /// Requested height in cells.
        height: usize,
    },

    /// The slot count does not fit in memory addressing.
    #[error("grid of {width}x{height} cells is too large")]
    TooLarge {
        /// Requested width in cells.
        width: usize,
        /// Requested height in cells.
        height: usize,
    },

    /// A viewport was given with a zero cell size.
    #[error("cell size must be at least one pixel")]
    ZeroCellSize,

    /// Coordinates outside the grid.
    #[error("coordinates ({x}, {y}) are outside the {width}x{height} grid")]
    OutOfBounds {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Grid width in cells.
        width: usize,
        /// Grid height in cells.
        height: usize,
    },

    /// The life configuration failed validation.
    #[error("invalid life configuration: {source}")]
    Life {
        /// The underlying validation error.
        #[from]
        source: CellError,
    },
}
