//! Shared type definitions for the Cell Wars simulation.
//!
//! This crate holds the plain data types that flow between the cell logic,
//! the grid orchestrator, and the engine binary. Nothing here touches grid
//! state or performs I/O.
//!
//! # Modules
//!
//! - [`color`] -- HSV cell color with cyclic hue arithmetic ([`CellColor`])
//! - [`enums`] -- Life-cycle states, selection modes, input modifiers
//! - [`ids`] -- Lineage (primogenitor) identifier ([`LineageId`])
//! - [`position`] -- Grid coordinates ([`GridPos`])
//! - [`stats`] -- Population aggregate structs ([`PopulationStats`])

pub mod color;
pub mod enums;
pub mod ids;
pub mod position;
pub mod stats;

// Re-export all public types at crate root for convenience.
pub use color::{CellColor, HUE_RANGE, Rgb, hue_distance};
pub use enums::{CellState, Modifier, SelectionMode};
pub use ids::LineageId;
pub use position::GridPos;
pub use stats::{PopulationStats, TraitSummary};
