//! Grid orchestration, tick loop, and operator controls for Cell Wars.
//!
//! This crate owns the cell arena and everything that touches more than one
//! cell at a time: the in-place update pass, selection highlighting,
//! population aggregates, input mapping, and the async run loop that paces
//! ticks for the engine binary.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `cellwars-config.yaml` into
//!   strongly-typed structs.
//! - [`error`] -- Grid construction and coordinate errors ([`GridError`]).
//! - [`grid`] -- The [`CellGrid`] arena with cached neighbor indices.
//! - [`input`] -- Pointer events mapped to selection and spawning.
//! - [`operator`] -- Shared pause, step, speed, and stop state.
//! - [`render`] -- The per-frame draw hand-off ([`RenderCell`]).
//! - [`runner`] -- The bounded async simulation loop.
//! - [`selection`] -- Single, familial, and lineage highlighting.
//! - [`stats`] -- Population maxima and means.
//! - [`tick`] -- The per-tick update pass.
//!
//! [`GridError`]: error::GridError
//! [`CellGrid`]: grid::CellGrid
//! [`RenderCell`]: render::RenderCell

pub mod config;
pub mod error;
pub mod grid;
pub mod input;
pub mod operator;
pub mod render;
pub mod runner;
pub mod selection;
pub mod stats;
pub mod tick;
