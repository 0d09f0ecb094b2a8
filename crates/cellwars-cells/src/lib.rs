//! Cell genome, kinship, and life-cycle state for the Cell Wars simulation.
//!
//! Everything in this crate concerns one cell, or one cell and a single
//! neighbor. Iterating the grid, choosing targets, and pairing mutable
//! borrows belong to `cellwars-core`.
//!
//! # Modules
//!
//! - [`cell`] -- The per-slot [`Cell`] and its state transitions
//! - [`config`] -- Life mechanics tunables ([`LifeConfig`])
//! - [`error`] -- Configuration validation errors ([`CellError`])
//! - [`genome`] -- Heritable traits and their clamped derivation ([`Genome`])
//! - [`kinship`] -- Close family, extended family, and enemy tests

pub mod cell;
pub mod config;
pub mod error;
pub mod genome;
pub mod kinship;

pub use cell::{Birth, Cell, DeathCause, Heritage, Parentage};
pub use config::{LifeConfig, Span};
pub use error::CellError;
pub use genome::Genome;
pub use kinship::{is_close_family, is_enemy, is_extended_family, provokes_hostility};
