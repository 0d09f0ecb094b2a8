//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of engine startup so `main` can
//! propagate with `?`. Console input errors are not here: they are logged
//! and the simulation keeps running.

use cellwars_core::config::ConfigError;
use cellwars_core::error::GridError;

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Grid construction or initial seeding failed.
    #[error("grid error: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: GridError,
    },
}
