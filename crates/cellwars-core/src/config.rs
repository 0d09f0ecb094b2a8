//! Configuration loading and typed config structures for Cell Wars.
//!
//! The canonical configuration lives in `cellwars-config.yaml` at the project
//! root. Every section and field has a default, so an empty or missing file
//! yields a runnable setup. Cell life tunables are the `life` section and
//! deserialize straight into [`LifeConfig`].

use std::path::Path;

use cellwars_cells::{CellError, LifeConfig};
use serde::Deserialize;

/// Environment variable that overrides `world.seed`.
pub const SEED_ENV_VAR: &str = "CELLWARS_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The `life` section failed validation.
    #[error("invalid life configuration: {source}")]
    Life {
        /// The underlying validation error.
        #[from]
        source: CellError,
    },

    /// The simulated step is negative or not a finite number.
    #[error("time.step_seconds must be a finite, non-negative number, got {value}")]
    InvalidStep {
        /// The rejected step.
        value: f64,
    },

    /// The seed override is not an unsigned integer.
    #[error("{SEED_ENV_VAR} must be an unsigned integer, got {value:?}")]
    InvalidSeed {
        /// The rejected value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `cellwars-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Grid dimensions and seed.
    #[serde(default)]
    pub world: WorldConfig,

    /// Tick pacing and simulated step length.
    #[serde(default)]
    pub time: TimeConfig,

    /// Cell life mechanics.
    #[serde(default)]
    pub life: LifeConfig,

    /// Initial population.
    #[serde(default)]
    pub seeding: SeedingConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `CELLWARS_SEED` overrides `world.seed` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or a
    /// validation error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    ///
    /// # Errors
    ///
    /// Same as [`SimulationConfig::from_file`].
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or a
    /// validation error.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty mapping.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSeed`] if `CELLWARS_SEED` is set but not
    /// a valid `u64`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let raw = std::env::var(SEED_ENV_VAR).ok();
        self.world.override_seed(raw.as_deref())
    }

    /// Check cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStep`] for an unusable step length, or
    /// [`ConfigError::Life`] if the life section is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time.validate()?;
        self.life.validate()?;
        Ok(())
    }
}

/// Grid dimensions and randomness.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Seed for the simulation RNG; absent means seed from entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Grid width in cells.
    #[serde(default = "default_width")]
    pub width: usize,

    /// Grid height in cells.
    #[serde(default = "default_height")]
    pub height: usize,

    /// Viewport width in pixels; with `viewport_height`, replaces `width`.
    #[serde(default)]
    pub viewport_width: Option<u32>,

    /// Viewport height in pixels; with `viewport_width`, replaces `height`.
    #[serde(default)]
    pub viewport_height: Option<u32>,

    /// Pixels per cell edge.
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
}

impl WorldConfig {
    /// Replace the seed with `raw`, if given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSeed`] if `raw` is not a valid `u64`.
    pub fn override_seed(&mut self, raw: Option<&str>) -> Result<(), ConfigError> {
        let Some(raw) = raw else {
            return Ok(());
        };
        let seed = raw
            .trim()
            .parse::<u64>()
            .ok()
            .ok_or_else(|| ConfigError::InvalidSeed {
                value: raw.to_owned(),
            })?;
        self.seed = Some(seed);
        Ok(())
    }

    /// The viewport in pixels, when both of its dimensions are configured.
    pub const fn viewport(&self) -> Option<(u32, u32)> {
        match (self.viewport_width, self.viewport_height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            width: default_width(),
            height: default_height(),
            viewport_width: None,
            viewport_height: None,
            cell_size: default_cell_size(),
        }
    }
}

/// Tick pacing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeConfig {
    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Simulated seconds fed to every tick.
    #[serde(default = "default_step_seconds")]
    pub step_seconds: f64,
}

impl TimeConfig {
    /// Cells age by `step_seconds` every tick, so it must be a finite,
    /// non-negative number.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStep`] otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_seconds.is_finite() && self.step_seconds >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidStep {
                value: self.step_seconds,
            })
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            step_seconds: default_step_seconds(),
        }
    }
}

/// Initial population.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedingConfig {
    /// Colonies founded at random positions on startup.
    #[serde(default = "default_initial_colonies")]
    pub initial_colonies: u32,

    /// Spawn a parentless cell in every slot on startup.
    #[serde(default)]
    pub fill_on_start: bool,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            initial_colonies: default_initial_colonies(),
            fill_on_start: false,
        }
    }
}

/// Simulation boundary configuration.
///
/// A value of 0 for either `max_ticks` or `max_real_time_seconds` means
/// unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of unpaused ticks before the simulation ends.
    #[serde(default)]
    pub max_ticks: u64,

    /// Maximum wall-clock seconds before the simulation ends.
    #[serde(default)]
    pub max_real_time_seconds: u64,

    /// End the run when no living cell remains.
    #[serde(default)]
    pub stop_on_extinction: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Population report every N ticks (0 disables periodic reports).
    #[serde(default = "default_report_interval_ticks")]
    pub report_interval_ticks: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            report_interval_ticks: default_report_interval_ticks(),
        }
    }
}

const fn default_width() -> usize {
    100
}

const fn default_height() -> usize {
    75
}

const fn default_cell_size() -> u32 {
    8
}

const fn default_tick_interval_ms() -> u64 {
    50
}

const fn default_step_seconds() -> f64 {
    0.05
}

const fn default_initial_colonies() -> u32 {
    4
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_report_interval_ticks() -> u64 {
    200
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.width, 100);
        assert_eq!(config.world.height, 75);
        assert!(config.world.seed.is_none());
        assert_eq!(config.seeding.initial_colonies, 4);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
world:
  seed: 123
  width: 40
  height: 30
  cell_size: 4

time:
  tick_interval_ms: 10
  step_seconds: 0.1

life:
  mutation_range: 0.5
  max_breed_attempts: 2
  damage_bounds:
    min: 0.5
    max: 6.0

seeding:
  initial_colonies: 10
  fill_on_start: true

simulation:
  max_ticks: 500
  max_real_time_seconds: 60
  stop_on_extinction: true

logging:
  level: debug
  format: json
  report_interval_ticks: 25
";
        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.world.width, 40);
        assert_eq!(config.world.cell_size, 4);
        assert_eq!(config.time.tick_interval_ms, 10);
        assert!((config.time.step_seconds - 0.1).abs() < f64::EPSILON);
        assert!((config.life.mutation_range - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.life.max_breed_attempts, 2);
        assert!((config.life.damage_bounds.max - 6.0).abs() < f64::EPSILON);
        assert!((config.life.max_health_floor - 10.0).abs() < f64::EPSILON);
        assert!(config.seeding.fill_on_start);
        assert_eq!(config.simulation.max_ticks, 500);
        assert!(config.simulation.stop_on_extinction);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.report_interval_ticks, 25);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("world:\n  width: 12\n");
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.world.width, 12);
        assert_eq!(config.world.height, 75);
        assert_eq!(config.time.tick_interval_ms, 50);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(SimulationConfig::parse("").is_ok());
    }

    #[test]
    fn invalid_life_section_rejected() {
        let yaml = "life:\n  breed_health_fraction: 2.0\n";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Life { .. })
        ));
    }

    #[test]
    fn unusable_step_rejected() {
        for yaml in [
            "time:\n  step_seconds: -1.0\n",
            "time:\n  step_seconds: .nan\n",
            "time:\n  step_seconds: .inf\n",
        ] {
            assert!(
                matches!(
                    SimulationConfig::parse(yaml),
                    Err(ConfigError::InvalidStep { .. })
                ),
                "accepted {yaml:?}"
            );
        }
        assert!(SimulationConfig::parse("time:\n  step_seconds: 0.0\n").is_ok());
    }

    #[test]
    fn malformed_yaml_rejected() {
        assert!(matches!(
            SimulationConfig::parse("world: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn seed_override() {
        let mut world = WorldConfig::default();
        assert!(world.override_seed(None).is_ok());
        assert!(world.seed.is_none());
        assert!(world.override_seed(Some(" 77 ")).is_ok());
        assert_eq!(world.seed, Some(77));
        assert!(matches!(
            world.override_seed(Some("abc")),
            Err(ConfigError::InvalidSeed { .. })
        ));
        assert_eq!(world.seed, Some(77));
    }

    #[test]
    fn viewport_needs_both_dimensions() {
        let mut world = WorldConfig {
            viewport_width: Some(640),
            ..WorldConfig::default()
        };
        assert!(world.viewport().is_none());
        world.viewport_height = Some(480);
        assert_eq!(world.viewport(), Some((640, 480)));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("cellwars-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
