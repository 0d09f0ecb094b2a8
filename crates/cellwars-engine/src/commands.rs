//! Console command parsing and dispatch.
//!
//! One command per line, words separated by whitespace:
//!
//! ```text
//! click X Y [shift|ctrl]   select the cell at (X, Y)
//! spawn X Y                found a colony at (X, Y)
//! describe X Y             print the cell info text
//! pause | resume | toggle  control the update pass
//! step                     run one update pass while paused
//! speed MS                 set the tick interval
//! stats                    log population statistics
//! reseed                   clear, then fill every slot
//! clear                    empty every slot
//! help                     list commands
//! quit                     stop the simulation
//! ```
//!
//! Coordinates are in cells. Clicks and spawns are turned into pointer
//! events at the slot's top-left pixel so they share the input path with a
//! graphical front end.

use std::str::FromStr;

use cellwars_core::input::InputEvent;
use cellwars_core::operator::OperatorState;
use cellwars_core::runner::GridCommand;
use cellwars_types::Modifier;
use tracing::{info, warn};

/// Usage text printed by `help`.
pub const USAGE: &str = "commands: click X Y [shift|ctrl], spawn X Y, describe X Y, pause, \
resume, toggle, step, speed MS, stats, reseed, clear, help, quit";

/// Errors from parsing a console line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line was blank.
    #[error("empty command")]
    Empty,

    /// The first word is not a known command.
    #[error("unknown command {0:?}")]
    Unknown(String),

    /// A required argument is absent.
    #[error("{command}: missing {argument}")]
    MissingArgument {
        /// The command being parsed.
        command: &'static str,
        /// The absent argument.
        argument: &'static str,
    },

    /// An argument is not a non-negative integer.
    #[error("{command}: {value:?} is not a valid number")]
    InvalidNumber {
        /// The command being parsed.
        command: &'static str,
        /// The rejected word.
        value: String,
    },

    /// The click modifier is not `shift` or `ctrl`.
    #[error("click: unknown modifier {0:?}")]
    UnknownModifier(String),

    /// More words than the command takes.
    #[error("{0}: too many arguments")]
    TooManyArguments(&'static str),
}

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Primary click on a slot.
    Click {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
        /// Held modifier.
        modifier: Modifier,
    },
    /// Secondary click on a slot.
    Spawn {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },
    /// Print a slot's info text.
    Describe {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },
    /// Pause the update pass.
    Pause,
    /// Resume the update pass.
    Resume,
    /// Flip pause.
    Toggle,
    /// One update pass while paused.
    Step,
    /// New tick interval in milliseconds.
    Speed(u64),
    /// Log population statistics.
    Stats,
    /// Clear and refill the grid.
    Reseed,
    /// Empty the grid.
    Clear,
    /// Print usage.
    Help,
    /// Stop the simulation.
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();

        let command = match name.as_str() {
            "click" => {
                let (x, y) = coords("click", &mut words)?;
                let modifier = match words.next() {
                    None => Modifier::None,
                    Some(word) => parse_modifier(word)?,
                };
                Self::Click { x, y, modifier }
            }
            "spawn" => {
                let (x, y) = coords("spawn", &mut words)?;
                Self::Spawn { x, y }
            }
            "describe" | "info" => {
                let (x, y) = coords("describe", &mut words)?;
                Self::Describe { x, y }
            }
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "toggle" | "p" => Self::Toggle,
            "step" => Self::Step,
            "speed" => Self::Speed(number("speed", "MS", &mut words)?),
            "stats" => Self::Stats,
            "reseed" | "r" => Self::Reseed,
            "clear" | "c" => Self::Clear,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(CommandError::Unknown(name)),
        };

        if words.next().is_some() {
            return Err(CommandError::TooManyArguments(command.name()));
        }
        Ok(command)
    }
}

impl ConsoleCommand {
    /// Canonical command word.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::Spawn { .. } => "spawn",
            Self::Describe { .. } => "describe",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Toggle => "toggle",
            Self::Step => "step",
            Self::Speed(_) => "speed",
            Self::Stats => "stats",
            Self::Reseed => "reseed",
            Self::Clear => "clear",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }

    /// The grid command this line queues, if any. `cell_size` converts
    /// slot coordinates to pixels.
    pub fn grid_command(self, cell_size: u32) -> Option<GridCommand> {
        match self {
            Self::Click { x, y, modifier } => Some(GridCommand::Input(InputEvent::Primary {
                px: to_pixel(x, cell_size),
                py: to_pixel(y, cell_size),
                modifier,
            })),
            Self::Spawn { x, y } => Some(GridCommand::Input(InputEvent::Secondary {
                px: to_pixel(x, cell_size),
                py: to_pixel(y, cell_size),
            })),
            Self::Describe { x, y } => Some(GridCommand::Describe { x, y }),
            Self::Stats => Some(GridCommand::Report),
            Self::Reseed => Some(GridCommand::Reseed),
            Self::Clear => Some(GridCommand::Clear),
            Self::Pause
            | Self::Resume
            | Self::Toggle
            | Self::Step
            | Self::Speed(_)
            | Self::Help
            | Self::Quit => None,
        }
    }

    /// Apply the operator-level part of this command.
    pub fn apply_to_operator(self, operator: &OperatorState) {
        match self {
            Self::Pause => {
                operator.pause();
                info!("Simulation paused");
            }
            Self::Resume => {
                operator.resume();
                info!("Simulation resumed");
            }
            Self::Toggle => {
                let paused = operator.toggle_pause();
                info!(paused, "Pause toggled");
            }
            Self::Step => {
                operator.pause();
                operator.request_step();
            }
            Self::Speed(ms) => match operator.set_tick_interval_ms(ms) {
                Some(previous) => info!(previous, current = ms, "Tick interval changed"),
                None => warn!(ms, "Tick interval rejected"),
            },
            Self::Help => info!("{USAGE}"),
            Self::Quit => operator.request_stop(),
            Self::Click { .. }
            | Self::Spawn { .. }
            | Self::Describe { .. }
            | Self::Stats
            | Self::Reseed
            | Self::Clear => {}
        }
    }
}

fn coords<'a>(
    command: &'static str,
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<(usize, usize), CommandError> {
    let x = number(command, "X", words)?;
    let y = number(command, "Y", words)?;
    Ok((x, y))
}

fn number<'a, T: FromStr>(
    command: &'static str,
    argument: &'static str,
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<T, CommandError> {
    let word = words
        .next()
        .ok_or(CommandError::MissingArgument { command, argument })?;
    word.parse().ok().ok_or_else(|| CommandError::InvalidNumber {
        command,
        value: word.to_owned(),
    })
}

fn parse_modifier(word: &str) -> Result<Modifier, CommandError> {
    match word.to_ascii_lowercase().as_str() {
        "shift" | "lineage" => Ok(Modifier::Shift),
        "ctrl" | "control" | "family" => Ok(Modifier::Control),
        _ => Err(CommandError::UnknownModifier(word.to_owned())),
    }
}

/// Top-left pixel of a slot. Saturates, so a huge coordinate still lands
/// outside the grid and is rejected there.
fn to_pixel(coord: usize, cell_size: u32) -> u32 {
    u32::try_from(coord)
        .unwrap_or(u32::MAX)
        .saturating_mul(cell_size)
}
