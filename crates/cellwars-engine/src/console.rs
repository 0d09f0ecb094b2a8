//! Background tasks feeding operator input into the run loop.

use std::sync::Arc;

use cellwars_core::operator::OperatorState;
use cellwars_core::runner::GridCommand;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::commands::{CommandError, ConsoleCommand};

/// Read commands line by line until EOF or until the run loop goes away.
///
/// Operator commands take effect immediately; grid commands are queued for
/// the next tick. Bad lines are logged and skipped.
pub async fn read_commands<R>(
    reader: R,
    operator: Arc<OperatorState>,
    grid_tx: mpsc::Sender<GridCommand>,
    cell_size: u32,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Console input closed");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Console read failed");
                return;
            }
        };

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                warn!(error = %e, "Console command rejected");
                continue;
            }
        };

        command.apply_to_operator(&operator);
        let delivered = match command.grid_command(cell_size) {
            Some(grid_command) => grid_tx.send(grid_command).await.is_ok(),
            None => true,
        };
        if !delivered {
            debug!("Run loop finished, console reader exiting");
            return;
        }
        if command == ConsoleCommand::Quit {
            return;
        }
    }
}

/// Request a clean stop on Ctrl-C.
pub async fn stop_on_ctrl_c(operator: Arc<OperatorState>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Ctrl-C received, stopping");
            operator.request_stop();
        }
        Err(e) => warn!(error = %e, "Could not listen for Ctrl-C"),
    }
}
