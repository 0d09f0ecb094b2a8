//! Tick callback for the headless console.
//!
//! Logs a population report every `report_interval_ticks` unpaused ticks and
//! runs a render pass after every tick so highlight flags expire exactly as
//! they would under a graphical front end.

use cellwars_core::runner::{SimulationState, TickCallback, report_population};
use cellwars_core::tick::TickSummary;
use tracing::trace;

/// Periodic population logger and headless renderer.
pub struct ConsoleReporter {
    /// Report period in ticks; 0 disables reports.
    interval: u64,
    /// Highlighted slots in the most recent frame.
    last_highlighted: usize,
}

impl ConsoleReporter {
    /// Create a reporter that logs every `interval` ticks.
    pub const fn new(interval: u64) -> Self {
        Self {
            interval,
            last_highlighted: 0,
        }
    }

    /// Highlighted slots drawn in the most recent frame.
    pub const fn last_highlighted(&self) -> usize {
        self.last_highlighted
    }

    const fn report_due(&self, summary: &TickSummary) -> bool {
        !summary.paused
            && self.interval > 0
            && summary.tick > 0
            && matches!(summary.tick.checked_rem(self.interval), Some(0))
    }
}

impl TickCallback for ConsoleReporter {
    fn on_tick(&mut self, summary: &TickSummary, state: &mut SimulationState) {
        if self.report_due(summary) {
            report_population(&state.grid);
        }

        let mut highlighted = 0_usize;
        state.grid.render_pass(|cell| {
            if cell.selected {
                highlighted = highlighted.saturating_add(1);
            }
        });
        if highlighted != self.last_highlighted {
            trace!(tick = summary.tick, highlighted, "Highlight set changed");
        }
        self.last_highlighted = highlighted;
    }
}
