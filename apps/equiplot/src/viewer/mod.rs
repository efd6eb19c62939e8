mod axis;
pub mod state;
pub mod ui;

pub use state::{ChartView, ViewerState};

use ratatui::backend::Backend;
use ratatui::Terminal;

/// Redraws on demand and blocks on terminal input until a quit key arrives.
pub fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut ViewerState,
) -> Result<(), String> {
    loop {
        if state.dirty {
            terminal
                .draw(|frame| ui::draw(frame, state))
                .map_err(|err| format!("terminal draw failed: {err}"))?;
            state.dirty = false;
        }

        let event = crossterm::event::read()
            .map_err(|err| format!("failed to read terminal event: {err}"))?;
        if state.on_event(event) {
            return Ok(());
        }
    }
}
