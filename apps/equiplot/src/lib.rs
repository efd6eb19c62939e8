pub mod headless;
pub mod logging;
pub mod obs;
pub mod viewer;

use crate::logging::SharedLogBuffer;
use crate::viewer::ViewerState;
use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use equiplot_application::config::Config;
use equiplot_application::plotting::PreparedChart;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::path::PathBuf;

pub struct ViewerOpts {
    pub chart: PreparedChart,
    pub config: Config,
    pub artifacts: Vec<PathBuf>,
    pub log_store: SharedLogBuffer,
}

/// Opens the chart in the terminal and returns once the user closes it.
/// The terminal is restored on every exit path.
pub fn run(opts: ViewerOpts) -> Result<(), String> {
    enable_raw_mode().map_err(|err| format!("failed to enable raw mode: {err}"))?;
    let result = run_in_alternate_screen(opts);
    restore_terminal();
    result
}

fn run_in_alternate_screen(opts: ViewerOpts) -> Result<(), String> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Clear(ClearType::All))
        .map_err(|err| format!("failed to enter alternate screen: {err}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|err| format!("failed to init terminal: {err}"))?;
    terminal
        .hide_cursor()
        .map_err(|err| format!("failed to hide cursor: {err}"))?;

    let mut state = ViewerState::new(opts.chart, opts.config, opts.artifacts, opts.log_store);
    tracing::info!("viewer opened");
    let result = viewer::run_loop(&mut terminal, &mut state);
    tracing::info!("viewer closed");
    result
}

fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();
}
