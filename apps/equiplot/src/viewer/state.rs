use crate::logging::SharedLogBuffer;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use equiplot_application::config::Config;
use equiplot_application::plotting::PreparedChart;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    Equity,
    Returns,
}

impl ChartView {
    pub fn toggled(self) -> Self {
        match self {
            Self::Equity => Self::Returns,
            Self::Returns => Self::Equity,
        }
    }
}

pub struct ViewerState {
    pub chart: PreparedChart,
    pub config: Config,
    pub artifacts: Vec<PathBuf>,
    pub logs: SharedLogBuffer,
    pub view: ChartView,
    pub show_logs: bool,
    pub dirty: bool,
}

impl ViewerState {
    pub fn new(
        chart: PreparedChart,
        config: Config,
        artifacts: Vec<PathBuf>,
        logs: SharedLogBuffer,
    ) -> Self {
        Self {
            chart,
            config,
            artifacts,
            logs,
            view: ChartView::Equity,
            show_logs: false,
            dirty: true,
        }
    }

    /// Returns `true` when the viewer should close.
    pub fn on_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => self.on_key(key),
            Event::Resize(_, _) => {
                self.dirty = true;
                false
            }
            _ => false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
            KeyCode::Char('q') | KeyCode::Esc => true,
            KeyCode::Char('r') => {
                self.view = self.view.toggled();
                self.dirty = true;
                false
            }
            KeyCode::Char('l') => {
                self.show_logs = !self.show_logs;
                self.dirty = true;
                false
            }
            _ => false,
        }
    }
}
