use equiplot_domain::errors::{ChartError, LoadError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("export failed: {0}")]
    Export(String),
}
