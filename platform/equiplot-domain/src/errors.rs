use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn the input file into a `BacktestDocument`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read backtest file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed JSON in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("unexpected document shape in {}: {source}", path.display())]
    Schema {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("{context}: timestamp {timestamp_ms} ms is outside the supported date range")]
    TimestampOutOfRange { timestamp_ms: i64, context: String },
    #[error("trades[{index}]: unsupported direction '{direction}'")]
    UnknownDirection { index: usize, direction: String },
}
