use equiplot_domain::errors::LoadError;
use equiplot_domain::repositories::backtest::BacktestReader;
use equiplot_domain::value_objects::backtest_document::BacktestDocument;
use serde_json::error::Category;
use std::fs;
use std::path::Path;

/// Reads backtest result documents from local JSON files.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemBacktestReader;

impl FilesystemBacktestReader {
    pub fn new() -> Self {
        Self
    }
}

impl BacktestReader for FilesystemBacktestReader {
    fn read_backtest(&self, path: &Path) -> Result<BacktestDocument, LoadError> {
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = raw.len(), "backtest file read");
        parse_backtest_str(path, &raw)
    }
}

/// Parses one document. `path` only labels errors.
pub fn parse_backtest_str(path: &Path, raw: &str) -> Result<BacktestDocument, LoadError> {
    serde_json::from_str(raw).map_err(|source| match source.classify() {
        Category::Data => LoadError::Schema {
            path: path.to_path_buf(),
            source,
        },
        Category::Syntax | Category::Eof | Category::Io => LoadError::Malformed {
            path: path.to_path_buf(),
            source,
        },
    })
}
