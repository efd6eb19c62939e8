use crate::errors::LoadError;
use crate::value_objects::backtest_document::BacktestDocument;
use std::path::Path;

pub trait BacktestReader {
    fn read_backtest(&self, path: &Path) -> Result<BacktestDocument, LoadError>;
}
