pub mod artifacts;
pub mod backtest_json;
pub mod reporting;
