pub mod backtest_document;
pub mod direction;
pub mod equity_point;
pub mod trade;
