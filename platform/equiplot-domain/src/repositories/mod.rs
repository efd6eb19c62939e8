pub mod backtest;
pub mod exports;
