use crate::value_objects::equity_point::EquityPoint;
use crate::value_objects::trade::Trade;
use serde::{Deserialize, Serialize};

/// Result file written by a backtest run. Only `equityCurve` and `trades` are
/// required; the ratio fields are carried through when the engine emits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestDocument {
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharpe_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_drawdown: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<f64>,
}
