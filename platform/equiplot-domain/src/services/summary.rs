use crate::value_objects::backtest_document::BacktestDocument;
use crate::value_objects::direction::Direction;
use crate::value_objects::equity_point::EquityPoint;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub equity_points: usize,
    pub initial_equity: Option<f64>,
    pub final_equity: Option<f64>,
    pub total_return: Option<f64>,
    pub total_return_pct: Option<f64>,
    pub total_trades: usize,
    pub long_entries: usize,
    pub short_entries: usize,
    pub closes: usize,
    pub other_trades: usize,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub win_rate: Option<f64>,
}

pub fn summarize(document: &BacktestDocument) -> PerformanceSummary {
    let initial = document.equity_curve.first().map(|p| p.equity);
    let last = document.equity_curve.last().map(|p| p.equity);
    let base = return_base(&document.equity_curve);

    let mut long_entries = 0;
    let mut short_entries = 0;
    let mut closes = 0;
    let mut other_trades = 0;
    for trade in &document.trades {
        match trade.direction {
            Direction::Long => long_entries += 1,
            Direction::Short => short_entries += 1,
            Direction::Close => closes += 1,
            Direction::Other(_) => other_trades += 1,
        }
    }

    PerformanceSummary {
        equity_points: document.equity_curve.len(),
        initial_equity: initial,
        final_equity: last,
        total_return: initial.zip(last).map(|(first, last)| last - first),
        total_return_pct: last.map(|last| pct_from(base, last)),
        total_trades: document.trades.len(),
        long_entries,
        short_entries,
        closes,
        other_trades,
        sharpe_ratio: document.sharpe_ratio,
        max_drawdown: document.max_drawdown,
        win_rate: document.win_rate,
    }
}

/// Percent return of every point against the first equity value.
pub fn returns_pct(points: &[EquityPoint]) -> Vec<(i64, f64)> {
    let base = return_base(points);
    points
        .iter()
        .map(|p| (p.timestamp, pct_from(base, p.equity)))
        .collect()
}

// A zero (or missing) starting equity is replaced by 1 so the series stays finite.
fn return_base(points: &[EquityPoint]) -> f64 {
    match points.first().map(|p| p.equity) {
        Some(first) if first != 0.0 => first,
        _ => 1.0,
    }
}

fn pct_from(base: f64, equity: f64) -> f64 {
    (equity / base - 1.0) * 100.0
}
