use crate::errors::ChartError;
use crate::services::time::TimeZoneChoice;
use crate::value_objects::backtest_document::BacktestDocument;
use crate::value_objects::direction::Direction;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Position opened long; drawn pointing up.
    Entry,
    /// Position closed; drawn pointing down.
    Exit,
}

impl MarkerKind {
    /// Only `LONG` and `CLOSE` trades are charted.
    pub fn for_direction(direction: &Direction) -> Option<Self> {
        match direction {
            Direction::Long => Some(Self::Entry),
            Direction::Close => Some(Self::Exit),
            Direction::Short | Direction::Other(_) => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Entry => "LONG",
            Self::Exit => "CLOSE",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Entry => "▲",
            Self::Exit => "▼",
        }
    }
}

/// What to do with a trade whose direction has no marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownDirectionPolicy {
    #[default]
    Skip,
    Reject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    pub timestamp_ms: i64,
    pub time: DateTime<FixedOffset>,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeMarker {
    pub timestamp_ms: i64,
    pub time: DateTime<FixedOffset>,
    pub price: f64,
    pub kind: MarkerKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTrade {
    pub index: usize,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub zone: TimeZoneChoice,
    pub line: Vec<LinePoint>,
    pub markers: Vec<TradeMarker>,
    pub skipped: Vec<SkippedTrade>,
}

impl ChartModel {
    pub fn marker_count(&self, kind: MarkerKind) -> usize {
        self.markers.iter().filter(|m| m.kind == kind).count()
    }

    /// Earliest and latest timestamp across the line and the markers.
    pub fn time_bounds(&self) -> Option<(i64, i64)> {
        let stamps = self
            .line
            .iter()
            .map(|p| p.timestamp_ms)
            .chain(self.markers.iter().map(|m| m.timestamp_ms));
        min_max(stamps)
    }

    /// Value range shared by equity and trade prices, as they sit on one axis.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let values = self
            .line
            .iter()
            .map(|p| p.equity)
            .chain(self.markers.iter().map(|m| m.price))
            .filter(|v| v.is_finite());
        let mut bounds: Option<(f64, f64)> = None;
        for value in values {
            bounds = Some(match bounds {
                None => (value, value),
                Some((lo, hi)) => (lo.min(value), hi.max(value)),
            });
        }
        bounds
    }
}

fn min_max(values: impl Iterator<Item = i64>) -> Option<(i64, i64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

pub fn build_chart_model(
    document: &BacktestDocument,
    zone: TimeZoneChoice,
    policy: UnknownDirectionPolicy,
) -> Result<ChartModel, ChartError> {
    let line = document
        .equity_curve
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            let time = convert(zone, point.timestamp, || format!("equityCurve[{idx}]"))?;
            Ok(LinePoint {
                timestamp_ms: point.timestamp,
                time,
                equity: point.equity,
            })
        })
        .collect::<Result<Vec<_>, ChartError>>()?;

    let mut markers = Vec::new();
    let mut skipped = Vec::new();
    for (idx, trade) in document.trades.iter().enumerate() {
        // Every trade time is converted, charted or not, so a bad timestamp
        // fails the run the same way regardless of direction.
        let time = convert(zone, trade.timestamp, || format!("trades[{idx}]"))?;
        match MarkerKind::for_direction(&trade.direction) {
            Some(kind) => markers.push(TradeMarker {
                timestamp_ms: trade.timestamp,
                time,
                price: trade.price,
                kind,
            }),
            None if policy == UnknownDirectionPolicy::Reject => {
                return Err(ChartError::UnknownDirection {
                    index: idx,
                    direction: trade.direction.label().to_string(),
                });
            }
            None => skipped.push(SkippedTrade {
                index: idx,
                direction: trade.direction.clone(),
            }),
        }
    }

    Ok(ChartModel {
        zone,
        line,
        markers,
        skipped,
    })
}

fn convert(
    zone: TimeZoneChoice,
    timestamp_ms: i64,
    context: impl FnOnce() -> String,
) -> Result<DateTime<FixedOffset>, ChartError> {
    zone.at(timestamp_ms)
        .ok_or_else(|| ChartError::TimestampOutOfRange {
            timestamp_ms,
            context: context(),
        })
}
