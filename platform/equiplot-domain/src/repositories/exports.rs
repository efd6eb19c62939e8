use crate::services::chart::{ChartModel, LinePoint, TradeMarker};
use crate::services::summary::PerformanceSummary;
use std::path::Path;

/// Everything the standalone HTML analysis page shows.
pub struct AnalysisPage<'a> {
    pub title: &'a str,
    pub time_format: &'a str,
    pub model: &'a ChartModel,
    pub summary: &'a PerformanceSummary,
    pub returns: &'a [(i64, f64)],
}

pub trait ChartExporter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String>;
    fn write_equity_csv(
        &self,
        path: &Path,
        line: &[LinePoint],
        time_format: &str,
    ) -> Result<(), String>;
    fn write_markers_csv(
        &self,
        path: &Path,
        markers: &[TradeMarker],
        time_format: &str,
    ) -> Result<(), String>;
    fn write_summary_json(
        &self,
        path: &Path,
        summary: &PerformanceSummary,
        meta: &serde_json::Value,
    ) -> Result<(), String>;
    fn write_analysis_html(&self, path: &Path, page: &AnalysisPage<'_>) -> Result<(), String>;
}
