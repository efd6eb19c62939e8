use crate::reporting;
use equiplot_domain::repositories::exports::{AnalysisPage, ChartExporter};
use equiplot_domain::services::chart::{LinePoint, TradeMarker};
use equiplot_domain::services::summary::PerformanceSummary;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemChartExporter;

impl FilesystemChartExporter {
    pub fn new() -> Self {
        Self
    }
}

impl ChartExporter for FilesystemChartExporter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String> {
        fs::create_dir_all(path)
            .map_err(|err| format!("failed to create dir {}: {}", path.display(), err))
    }

    fn write_equity_csv(
        &self,
        path: &Path,
        line: &[LinePoint],
        time_format: &str,
    ) -> Result<(), String> {
        reporting::write_equity_csv(path, line, time_format)
    }

    fn write_markers_csv(
        &self,
        path: &Path,
        markers: &[TradeMarker],
        time_format: &str,
    ) -> Result<(), String> {
        reporting::write_markers_csv(path, markers, time_format)
    }

    fn write_summary_json(
        &self,
        path: &Path,
        summary: &PerformanceSummary,
        meta: &serde_json::Value,
    ) -> Result<(), String> {
        reporting::write_summary_json(path, summary, meta)
    }

    fn write_analysis_html(&self, path: &Path, page: &AnalysisPage<'_>) -> Result<(), String> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.ensure_dir(parent)?;
        }
        reporting::write_analysis_html(path, page)
    }
}
