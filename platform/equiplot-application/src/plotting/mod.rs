use crate::config::Config;
use crate::errors::PlotError;
use equiplot_domain::repositories::backtest::BacktestReader;
use equiplot_domain::repositories::exports::{AnalysisPage, ChartExporter};
use equiplot_domain::services::chart::{build_chart_model, ChartModel, MarkerKind};
use equiplot_domain::services::summary::{returns_pct, summarize, PerformanceSummary};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info_span;

/// Loaded and transformed input, ready for the viewer or the exporters.
#[derive(Debug, Clone)]
pub struct PreparedChart {
    pub input: PathBuf,
    pub model: ChartModel,
    pub summary: PerformanceSummary,
    pub returns: Vec<(i64, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct ExportTargets {
    pub html: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

pub fn prepare_chart(
    input: &Path,
    config: &Config,
    reader: &dyn BacktestReader,
) -> Result<PreparedChart, PlotError> {
    let _span = info_span!("prepare_chart", input = %input.display()).entered();
    config.validate().map_err(PlotError::Config)?;

    let stage_start = Instant::now();
    let document = reader.read_backtest(input)?;
    let model = build_chart_model(
        &document,
        config.chart.timezone,
        config.markers.unknown_direction,
    )?;

    for skipped in &model.skipped {
        tracing::debug!(
            index = skipped.index,
            direction = %skipped.direction,
            "trade direction has no marker, skipped"
        );
    }

    let summary = summarize(&document);
    let returns = returns_pct(&document.equity_curve);

    tracing::info!(
        line_points = model.line.len(),
        long_markers = model.marker_count(MarkerKind::Entry),
        close_markers = model.marker_count(MarkerKind::Exit),
        skipped = model.skipped.len(),
        timezone = model.zone.label(),
        elapsed_ms = stage_start.elapsed().as_millis() as u64,
        "chart prepared"
    );

    Ok(PreparedChart {
        input: input.to_path_buf(),
        model,
        summary,
        returns,
    })
}

/// Writes the requested artifacts and returns their paths in write order.
pub fn export_artifacts(
    prepared: &PreparedChart,
    config: &Config,
    targets: &ExportTargets,
    exporter: &dyn ChartExporter,
) -> Result<Vec<PathBuf>, PlotError> {
    let _span = info_span!("export_artifacts").entered();
    let time_format = config.chart.time_format.as_str();
    let mut written = Vec::new();

    if let Some(dir) = &targets.export_dir {
        exporter.ensure_dir(dir).map_err(PlotError::Export)?;

        let equity_path = dir.join("equity.csv");
        exporter
            .write_equity_csv(&equity_path, &prepared.model.line, time_format)
            .map_err(PlotError::Export)?;
        written.push(equity_path);

        let markers_path = dir.join("markers.csv");
        exporter
            .write_markers_csv(&markers_path, &prepared.model.markers, time_format)
            .map_err(PlotError::Export)?;
        written.push(markers_path);

        let summary_path = dir.join("summary.json");
        exporter
            .write_summary_json(&summary_path, &prepared.summary, &chart_meta(prepared, config))
            .map_err(PlotError::Export)?;
        written.push(summary_path);
    }

    if let Some(path) = &targets.html {
        let page = AnalysisPage {
            title: &config.chart.title,
            time_format,
            model: &prepared.model,
            summary: &prepared.summary,
            returns: &prepared.returns,
        };
        exporter
            .write_analysis_html(path, &page)
            .map_err(PlotError::Export)?;
        written.push(path.clone());
    }

    for path in &written {
        tracing::info!(path = %path.display(), "artifact written");
    }
    Ok(written)
}

/// Describes what was charted, for summary.json and headless output.
pub fn chart_meta(prepared: &PreparedChart, config: &Config) -> serde_json::Value {
    let model = &prepared.model;
    serde_json::json!({
        "input": prepared.input.display().to_string(),
        "timezone": model.zone.label(),
        "time_format": config.chart.time_format,
        "unknown_direction": config.markers.unknown_direction,
        "line_points": model.line.len(),
        "markers": {
            "long": model.marker_count(MarkerKind::Entry),
            "close": model.marker_count(MarkerKind::Exit),
        },
        "skipped_trades": model
            .skipped
            .iter()
            .map(|s| serde_json::json!({"index": s.index, "direction": s.direction.label()}))
            .collect::<Vec<_>>(),
    })
}
