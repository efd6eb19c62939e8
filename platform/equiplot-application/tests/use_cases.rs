use equiplot_application::config::{parse_config, Config};
use equiplot_application::errors::PlotError;
use equiplot_application::plotting::{
    chart_meta, export_artifacts, prepare_chart, ExportTargets, PreparedChart,
};
use equiplot_domain::errors::{ChartError, LoadError};
use equiplot_domain::repositories::backtest::BacktestReader;
use equiplot_domain::repositories::exports::{AnalysisPage, ChartExporter};
use equiplot_domain::services::chart::{LinePoint, MarkerKind, TradeMarker};
use equiplot_domain::services::summary::PerformanceSummary;
use equiplot_domain::value_objects::backtest_document::BacktestDocument;
use equiplot_infrastructure::backtest_json::{parse_backtest_str, FilesystemBacktestReader};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

struct FakeReader {
    raw: &'static str,
    reads: RefCell<Vec<PathBuf>>,
}

impl FakeReader {
    fn new(raw: &'static str) -> Self {
        Self {
            raw,
            reads: RefCell::new(Vec::new()),
        }
    }
}

impl BacktestReader for FakeReader {
    fn read_backtest(&self, path: &Path) -> Result<BacktestDocument, LoadError> {
        self.reads.borrow_mut().push(path.to_path_buf());
        parse_backtest_str(path, self.raw)
    }
}

#[derive(Default)]
struct RecordingExporter {
    ensured_dirs: RefCell<Vec<PathBuf>>,
    equity_rows: RefCell<Option<usize>>,
    marker_rows: RefCell<Option<usize>>,
    summary_meta: RefCell<Option<serde_json::Value>>,
    html_title: RefCell<Option<String>>,
}

impl ChartExporter for RecordingExporter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String> {
        self.ensured_dirs.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn write_equity_csv(
        &self,
        _path: &Path,
        line: &[LinePoint],
        _time_format: &str,
    ) -> Result<(), String> {
        *self.equity_rows.borrow_mut() = Some(line.len());
        Ok(())
    }

    fn write_markers_csv(
        &self,
        _path: &Path,
        markers: &[TradeMarker],
        _time_format: &str,
    ) -> Result<(), String> {
        *self.marker_rows.borrow_mut() = Some(markers.len());
        Ok(())
    }

    fn write_summary_json(
        &self,
        _path: &Path,
        _summary: &PerformanceSummary,
        meta: &serde_json::Value,
    ) -> Result<(), String> {
        *self.summary_meta.borrow_mut() = Some(meta.clone());
        Ok(())
    }

    fn write_analysis_html(&self, _path: &Path, page: &AnalysisPage<'_>) -> Result<(), String> {
        *self.html_title.borrow_mut() = Some(page.title.to_string());
        Ok(())
    }
}

struct FailingExporter;

impl ChartExporter for FailingExporter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String> {
        Err(format!("read-only filesystem: {}", path.display()))
    }

    fn write_equity_csv(&self, _: &Path, _: &[LinePoint], _: &str) -> Result<(), String> {
        unreachable!("ensure_dir fails first")
    }

    fn write_markers_csv(&self, _: &Path, _: &[TradeMarker], _: &str) -> Result<(), String> {
        unreachable!("ensure_dir fails first")
    }

    fn write_summary_json(
        &self,
        _: &Path,
        _: &PerformanceSummary,
        _: &serde_json::Value,
    ) -> Result<(), String> {
        unreachable!("ensure_dir fails first")
    }

    fn write_analysis_html(&self, _: &Path, _: &AnalysisPage<'_>) -> Result<(), String> {
        unreachable!("ensure_dir fails first")
    }
}

const MIXED: &str = r#"{
  "equityCurve": [
    {"timestamp": 1700000000000, "equity": 10000.0},
    {"timestamp": 1700000060000, "equity": 10005.0},
    {"timestamp": 1700000120000, "equity": 9998.0},
    {"timestamp": 1700000180000, "equity": 10010.0}
  ],
  "trades": [
    {"timestamp": 1700000000000, "price": 57.0, "direction": "LONG"},
    {"timestamp": 1700000060000, "price": 57.2, "direction": "CLOSE"},
    {"timestamp": 1700000120000, "price": 57.1, "direction": "SHORT"},
    {"timestamp": 1700000180000, "price": 56.9, "direction": "CLOSE"}
  ]
}"#;

fn utc_config() -> Config {
    parse_config("[chart]\ntimezone = \"utc\"\n").expect("config")
}

fn prepared(raw: &'static str) -> PreparedChart {
    let reader = FakeReader::new(raw);
    prepare_chart(Path::new("backtest.json"), &utc_config(), &reader).expect("prepared")
}

#[test]
fn prepares_line_markers_and_summary() {
    let reader = FakeReader::new(MIXED);
    let chart = prepare_chart(Path::new("runs/backtest.json"), &utc_config(), &reader)
        .expect("prepared");

    assert_eq!(reader.reads.borrow().as_slice(), &[PathBuf::from("runs/backtest.json")]);
    assert_eq!(chart.model.line.len(), 4);
    assert_eq!(chart.model.marker_count(MarkerKind::Entry), 1);
    assert_eq!(chart.model.marker_count(MarkerKind::Exit), 2);
    assert_eq!(chart.model.skipped.len(), 1);
    assert_eq!(chart.summary.total_trades, 4);
    assert_eq!(chart.summary.total_return, Some(10.0));
    assert_eq!(chart.returns.len(), 4);
}

#[test]
fn single_point_document_charts_one_entry() {
    let chart = prepared(
        r#"{"equityCurve":[{"timestamp":0,"equity":100.0}],"trades":[{"timestamp":0,"price":99.5,"direction":"LONG"}]}"#,
    );
    assert_eq!(chart.model.line.len(), 1);
    assert_eq!(chart.model.line[0].equity, 100.0);
    assert_eq!(chart.model.line[0].time.to_rfc3339(), "1970-01-01T00:00:00+00:00");
    assert_eq!(chart.model.markers.len(), 1);
    assert_eq!(chart.model.markers[0].kind, MarkerKind::Entry);
    assert_eq!(chart.model.markers[0].price, 99.5);
    assert_eq!(chart.model.markers[0].time.timestamp_millis(), 0);
}

#[test]
fn missing_top_level_key_fails_before_anything_is_exported() {
    let reader = FakeReader::new(r#"{"equityCurve": []}"#);
    let err = prepare_chart(Path::new("backtest.json"), &utc_config(), &reader)
        .expect_err("trades missing");
    assert!(matches!(err, PlotError::Load(LoadError::Schema { .. })));
    assert!(err.to_string().contains("missing field `trades`"));
}

#[test]
fn reject_policy_surfaces_chart_error() {
    let config = parse_config("[chart]\ntimezone = \"utc\"\n[markers]\nunknown_direction = \"reject\"\n")
        .expect("config");
    let reader = FakeReader::new(MIXED);
    let err = prepare_chart(Path::new("backtest.json"), &config, &reader).expect_err("short");
    assert!(matches!(
        err,
        PlotError::Chart(ChartError::UnknownDirection { index: 2, .. })
    ));
}

#[test]
fn invalid_config_is_rejected_before_reading() {
    let mut config = utc_config();
    config.chart.time_format = "%Y-%!".to_string();
    let reader = FakeReader::new(MIXED);
    let err = prepare_chart(Path::new("backtest.json"), &config, &reader).expect_err("config");
    assert!(matches!(err, PlotError::Config(_)));
    assert!(reader.reads.borrow().is_empty());
}

#[test]
fn exports_requested_artifacts_in_order() {
    let chart = prepared(MIXED);
    let config = utc_config();
    let exporter = RecordingExporter::default();
    let targets = ExportTargets {
        html: Some(PathBuf::from("out/analysis.html")),
        export_dir: Some(PathBuf::from("out/series")),
    };

    let written = export_artifacts(&chart, &config, &targets, &exporter).expect("export");

    assert_eq!(
        written,
        vec![
            PathBuf::from("out/series/equity.csv"),
            PathBuf::from("out/series/markers.csv"),
            PathBuf::from("out/series/summary.json"),
            PathBuf::from("out/analysis.html"),
        ]
    );
    assert_eq!(exporter.ensured_dirs.borrow().as_slice(), &[PathBuf::from("out/series")]);
    assert_eq!(*exporter.equity_rows.borrow(), Some(4));
    assert_eq!(*exporter.marker_rows.borrow(), Some(3));
    assert_eq!(
        exporter.html_title.borrow().as_deref(),
        Some("SOL Backtest Equity Curve & Trades")
    );
    let meta = exporter.summary_meta.borrow().clone().expect("meta");
    assert_eq!(meta["markers"]["long"], 1);
    assert_eq!(meta["skipped_trades"][0]["direction"], "SHORT");
}

#[test]
fn no_targets_writes_nothing() {
    let chart = prepared(MIXED);
    let exporter = RecordingExporter::default();
    let targets = ExportTargets::default();
    let written = export_artifacts(&chart, &utc_config(), &targets, &exporter).expect("noop");
    assert!(written.is_empty());
    assert!(exporter.ensured_dirs.borrow().is_empty());
}

#[test]
fn exporter_failure_is_reported() {
    let chart = prepared(MIXED);
    let targets = ExportTargets {
        html: None,
        export_dir: Some(PathBuf::from("/readonly")),
    };
    let err = export_artifacts(&chart, &utc_config(), &targets, &FailingExporter)
        .expect_err("export fails");
    assert!(matches!(err, PlotError::Export(_)));
    assert!(err.to_string().contains("read-only filesystem"));
}

#[test]
fn meta_describes_the_chart() {
    let chart = prepared(MIXED);
    let meta = chart_meta(&chart, &utc_config());
    assert_eq!(meta["input"], "backtest.json");
    assert_eq!(meta["timezone"], "utc");
    assert_eq!(meta["unknown_direction"], "skip");
    assert_eq!(meta["line_points"], 4);
    assert_eq!(meta["markers"]["close"], 2);
}

#[test]
fn filesystem_reader_reports_missing_input() {
    let err = prepare_chart(
        Path::new("/tmp/equiplot-no-such-run/backtest_sol.json"),
        &Config::default(),
        &FilesystemBacktestReader::new(),
    )
    .expect_err("missing input");
    assert!(matches!(err, PlotError::Load(LoadError::Read { .. })));
}
