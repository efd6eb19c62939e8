use clap::{Parser, ValueEnum};
use equiplot::logging::{LogBuffer, SharedLogBuffer};
use equiplot::obs::{self, LogFormat, LogSink};
use equiplot::{headless, ViewerOpts};
use equiplot_application::config::{load_config_with_source, Config};
use equiplot_application::meta;
use equiplot_application::plotting::{export_artifacts, prepare_chart, ExportTargets};
use equiplot_domain::services::time::TimeZoneChoice;
use equiplot_infrastructure::artifacts::FilesystemChartExporter;
use equiplot_infrastructure::backtest_json::FilesystemBacktestReader;
use std::path::PathBuf;
use std::sync::Arc;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (git ",
    env!("EQUIPLOT_GIT_SHA"),
    ", ",
    env!("EQUIPLOT_TARGET"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "equiplot")]
#[command(
    about = "Chart a backtest equity curve with its LONG entries and CLOSE exits.",
    version,
    long_version = LONG_VERSION
)]
#[command(after_help = "Viewer keys:\n  q, Esc, Ctrl-C  close\n  r               equity / returns view\n  l               show or hide logs\n\nExamples:\n  equiplot\n  equiplot runs/backtest_sol.json --timezone utc\n  equiplot runs/backtest_sol.json --html runs/analysis.html --headless")]
struct Cli {
    /// Backtest result JSON with `equityCurve` and `trades`.
    #[arg(default_value = meta::DEFAULT_INPUT)]
    input: PathBuf,

    /// Chart config file (TOML). If omitted, uses env EQUIPLOT_CONFIG.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Zone for date labels; overrides `chart.timezone` from the config.
    #[arg(long, value_enum)]
    timezone: Option<Zone>,

    /// Write a self-contained HTML analysis page to this path.
    #[arg(long)]
    html: Option<PathBuf>,

    /// Write equity.csv, markers.csv and summary.json into this directory.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Skip the viewer and print a JSON summary line to stdout.
    #[arg(long)]
    headless: bool,

    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Zone {
    Local,
    Utc,
}

impl From<Zone> for TimeZoneChoice {
    fn from(zone: Zone) -> Self {
        match zone {
            Zone::Local => TimeZoneChoice::Local,
            Zone::Utc => TimeZoneChoice::Utc,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_store: SharedLogBuffer = Arc::new(parking_lot::Mutex::new(LogBuffer::new(2000)));
    let sink = if cli.headless {
        LogSink::Stderr
    } else {
        LogSink::Buffer(log_store.clone())
    };
    if let Err(err) = obs::init_tracing(cli.log_format, sink) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let headless = cli.headless;
    if let Err(err) = run(cli, log_store.clone()) {
        if !headless {
            // Buffered lines only ever reach the viewer's log panel, which may
            // never have opened; flush them ahead of the error.
            let captured = log_store.lock().tail(usize::MAX);
            for line in captured {
                eprintln!("{line}");
            }
        }
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, log_store: SharedLogBuffer) -> Result<(), String> {
    let config_path = cli.config.or_else(|| {
        std::env::var("EQUIPLOT_CONFIG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    });
    let mut config = match &config_path {
        Some(path) => {
            let (config, _) = load_config_with_source(path)?;
            tracing::info!(path = %path.display(), "config loaded");
            config
        }
        None => Config::default(),
    };
    if let Some(zone) = cli.timezone {
        config.chart.timezone = zone.into();
    }

    let chart = prepare_chart(&cli.input, &config, &FilesystemBacktestReader::new())
        .map_err(|err| err.to_string())?;

    let targets = ExportTargets {
        html: cli.html,
        export_dir: cli.export_dir,
    };
    let artifacts = export_artifacts(&chart, &config, &targets, &FilesystemChartExporter::new())
        .map_err(|err| err.to_string())?;

    if cli.headless {
        let json = headless::report(&chart, &config, &artifacts);
        println!(
            "{}",
            serde_json::to_string(&json)
                .unwrap_or_else(|_| "{\"status\":\"error\",\"error\":\"json\"}".to_string())
        );
        return Ok(());
    }

    equiplot::run(ViewerOpts {
        chart,
        config,
        artifacts,
        log_store,
    })
}
