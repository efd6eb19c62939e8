use equiplot_domain::services::chart::UnknownDirectionPolicy;
use equiplot_domain::services::time::{is_valid_time_format, TimeZoneChoice};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub markers: MarkersConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ChartConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub time_format: String,
    pub timezone: TimeZoneChoice,
    pub grid: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "SOL Backtest Equity Curve & Trades".to_string(),
            x_label: "Time".to_string(),
            y_label: "Equity / Price".to_string(),
            time_format: "%Y-%m-%d %H:%M".to_string(),
            timezone: TimeZoneChoice::Local,
            grid: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields, default)]
pub struct MarkersConfig {
    pub unknown_direction: UnknownDirectionPolicy,
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.chart.title.trim().is_empty() {
            return Err("chart.title must not be empty".to_string());
        }
        if !is_valid_time_format(&self.chart.time_format) {
            return Err(format!(
                "chart.time_format is not a valid strftime pattern: {:?}",
                self.chart.time_format
            ));
        }
        Ok(())
    }
}

pub fn load_config_with_source(path: &Path) -> Result<(Config, String), String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config = parse_config(&contents)
        .map_err(|err| format!("{} ({})", err, path.display()))?;
    Ok((config, contents))
}

pub fn parse_config(raw: &str) -> Result<Config, String> {
    let config: Config =
        toml::from_str(raw).map_err(|err| format!("failed to parse TOML: {err}"))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::{load_config_with_source, parse_config, Config};
    use equiplot_domain::services::chart::UnknownDirectionPolicy;
    use equiplot_domain::services::time::TimeZoneChoice;
    use std::path::Path;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config("").expect("defaults");
        assert_eq!(config, Config::default());
        assert_eq!(config.chart.title, "SOL Backtest Equity Curve & Trades");
        assert_eq!(config.chart.time_format, "%Y-%m-%d %H:%M");
        assert_eq!(config.chart.timezone, TimeZoneChoice::Local);
        assert_eq!(config.markers.unknown_direction, UnknownDirectionPolicy::Skip);
    }

    #[test]
    fn parses_full_config() {
        let config = parse_config(
            r#"
[chart]
title = "BTC 1h run"
x_label = "Date"
y_label = "USD"
time_format = "%d/%m %H:%M"
timezone = "utc"
grid = false

[markers]
unknown_direction = "reject"
"#,
        )
        .expect("config should parse");
        assert_eq!(config.chart.title, "BTC 1h run");
        assert_eq!(config.chart.timezone, TimeZoneChoice::Utc);
        assert!(!config.chart.grid);
        assert_eq!(config.markers.unknown_direction, UnknownDirectionPolicy::Reject);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = parse_config("[chart]\ntimezone = \"utc\"\n").expect("partial");
        assert_eq!(config.chart.timezone, TimeZoneChoice::Utc);
        assert_eq!(config.chart.x_label, "Time");
        assert!(config.chart.grid);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_config("[chart]\ncolour = \"blue\"\n").expect_err("unknown key");
        assert!(err.contains("failed to parse TOML"));
    }

    #[test]
    fn bad_time_format_is_rejected() {
        let err = parse_config("[chart]\ntime_format = \"%Y-%!\"\n").expect_err("bad pattern");
        assert!(err.contains("chart.time_format"));
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = parse_config("[chart]\ntitle = \"  \"\n").expect_err("blank title");
        assert!(err.contains("chart.title"));
    }

    #[test]
    fn load_config_missing_file_returns_error() {
        let path = Path::new("/tmp/equiplot-missing-config.toml");
        let err = load_config_with_source(path).expect_err("expected load to fail");
        assert!(err.contains("failed to read config"));
    }
}
