use equiplot_application::config::Config;
use equiplot_application::meta;
use equiplot_application::plotting::{chart_meta, PreparedChart};
use std::path::PathBuf;

/// Single JSON document printed instead of opening the viewer.
pub fn report(chart: &PreparedChart, config: &Config, artifacts: &[PathBuf]) -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "tool": meta::tool_name(),
        "version": meta::tool_version(),
        "chart": chart_meta(chart, config),
        "summary": chart.summary,
        "artifacts": artifacts
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::report;
    use crate::viewer::test_support::sample_chart;
    use equiplot_application::config::Config;
    use std::path::PathBuf;

    #[test]
    fn report_carries_counts_summary_and_artifacts() {
        let chart = sample_chart();
        let artifacts = vec![PathBuf::from("out/equity.csv")];
        let json = report(&chart, &Config::default(), &artifacts);

        assert_eq!(json["status"], "ok");
        assert_eq!(json["tool"], "equiplot");
        assert_eq!(json["chart"]["input"], "src/data/backtest_sol.json");
        assert_eq!(json["chart"]["line_points"], 4);
        assert_eq!(json["chart"]["markers"]["long"], 1);
        assert_eq!(json["chart"]["markers"]["close"], 2);
        assert_eq!(json["chart"]["skipped_trades"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["summary"]["total_trades"], 4);
        assert_eq!(json["summary"]["final_equity"], 10010.0);
        assert_eq!(json["artifacts"][0], "out/equity.csv");
    }

    #[test]
    fn report_is_a_single_line() {
        let json = report(&sample_chart(), &Config::default(), &[]);
        let line = serde_json::to_string(&json).expect("serialize");
        assert!(!line.contains('\n'));
        assert_eq!(json["artifacts"].as_array().map(Vec::len), Some(0));
    }
}
