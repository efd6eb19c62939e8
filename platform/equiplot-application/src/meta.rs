pub fn tool_name() -> &'static str {
    "equiplot"
}

pub fn tool_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Input path used when none is given on the command line.
pub const DEFAULT_INPUT: &str = "src/data/backtest_sol.json";
