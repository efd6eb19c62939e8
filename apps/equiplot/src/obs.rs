use crate::logging::{BufferMakeWriter, SharedLogBuffer};
use clap::ValueEnum;

pub const LOG_ENV: &str = "EQUIPLOT_LOG";

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Where formatted events end up.
pub enum LogSink {
    Stderr,
    /// Captured in memory while the viewer owns the terminal.
    Buffer(SharedLogBuffer),
}

pub fn init_tracing(format: LogFormat, sink: LogSink) -> Result<(), String> {
    let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    let installed = match (format, sink) {
        (LogFormat::Json, LogSink::Stderr) => builder.json().with_writer(std::io::stderr).try_init(),
        (LogFormat::Json, LogSink::Buffer(buffer)) => builder
            .json()
            .with_writer(BufferMakeWriter::new(buffer))
            .try_init(),
        (LogFormat::Text, LogSink::Stderr) => builder.with_writer(std::io::stderr).try_init(),
        (LogFormat::Text, LogSink::Buffer(buffer)) => builder
            .with_ansi(false)
            .with_writer(BufferMakeWriter::new(buffer))
            .try_init(),
    };
    installed.map_err(|err| format!("failed to install tracing subscriber: {err}"))
}
