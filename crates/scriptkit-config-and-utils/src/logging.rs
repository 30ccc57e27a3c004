//! Logging initialization for scriptkit front ends.

use std::path::PathBuf;

pub use observability::LogConfig;

/// Initialize logging.
///
/// `level` is the default filter, overridden by `RUST_LOG`. When `log_file`
/// is given, structured JSON lines are appended to it in addition to the
/// compact stderr output.
pub fn init_logging(level: &str, log_file: Option<PathBuf>) {
    observability::init_with_config(LogConfig {
        service_name: "scriptkit".into(),
        default_level: level.into(),
        log_path: log_file,
        also_stderr: true,
    });
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
