//! # Observability
//!
//! Logging bootstrap for the scriptkit workspace.
//!
//! Library crates only emit events through the standard `tracing` macros and
//! never install a subscriber themselves. Front ends (the `scriptkit` binary,
//! host integrations) call [`init_with_config`] once at startup.
//!
//! Two sinks are available:
//!
//! - a compact human-readable stderr sink, and
//! - a JSON-lines file sink (one record per event) that can be followed with
//!   `tail -f <file> | jq`.
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "scriptkit".into(),
//!     default_level: "debug".into(),
//!     log_path: Some("/tmp/scriptkit.jsonl".into()),
//!     also_stderr: true,
//! });
//! tracing::info!("ready");
//! ```

mod file;
mod json_layer;

use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use file::{JsonlFileWriter, WriterFactory};
pub use json_layer::{JsonLayer, LogEntry};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the emitting program, written into every JSON record.
    pub service_name: String,

    /// Default filter directive (e.g. "debug", "info", "scriptkit_http=trace").
    /// `RUST_LOG` takes precedence when set.
    pub default_level: String,

    /// JSON-lines output file. `None` disables the file sink.
    pub log_path: Option<PathBuf>,

    /// Emit compact text logs on stderr.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: true,
        }
    }
}

/// Initialize logging with defaults for `service_name`.
pub fn init(service_name: &str) {
    init_with_config(LogConfig {
        service_name: service_name.into(),
        ..Default::default()
    });
}

/// Initialize logging with a custom configuration.
///
/// Safe to call more than once: only the first successful call installs a
/// global subscriber, later calls are ignored.
pub fn init_with_config(config: LogConfig) {
    let json_layer = config.log_path.as_ref().and_then(|path| {
        match JsonlFileWriter::new(path) {
            Ok(writer) => Some(
                JsonLayer::new(config.service_name.clone(), WriterFactory::new(writer))
                    .with_filter(env_filter(&config.default_level)),
            ),
            Err(err) => {
                eprintln!("failed to open log file {}: {}", path.display(), err);
                None
            }
        }
    });

    let stderr_layer = config.also_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .compact()
            .with_writer(std::io::stderr)
            .with_filter(env_filter(&config.default_level))
    });

    let installed = tracing_subscriber::registry()
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            service = %config.service_name,
            log_path = ?config.log_path,
            "logging initialized"
        );
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, instrument, trace, warn};

/// Re-export Level for advanced filtering.
pub use tracing::Level;
