//! Core types, configuration, and utilities shared by the scriptkit crates.

mod config;
mod error;
mod hash;
mod logging;
mod paths;

pub use config::{Config, DEFAULT_LOG_LEVEL, DEFAULT_REQUEST_TIMEOUT_MS};
pub use error::{CoreError, CoreResult};
pub use hash::{hash, hash_code};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
