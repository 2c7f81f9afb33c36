//! Shared library for the keyword codec and well-log crates
//!
//! Provides:
//! - logging bootstrap (console and rolling file layers)
//! - layered configuration loading
//! - the aggregated [`AppConfig`]

pub mod config;
pub mod error;
pub mod logging;

pub use config::{load_config_from_file, save_config_to_file, AppConfig};
pub use error::{Error, Result};
pub use logging::{init_logging, LogConfig, LogFormat};

// Re-export common dependencies
pub use ecl_keyword;
pub use well_log;
