//! # stackscope utilities
//!
//! Shared logging and configuration helpers for stackscope consumers.
//!
//! The core crate never installs a subscriber itself; frontends call
//! [`init_logging`] once at startup.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{
    dated_log_file, init_logging, init_logging_with_level, init_with_config, LogConfig, LogFormat, LogLevel,
    LoggingError,
};
pub use tracing::{debug, error, info, trace, warn};
