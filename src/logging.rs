//! Logging setup
//!
//! Verbosity is decided once at start-up and passed in explicitly.

use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// 0 = info, 1 = debug, 2+ = trace
    pub verbosity: u8,
}

impl LogConfig {
    /// Filter directive for this verbosity
    pub const fn directive(&self) -> &'static str {
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Build the env filter; `RUST_LOG` wins when set
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
    }
}

/// Install the global subscriber
pub fn init_logging(config: &LogConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(false)
        .init();
}
