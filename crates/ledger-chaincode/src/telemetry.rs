//! Structured logging setup.
//!
//! Installs a global `tracing` subscriber filtered by [`LogConfig::log_level`],
//! printing either human-readable or JSON lines to stderr.

use crate::config::LogConfig;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed, which is not an
/// error: tests and embedding hosts may have set one up first.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if config.json_logs {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(
            log_level = %config.log_level,
            json_logs = config.json_logs,
            "Logging initialized"
        );
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LogConfig::default();
        let _ = init_logging(&config);
        assert!(!init_logging(&config));
    }
}
