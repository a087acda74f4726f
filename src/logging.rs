//! Tracing subscriber setup

use crate::config::LoggingConfig;
use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Anything but `json` falls back to pretty output
    fn from_config(format: &str) -> Self {
        match format {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// Logs go to stderr so they never interleave with the guide's own output.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tourguide={}", config.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match LogFormat::from_config(&config.format) {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    result.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_selection() {
        assert_eq!(LogFormat::from_config("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_config("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_config("unknown"), LogFormat::Pretty);
    }

    #[test]
    fn test_init_installs_once() {
        let pretty = LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        };
        let json = LoggingConfig {
            level: "info".to_string(),
            format: "json".to_string(),
        };
        assert!(init(&pretty).is_ok());
        assert!(init(&json).is_err());
    }
}
