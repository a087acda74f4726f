//! Configuration management for the tour guide
//!
//! Handles loading configuration from files and environment variables,
//! and validates the settings before anything is built from them.

use crate::GuideError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the AI credential, as the web front-end used it
pub const API_KEY_ENV: &str = "API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuideConfig {
    /// Generative language API settings
    #[serde(default)]
    pub ai: AiConfig,
    /// Catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Generative language API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// API credential; AI features are disabled without it
    pub api_key: Option<String>,
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    #[serde(default = "default_ai_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_ai_timeout")]
    pub timeout_seconds: u32,
}

/// Catalog source settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file; the built-in London catalog is used when unset
    pub path: Option<PathBuf>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_ai_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_ai_model() -> String {
    "gemini-2.5-flash-preview-04-17".to_string()
}

fn default_ai_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_ai_base_url(),
            model: default_ai_model(),
            timeout_seconds: default_ai_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl GuideConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TOURGUIDE_AI__API_KEY, TOURGUIDE_LOGGING__LEVEL, ...
        builder = builder.add_source(
            Environment::with_prefix("TOURGUIDE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: GuideConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if config.ai.api_key.is_none() {
            config.ai.api_key = std::env::var(API_KEY_ENV).ok();
        }

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tourguide").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        // a blank key counts as no key
        if self
            .ai
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            self.ai.api_key = None;
        }
        if self.ai.base_url.is_empty() {
            self.ai.base_url = default_ai_base_url();
        }
        if self.ai.model.is_empty() {
            self.ai.model = default_ai_model();
        }
        if self.ai.timeout_seconds == 0 {
            self.ai.timeout_seconds = default_ai_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// The AI credential, if one is configured
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.ai.api_key.as_deref()
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.ai.timeout_seconds > 300 {
            return Err(GuideError::config("AI request timeout cannot exceed 300 seconds").into());
        }
        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GuideError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GuideError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.ai.base_url.starts_with("http://") && !self.ai.base_url.starts_with("https://") {
            return Err(
                GuideError::config("AI base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GuideConfig::default();
        assert_eq!(
            config.ai.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.ai.model, "gemini-2.5-flash-preview-04-17");
        assert_eq!(config.ai.timeout_seconds, 30);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.api_key().is_none());
        assert!(config.catalog.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let mut config = GuideConfig::default();
        config.ai.api_key = Some("   ".to_string());
        config.apply_defaults();
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = GuideConfig::default();
        config.logging.level = "verbose".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_invalid_log_format() {
        let mut config = GuideConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_timeout() {
        let mut config = GuideConfig::default();
        config.ai.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = GuideConfig::default();
        config.ai.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[ai]\napi_key = \"file-key-123\"\nmodel = \"gemini-test\"\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = GuideConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.api_key(), Some("file-key-123"));
        assert_eq!(config.ai.model, "gemini-test");
        assert_eq!(config.ai.timeout_seconds, 30);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = GuideConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("tourguide"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
