//! Configuration for Massive Encoding
//!
//! Settings are read from TOML, overridden from `ME_*` environment variables
//! and validated before use.

use std::path::Path;

use massive_encoding_core::constants::{DEFAULT_MAX_DEPTH, HEADER_SIZE, MAX_BYTE_COUNT};
use massive_encoding_core::ReadLimits;
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};
use crate::{log_info, log_warn};

/// File consulted by [`Config::load`]
pub const CONFIG_FILE: &str = "massive-encoding.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Encoder settings
    #[serde(default)]
    pub encoding: EncodingConfig,

    /// Decoder settings
    #[serde(default)]
    pub decoding: DecodingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Encoder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Largest encoded document accepted, in bytes
    #[serde(default = "default_max_byte_count")]
    pub max_byte_count: usize,
}

/// Decoder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodingConfig {
    /// Deepest container nesting accepted when reading bytes
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, compact, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            max_byte_count: default_max_byte_count(),
        }
    }
}

impl Default for DecodingConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
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

// Default value functions for serde
fn default_max_byte_count() -> usize { MAX_BYTE_COUNT }
fn default_max_depth() -> usize { DEFAULT_MAX_DEPTH }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Config {
    /// Load configuration from the working directory and environment
    pub fn load() -> Result<Self> {
        let mut config = if Path::new(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Config::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;

        toml::from_str(&contents)
            .map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))
    }

    /// Apply `ME_*` overrides looked up through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("ME_MAX_BYTE_COUNT") {
            self.encoding.max_byte_count = value
                .parse()
                .map_err(|e| Error::config(format!("Invalid max byte count: {}", e)))?;
        }

        if let Some(value) = lookup("ME_MAX_DEPTH") {
            self.decoding.max_depth = value
                .parse()
                .map_err(|e| Error::config(format!("Invalid max depth: {}", e)))?;
        }

        if let Some(level) = lookup("ME_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = lookup("ME_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.encoding.max_byte_count < HEADER_SIZE {
            return Err(Error::config(format!(
                "Max byte count too small (minimum {})",
                HEADER_SIZE
            )));
        }

        if self.encoding.max_byte_count > MAX_BYTE_COUNT {
            return Err(Error::config(format!(
                "Max byte count too large (maximum {})",
                MAX_BYTE_COUNT
            )));
        }

        if self.decoding.max_depth == 0 {
            return Err(Error::config("Max depth must be at least 1"));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(Error::config("Invalid log level")),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            _ => return Err(Error::config("Invalid log format")),
        }

        Ok(())
    }

    /// Reader limits derived from the decoding settings
    pub fn read_limits(&self) -> ReadLimits {
        ReadLimits {
            max_depth: self.decoding.max_depth,
        }
    }
}

/// Load configuration from file or use defaults
pub fn load_config_or_default(path: Option<&str>) -> Config {
    match path {
        Some(path) => match Config::from_file(path).and_then(|config| {
            config.validate()?;
            Ok(config)
        }) {
            Ok(config) => {
                log_info!("Loaded configuration from: {}", path);
                config
            }
            Err(e) => {
                log_warn!("Failed to load config from {}: {}. Using defaults.", path, e);
                Config::default()
            }
        },
        None => {
            log_info!("No config file specified, using defaults");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.encoding.max_byte_count, i32::MAX as usize);
        assert_eq!(config.decoding.max_depth, 512);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn from_file_fills_missing_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[decoding]\nmax_depth = 16\n\n[logging]\nformat = \"json\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.decoding.max_depth, 16);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.encoding, EncodingConfig::default());
        assert_eq!(config.read_limits(), ReadLimits { max_depth: 16 });
    }

    #[test]
    fn from_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[decoding\nmax_depth = ").unwrap();
        assert!(matches!(Config::from_file(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn from_file_reports_read_errors_as_io() {
        let error = Config::from_file("/nonexistent/massive-encoding.toml").unwrap_err();
        match error {
            Error::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[test]
    fn overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("ME_MAX_BYTE_COUNT", "4096"),
            ("ME_MAX_DEPTH", "8"),
            ("ME_LOG_LEVEL", "debug"),
            ("ME_LOG_FORMAT", "compact"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.encoding.max_byte_count, 4096);
        assert_eq!(config.decoding.max_depth, 8);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "compact");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_override_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(|name| (name == "ME_MAX_DEPTH").then(|| "deep".to_string()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut config = Config::default();
        config.decoding.max_depth = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.encoding.max_byte_count = 4;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_or_default_falls_back() {
        assert_eq!(load_config_or_default(None), Config::default());
        assert_eq!(
            load_config_or_default(Some("/nonexistent/massive-encoding.toml")),
            Config::default()
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[encoding]\nmax_byte_count = 1024").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        assert_eq!(load_config_or_default(Some(&path)).encoding.max_byte_count, 1024);
    }
}
