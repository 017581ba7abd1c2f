//! Engine configuration for suggest_core
//!
//! Stored as JSON. Every field has a default, so a partial file (or none at
//! all) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::slog_warn;

pub const DEFAULT_HISTORY_WINDOW: usize = 2;
pub const DEFAULT_SENTINEL: &str = "start_of_snippet";
pub const DEFAULT_REDACTION_MARKER: &str = "***";
pub const DEFAULT_CLIENT_TYPE: &str = "AzurePowerShell";

/// Telemetry/verbosity flags dropped from history snippets
pub const DEFAULT_NOISE_FLAGS: &[&str] = &[
    "-Verbose",
    "-ErrorAction",
    "-Debug",
    "-ErrorVariable",
    "-OutVariable",
    "-OutBuffer",
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of history entries in a context snippet
    pub history_window: usize,
    /// Placeholder for missing or unrelated history
    pub sentinel: String,
    /// Placeholder for redacted parameter values
    pub redaction_marker: String,
    /// Character that starts a flag token
    pub flag_prefix: char,
    /// Flags dropped entirely during history normalization
    pub noise_flags: Vec<String>,
    /// Base URI of the remote predictor, if any
    pub service_uri: Option<String>,
    /// Client type reported to the remote predictor
    pub client_type: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            sentinel: DEFAULT_SENTINEL.to_string(),
            redaction_marker: DEFAULT_REDACTION_MARKER.to_string(),
            flag_prefix: crate::tokenizer::FLAG_PREFIX,
            noise_flags: DEFAULT_NOISE_FLAGS.iter().map(|f| f.to_string()).collect(),
            service_uri: None,
            client_type: DEFAULT_CLIENT_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl EngineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Load a configuration file, falling back to defaults on any error
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                slog_warn!(
                    "CONFIG",
                    "load_failed",
                    serde_json::json!({
                        "path": path.as_ref().display().to_string(),
                        "error": e.to_string(),
                    })
                );
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_window == 0 {
            return Err(ConfigError::Invalid("history_window must be at least 1".into()));
        }
        if self.sentinel.trim().is_empty() {
            return Err(ConfigError::Invalid("sentinel must not be blank".into()));
        }
        // A marker that looks like a flag would be re-read as one on the next pass
        if self.redaction_marker.is_empty()
            || self.redaction_marker.starts_with(self.flag_prefix)
            || self.redaction_marker.contains(char::is_whitespace)
        {
            return Err(ConfigError::Invalid(format!(
                "redaction_marker {:?} must be a single non-flag token",
                self.redaction_marker
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.history_window, 2);
        assert_eq!(config.sentinel, "start_of_snippet");
        assert_eq!(config.redaction_marker, "***");
        assert_eq!(config.flag_prefix, '-');
        assert!(config.noise_flags.iter().any(|f| f == "-Verbose"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{"history_window": 3}"#).unwrap();
        assert_eq!(config.history_window, 3);
        assert_eq!(config.sentinel, DEFAULT_SENTINEL);
    }

    #[test]
    fn test_rejects_zero_window() {
        let err = EngineConfig::from_json(r#"{"history_window": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_flag_like_marker() {
        let err = EngineConfig::from_json(r#"{"redaction_marker": "-x"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = EngineConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"client_type": "Test", "service_uri": "http://localhost:1"}}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.client_type, "Test");
        assert_eq!(config.service_uri.as_deref(), Some("http://localhost:1"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join(format!("suggest_missing_{}.json", uuid::Uuid::new_v4()));
        assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Io { .. })));
        assert_eq!(EngineConfig::load_or_default(&path), EngineConfig::default());
    }
}
