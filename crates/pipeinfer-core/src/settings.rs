//! Settings domain types and validation.
//!
//! This module contains the worker supervision settings used across the
//! workspace. These are pure data types with no infrastructure dependencies;
//! adapters decide where the values come from (flags, environment, a JSON
//! file).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default worker executable, relative to the working directory.
pub const DEFAULT_WORKER_EXECUTABLE: &str = "./build/v5lite_trt";

/// Default configuration file handed to the worker.
pub const DEFAULT_WORKER_CONFIG: &str = "./config.yaml";

/// Mode flag that puts the worker in its persistent line loop.
pub const DEFAULT_MODE_FLAG: &str = "webui";

/// Line content the worker prints once it accepts requests.
pub const DEFAULT_READINESS_TOKEN: &str = "READY";

/// Substring of a result marker that signals a failed request.
pub const DEFAULT_ERROR_TOKEN: &str = "ERROR";

/// Worker supervision settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Path to the worker executable.
    pub worker_executable: PathBuf,

    /// Configuration file passed as the worker's first argument.
    pub worker_config: PathBuf,

    /// Mode flag passed as the worker's second argument.
    pub mode_flag: String,

    /// Token whose appearance on stdout marks the worker ready.
    pub readiness_token: String,

    /// Token whose presence in a result marker marks a failure.
    pub error_token: String,

    /// Upper bound on waiting for readiness (None = wait forever).
    pub startup_timeout_secs: Option<u64>,

    /// Upper bound on waiting for each response line (None = wait forever).
    pub response_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            worker_executable: PathBuf::from(DEFAULT_WORKER_EXECUTABLE),
            worker_config: PathBuf::from(DEFAULT_WORKER_CONFIG),
            mode_flag: DEFAULT_MODE_FLAG.to_string(),
            readiness_token: DEFAULT_READINESS_TOKEN.to_string(),
            error_token: DEFAULT_ERROR_TOKEN.to_string(),
            startup_timeout_secs: None,
            response_timeout_secs: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(content).map_err(|e| SettingsError::Malformed(e.to_string()))
    }

    /// Worker arguments in invocation order: config path, then mode flag.
    pub fn worker_args(&self) -> Vec<String> {
        vec![
            self.worker_config.to_string_lossy().into_owned(),
            self.mode_flag.clone(),
        ]
    }

    pub fn startup_timeout(&self) -> Option<Duration> {
        self.startup_timeout_secs.map(Duration::from_secs)
    }

    pub fn response_timeout(&self) -> Option<Duration> {
        self.response_timeout_secs.map(Duration::from_secs)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Worker executable path must not be empty")]
    EmptyExecutable,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("{0} must not contain line breaks")]
    MultilineField(&'static str),

    #[error("{0} must be at least 1 second when set")]
    ZeroTimeout(&'static str),

    #[error("Cannot read settings file {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("Malformed settings: {0}")]
    Malformed(String),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings.worker_executable.as_os_str().is_empty() {
        return Err(SettingsError::EmptyExecutable);
    }

    for (name, value) in [
        ("mode_flag", &settings.mode_flag),
        ("readiness_token", &settings.readiness_token),
        ("error_token", &settings.error_token),
    ] {
        if value.is_empty() {
            return Err(SettingsError::EmptyField(name));
        }
        if value.contains('\n') || value.contains('\r') {
            return Err(SettingsError::MultilineField(name));
        }
    }

    if settings.startup_timeout_secs == Some(0) {
        return Err(SettingsError::ZeroTimeout("startup_timeout_secs"));
    }
    if settings.response_timeout_secs == Some(0) {
        return Err(SettingsError::ZeroTimeout("response_timeout_secs"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_ok());
        assert_eq!(settings.worker_args(), vec!["./config.yaml", "webui"]);
        assert_eq!(settings.startup_timeout(), None);
    }

    #[test]
    fn test_empty_token_rejected() {
        let settings = Settings {
            readiness_token: String::new(),
            ..Settings::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyField("readiness_token"))
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let settings = Settings {
            response_timeout_secs: Some(0),
            ..Settings::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::ZeroTimeout("response_timeout_secs"))
        );
    }

    #[test]
    fn test_empty_executable_rejected() {
        let settings = Settings {
            worker_executable: PathBuf::new(),
            ..Settings::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyExecutable)
        );
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"worker_executable": "/opt/bin/worker", "startup_timeout_secs": 30}"#;
        let settings = Settings::from_json_str(json).unwrap();
        assert_eq!(settings.worker_executable, PathBuf::from("/opt/bin/worker"));
        assert_eq!(settings.startup_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.mode_flag, DEFAULT_MODE_FLAG);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Settings::from_json_str("{not json"),
            Err(SettingsError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::from_json_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Unreadable { .. }));
    }
}
