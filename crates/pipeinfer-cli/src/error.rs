//! CLI-specific error types and mappings.
//!
//! This module provides the error type for the CLI adapter and maps core
//! errors to exit codes and user-facing messages.

use pipeinfer_core::{SettingsError, WorkerError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The worker could not be started or driven.
    #[error("Worker error: {0}")]
    Worker(String),

    /// One or more files did not produce a result.
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (reported by clap itself)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Inference(_) => 1,
            Self::Io(_) => 74,
            Self::Worker(_) => 69, // EX_UNAVAILABLE
            Self::Config(_) => 78,
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<WorkerError> for CliError {
    fn from(err: WorkerError) -> Self {
        Self::Worker(err.diagnostics())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Io("x".into()).exit_code(), 74);
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
        assert_eq!(CliError::Worker("x".into()).exit_code(), 69);
        assert_eq!(CliError::Inference("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_worker_error_keeps_diagnostics() {
        let err = CliError::from(WorkerError::StartupFailed {
            reason: "worker exited before printing READY".to_string(),
            stdout: Vec::new(),
            stderr: "engine missing".to_string(),
        });
        assert!(err.to_string().contains("stderr:\nengine missing"));
    }

    #[test]
    fn test_io_error_maps_to_io() {
        let err = CliError::from(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert_eq!(err.exit_code(), 74);
    }

    #[test]
    fn test_settings_error_is_config() {
        let err = CliError::from(SettingsError::EmptyExecutable);
        assert!(matches!(err, CliError::Config(_)));
    }
}
