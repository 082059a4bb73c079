//! CLI bootstrap - the composition root.
//!
//! Settings are resolved here and the inference session is built from them.
//! Command handlers receive the composed `CliContext` and never spawn the
//! worker themselves.

use std::sync::Arc;

use pipeinfer_core::{Settings, validate_settings};
use pipeinfer_runtime::InferenceSession;
use tracing::debug;

use crate::error::CliError;
use crate::parser::SettingsArgs;

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// Effective settings after file, environment and flag overrides.
    pub settings: Settings,
    /// Session that owns the worker process.
    pub session: Arc<InferenceSession>,
}

impl CliContext {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &Arc<InferenceSession> {
        &self.session
    }
}

/// Merge the settings file (if any) with flag and environment overrides.
///
/// The result is validated before it is returned.
pub fn resolve_settings(args: &SettingsArgs) -> Result<Settings, CliError> {
    let mut settings = match &args.settings_file {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings::default(),
    };

    if let Some(executable) = &args.worker_executable {
        settings.worker_executable.clone_from(executable);
    }
    if let Some(config) = &args.worker_config {
        settings.worker_config.clone_from(config);
    }
    if let Some(mode) = &args.mode_flag {
        settings.mode_flag.clone_from(mode);
    }
    if let Some(token) = &args.readiness_token {
        settings.readiness_token.clone_from(token);
    }
    if let Some(token) = &args.error_token {
        settings.error_token.clone_from(token);
    }
    if args.startup_timeout_secs.is_some() {
        settings.startup_timeout_secs = args.startup_timeout_secs;
    }
    if args.response_timeout_secs.is_some() {
        settings.response_timeout_secs = args.response_timeout_secs;
    }

    validate_settings(&settings)?;
    debug!(?settings, "resolved settings");
    Ok(settings)
}

/// Bootstrap the CLI application.
///
/// No worker is spawned here; the session starts it on first use.
pub fn bootstrap(settings: Settings) -> CliContext {
    let session = Arc::new(InferenceSession::from_settings(&settings));
    CliContext { settings, session }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_overrides() {
        let settings = resolve_settings(&SettingsArgs::default()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"worker_executable": "/opt/a/worker", "mode_flag": "batch", "response_timeout_secs": 10}}"#
        )
        .unwrap();

        let args = SettingsArgs {
            settings_file: Some(file.path().to_path_buf()),
            worker_executable: Some(PathBuf::from("/opt/b/worker")),
            response_timeout_secs: Some(20),
            ..SettingsArgs::default()
        };
        let settings = resolve_settings(&args).unwrap();

        assert_eq!(settings.worker_executable, PathBuf::from("/opt/b/worker"));
        assert_eq!(settings.mode_flag, "batch");
        assert_eq!(settings.response_timeout_secs, Some(20));
        assert_eq!(settings.readiness_token, "READY");
    }

    #[test]
    fn test_invalid_override_is_config_error() {
        let args = SettingsArgs {
            startup_timeout_secs: Some(0),
            ..SettingsArgs::default()
        };
        let err = resolve_settings(&args).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_missing_settings_file() {
        let args = SettingsArgs {
            settings_file: Some(PathBuf::from("/nonexistent/pipeinfer.json")),
            ..SettingsArgs::default()
        };
        assert!(matches!(
            resolve_settings(&args),
            Err(CliError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_does_not_spawn() {
        let ctx = bootstrap(Settings::default());
        assert_eq!(ctx.session().launch_count(), 0);
        assert_eq!(ctx.settings().mode_flag, "webui");
    }
}
