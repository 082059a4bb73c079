//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options. Worker
//! settings can come from a JSON file, environment variables or flags; flags
//! and environment win over the file.

use clap::{Args, Parser};
use std::path::PathBuf;

use crate::commands::Commands;

/// Command-line interface for running files through the inference worker.
#[derive(Parser)]
#[command(name = "pipeinfer")]
#[command(about = "Run media files through a long-running inference worker")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Worker settings overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// JSON settings file used as the base configuration
    #[arg(long = "settings", env = "PIPEINFER_SETTINGS", global = true)]
    pub settings_file: Option<PathBuf>,

    /// Path to the worker executable
    #[arg(long = "worker", env = "PIPEINFER_WORKER", global = true)]
    pub worker_executable: Option<PathBuf>,

    /// Configuration file passed to the worker
    #[arg(long = "worker-config", env = "PIPEINFER_WORKER_CONFIG", global = true)]
    pub worker_config: Option<PathBuf>,

    /// Mode flag that selects the worker's persistent loop
    #[arg(long = "mode-flag", env = "PIPEINFER_MODE_FLAG", global = true)]
    pub mode_flag: Option<String>,

    /// Output token that marks the worker ready
    #[arg(long = "readiness-token", env = "PIPEINFER_READINESS_TOKEN", global = true)]
    pub readiness_token: Option<String>,

    /// Token in a result line that marks a failed request
    #[arg(long = "error-token", env = "PIPEINFER_ERROR_TOKEN", global = true)]
    pub error_token: Option<String>,

    /// Seconds to wait for the worker to become ready
    #[arg(long = "startup-timeout", env = "PIPEINFER_STARTUP_TIMEOUT", global = true)]
    pub startup_timeout_secs: Option<u64>,

    /// Seconds to wait for each line of a response
    #[arg(long = "response-timeout", env = "PIPEINFER_RESPONSE_TIMEOUT", global = true)]
    pub response_timeout_secs: Option<u64>,
}
