//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `tokio::process` types in any signature
//! - The worker is reached only through [`WorkerChannel`], so tests can
//!   script it and a remote worker could stand in for a local process
//! - Adapters talk to [`InferenceService`], never to a channel directly

pub mod inference;
pub mod worker;

use std::path::PathBuf;
use thiserror::Error;

pub use inference::InferenceService;
pub use worker::{WorkerChannel, WorkerLauncher};

/// Errors raised while supervising or talking to the worker process.
///
/// These never reach callers of [`InferenceService::submit`]; the session
/// folds them into an `InferenceResult::Failure`.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The executable could not be started at all.
    #[error("Failed to spawn worker {}: {source}", executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The worker exited (or closed its output) before announcing readiness.
    #[error("Worker failed to start: {reason}")]
    StartupFailed {
        reason: String,
        /// Output lines seen before the failure.
        stdout: Vec<String>,
        /// Drained error stream.
        stderr: String,
    },

    /// The request line could not be delivered.
    #[error("Failed to write request: {0}")]
    Write(String),

    /// The output stream returned an I/O error.
    #[error("Failed to read worker output: {0}")]
    Read(String),
}

impl WorkerError {
    /// Human-readable report including any captured worker output.
    pub fn diagnostics(&self) -> String {
        match self {
            Self::StartupFailed { stdout, stderr, .. } => {
                let mut report = self.to_string();
                if !stdout.is_empty() {
                    report.push_str("\nstdout:\n");
                    report.push_str(&stdout.join("\n"));
                }
                if !stderr.trim().is_empty() {
                    report.push_str("\nstderr:\n");
                    report.push_str(stderr.trim_end());
                }
                report
            }
            _ => self.to_string(),
        }
    }
}
