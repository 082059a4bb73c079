//! Command builder for the worker process.

use async_trait::async_trait;
use pipeinfer_core::Settings;
use pipeinfer_core::ports::{WorkerChannel, WorkerError, WorkerLauncher};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

use super::child::ChildWorker;

/// Spawns the worker as `executable <args...>` with all three streams piped.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    executable: PathBuf,
    args: Vec<String>,
}

impl ProcessLauncher {
    pub fn new(executable: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            args,
        }
    }

    /// Launcher for `worker_executable worker_config mode_flag`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.worker_executable.clone(), settings.worker_args())
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl WorkerLauncher for ProcessLauncher {
    async fn launch(&self) -> Result<Box<dyn WorkerChannel>, WorkerError> {
        if !self.executable.exists() {
            warn!(
                "Worker executable does not exist: {}, relying on PATH lookup",
                self.executable.display()
            );
        }

        let child = self
            .build_command()
            .spawn()
            .map_err(|source| WorkerError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;

        info!(
            pid = ?child.id(),
            executable = %self.executable.display(),
            args = ?self.args,
            "worker spawned"
        );

        Ok(Box::new(ChildWorker::new(child)))
    }
}
