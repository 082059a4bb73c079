//! Readiness gate for freshly spawned workers.
//!
//! The worker prints a readiness token once its model is loaded. Until then
//! nothing may be written to it. This gate reads and discards startup output
//! until the token shows up, or reports why it never did.

use std::time::Duration;

use pipeinfer_core::ports::{WorkerChannel, WorkerError};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// How the startup scan ended.
enum Gate {
    Ready,
    Closed,
    ReadFailed(String),
    TimedOut(Duration),
}

/// Block until the worker prints a line containing `token`.
///
/// On failure the worker is terminated, its stderr drained, and both output
/// streams are attached to the returned [`WorkerError::StartupFailed`].
/// `limit` bounds the whole wait; `None` waits indefinitely.
pub async fn wait_until_ready(
    worker: &mut dyn WorkerChannel,
    token: &str,
    limit: Option<Duration>,
) -> Result<(), WorkerError> {
    let mut seen = Vec::new();

    let gate = match limit {
        Some(limit) => timeout(limit, scan_for_token(worker, token, &mut seen))
            .await
            .unwrap_or(Gate::TimedOut(limit)),
        None => scan_for_token(worker, token, &mut seen).await,
    };

    let reason = match gate {
        Gate::Ready => {
            info!(pid = ?worker.pid(), "worker is ready");
            return Ok(());
        }
        Gate::Closed => format!("worker exited before printing {token}"),
        Gate::ReadFailed(e) => format!("failed to read worker output: {e}"),
        Gate::TimedOut(waited) => format!(
            "worker did not print {token} within {}s",
            waited.as_secs_f64()
        ),
    };

    worker.terminate().await;
    let stderr = worker.drain_stderr().await;
    warn!(pid = ?worker.pid(), %reason, "worker startup failed");

    Err(WorkerError::StartupFailed {
        reason,
        stdout: seen,
        stderr,
    })
}

async fn scan_for_token(
    worker: &mut dyn WorkerChannel,
    token: &str,
    seen: &mut Vec<String>,
) -> Gate {
    loop {
        match worker.read_line().await {
            Ok(Some(line)) => {
                debug!(pid = ?worker.pid(), "startup: {}", line);
                let ready = line.contains(token);
                seen.push(line);
                if ready {
                    return Gate::Ready;
                }
            }
            Ok(None) => return Gate::Closed,
            Err(e) => return Gate::ReadFailed(e.to_string()),
        }
    }
}
