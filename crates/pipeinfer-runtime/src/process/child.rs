//! [`WorkerChannel`] backed by a local child process.

use std::time::Duration;

use async_trait::async_trait;
use pipeinfer_core::ports::{WorkerChannel, WorkerError};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, ChildStdout};
use tracing::{debug, warn};

use super::shutdown::shutdown_child;
use super::stream::{LineReader, StderrCollector};

/// How long `drain_stderr` waits for the error stream to close.
const STDERR_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// A spawned worker with piped stdin/stdout/stderr.
///
/// The child is spawned with `kill_on_drop`, so dropping a `ChildWorker`
/// without calling [`terminate`](WorkerChannel::terminate) still stops it.
pub struct ChildWorker {
    child: Child,
    pid: Option<u32>,
    stdin: Option<ChildStdin>,
    stdout: Option<LineReader<ChildStdout>>,
    stderr: Option<StderrCollector>,
    terminated: bool,
}

impl ChildWorker {
    /// Take ownership of a freshly spawned child and its pipes.
    ///
    /// Missing pipes are tolerated; the affected operations report a closed
    /// stream.
    pub fn new(mut child: Child) -> Self {
        let pid = child.id();
        let stdin = child.stdin.take();
        let stdout = child.stdout.take().map(LineReader::new);
        let stderr = child
            .stderr
            .take()
            .map(|stream| StderrCollector::spawn(stream, pid));

        Self {
            child,
            pid,
            stdin,
            stdout,
            stderr,
            terminated: false,
        }
    }
}

#[async_trait]
impl WorkerChannel for ChildWorker {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn is_alive(&mut self) -> bool {
        if self.terminated {
            return false;
        }
        match self.child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!(pid = ?self.pid, status = ?status, "worker exited");
                false
            }
            Err(e) => {
                warn!(pid = ?self.pid, error = %e, "error checking worker status");
                false
            }
        }
    }

    async fn write_line(&mut self, line: &str) -> Result<(), WorkerError> {
        if !self.is_alive() {
            return Err(WorkerError::Write("worker process has exited".to_string()));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| WorkerError::Write("worker stdin is closed".to_string()))?;

        let mut framed = String::with_capacity(line.len() + 1);
        framed.push_str(line);
        framed.push('\n');

        let written = async {
            stdin.write_all(framed.as_bytes()).await?;
            stdin.flush().await
        }
        .await;

        if let Err(e) = written {
            // A broken pipe will not heal; close our end.
            self.stdin = None;
            return Err(WorkerError::Write(e.to_string()));
        }

        debug!(pid = ?self.pid, request = %line, "request sent");
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>, WorkerError> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        stdout
            .next_line()
            .await
            .map_err(|e| WorkerError::Read(e.to_string()))
    }

    async fn drain_stderr(&mut self) -> String {
        // A grandchild that inherited stderr can keep the pipe open forever.
        match self.stderr.take() {
            Some(collector) => collector.finish(STDERR_DRAIN_GRACE).await,
            None => String::new(),
        }
    }

    async fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        // Closing stdin lets a well-behaved worker leave its read loop.
        self.stdin = None;
        self.stdout = None;

        match shutdown_child(&mut self.child).await {
            Ok(status) => debug!(pid = ?self.pid, status = ?status, "worker stopped"),
            Err(e) => warn!(pid = ?self.pid, error = %e, "failed to stop worker"),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::Stdio;
    use tokio::process::Command;

    fn spawn_sh(script: &str) -> ChildWorker {
        let child = Command::new("sh")
            .arg("-c")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .expect("failed to spawn sh");
        ChildWorker::new(child)
    }

    #[tokio::test]
    async fn test_echo_round_trip() {
        let mut worker = spawn_sh("read -r line; echo \"got $line\"");
        assert!(worker.pid().is_some());

        worker.write_line("/tmp/a.jpg").await.unwrap();
        assert_eq!(
            worker.read_line().await.unwrap().as_deref(),
            Some("got /tmp/a.jpg")
        );
        assert_eq!(worker.read_line().await.unwrap(), None);

        worker.terminate().await;
        assert!(!worker.is_alive());
    }

    #[tokio::test]
    async fn test_write_after_exit_fails() {
        let mut worker = spawn_sh("exit 3");
        assert_eq!(worker.read_line().await.unwrap(), None);
        // Wait for the exit to become observable
        let _ = worker.child.wait().await;

        assert!(!worker.is_alive());
        let err = worker.write_line("/tmp/a.jpg").await.unwrap_err();
        assert!(matches!(err, WorkerError::Write(_)));
    }

    #[tokio::test]
    async fn test_drain_stderr_after_exit() {
        let mut worker = spawn_sh("echo 'engine file missing' >&2; exit 1");
        assert_eq!(worker.read_line().await.unwrap(), None);

        assert_eq!(worker.drain_stderr().await, "engine file missing");
        // Second drain has nothing left
        assert_eq!(worker.drain_stderr().await, "");
    }

    #[tokio::test]
    async fn test_terminate_is_idempotent() {
        let mut worker = spawn_sh("while true; do sleep 1; done");
        assert!(worker.is_alive());

        worker.terminate().await;
        worker.terminate().await;
        assert!(!worker.is_alive());
    }
}
