//! Worker process ports.
//!
//! A [`WorkerChannel`] is one live worker with its three streams; a
//! [`WorkerLauncher`] knows how to produce a fresh one.

use async_trait::async_trait;

use super::WorkerError;

/// One running worker and its line-oriented streams.
///
/// Exactly one owner drives a channel at a time; implementations need not be
/// `Sync`.
#[async_trait]
pub trait WorkerChannel: Send {
    /// OS process id, when there is one.
    fn pid(&self) -> Option<u32>;

    /// Non-blocking liveness check.
    fn is_alive(&mut self) -> bool;

    /// Write `line` followed by a line break, then flush.
    async fn write_line(&mut self, line: &str) -> Result<(), WorkerError>;

    /// Read the next output line without its terminator.
    ///
    /// Returns `Ok(None)` at end-of-stream.
    async fn read_line(&mut self) -> Result<Option<String>, WorkerError>;

    /// Read whatever the error stream holds until it closes.
    async fn drain_stderr(&mut self) -> String;

    /// Stop the worker and release its streams. Safe to call repeatedly.
    async fn terminate(&mut self);
}

/// Factory for worker channels.
#[async_trait]
pub trait WorkerLauncher: Send + Sync {
    /// Spawn a new worker. Readiness is not awaited here.
    async fn launch(&self) -> Result<Box<dyn WorkerChannel>, WorkerError>;
}
