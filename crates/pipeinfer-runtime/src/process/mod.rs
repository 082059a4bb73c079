//! Worker process handle.
//!
//! # Structure
//!
//! - `ProcessLauncher` - builds and spawns the worker command
//! - `ChildWorker` - `WorkerChannel` over a live child's pipes
//! - `LineReader` / `StderrCollector` - lossy line reading
//! - `shutdown_child` - SIGTERM → SIGKILL escalation with reaping

mod child;
mod launcher;
pub mod shutdown;
mod stream;

pub use child::ChildWorker;
pub use launcher::ProcessLauncher;
pub use shutdown::shutdown_child;
pub use stream::{LineReader, StderrCollector};
