//! Worker process supervision for pipeinfer.
//!
//! Implements the worker ports from `pipeinfer-core` on top of
//! `tokio::process` and provides [`InferenceSession`], the coordinator that
//! front-ends talk to.
#![deny(unsafe_code)]

pub mod process;
pub mod readiness;
pub mod session;

#[cfg(test)]
mod testing;

// Re-export the main session type
pub use session::{BACKEND_UNAVAILABLE, InferenceSession};

// Re-export process management types for direct use if needed
pub use process::{ChildWorker, ProcessLauncher, shutdown_child};

pub use readiness::wait_until_ready;
