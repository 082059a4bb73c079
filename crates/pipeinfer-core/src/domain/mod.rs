//! Domain types for inference exchanges.
//!
//! These are pure data types: what the caller asks for and what the worker
//! answered. They carry no process handles and do no I/O beyond path
//! resolution.

mod request;
mod result;

pub use request::{MediaKind, WorkRequest};
pub use result::{InferenceOutcome, InferenceResult, TimingMetrics};
