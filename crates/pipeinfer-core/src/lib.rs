//! Core domain types, port definitions and the line protocol codec for pipeinfer.
//!
//! This crate has no process or OS concerns. The runtime crate implements the
//! worker ports defined here; adapters (the CLI) consume [`InferenceService`].
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod protocol;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{InferenceOutcome, InferenceResult, MediaKind, TimingMetrics, WorkRequest};
pub use ports::{InferenceService, WorkerChannel, WorkerError, WorkerLauncher};
pub use protocol::{
    DecodeStep, ExchangeCodec, MarkerCodec, MarkerDecoder, MetricLabel, ResponseDecoder,
    ResponseEnd,
};
pub use settings::{
    DEFAULT_ERROR_TOKEN, DEFAULT_MODE_FLAG, DEFAULT_READINESS_TOKEN, Settings, SettingsError,
    validate_settings,
};
