//! Request/response codec for the worker's line protocol.
//!
//! One exchange is one request line out and a variable number of lines back.
//! The framing rule lives entirely behind [`ExchangeCodec`] and
//! [`ResponseDecoder`]; the session only feeds lines and asks for a verdict.
//!
//! # Wire format
//!
//! - Request: the absolute input path, one line, flushed.
//! - Response: free-form lines, some carrying timing metrics, ended by a line
//!   that names an existing file (the result marker) or by end-of-stream.
//! - A marker containing the error token is a failure.

mod marker;
mod metrics;

use std::time::Duration;

use crate::domain::{InferenceResult, WorkRequest};

pub use marker::{MarkerCodec, MarkerDecoder};
pub use metrics::{MetricLabel, MetricParseError, parse_metric_value};

/// What the decoder wants after seeing a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStep {
    /// Keep reading.
    NeedMore,
    /// The response is complete; stop reading.
    Complete,
}

/// How the line stream stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEnd {
    /// The decoder returned [`DecodeStep::Complete`].
    Complete,
    /// The worker closed its output.
    EndOfStream,
    /// Reading failed with an I/O error.
    ReadError(String),
    /// No line arrived within the response timeout.
    TimedOut(Duration),
}

/// Accumulates the lines of one response.
pub trait ResponseDecoder: Send {
    /// Consume one line, terminator already removed.
    fn push_line(&mut self, line: String) -> DecodeStep;

    /// Classify the exchange.
    fn finish(self: Box<Self>, end: ResponseEnd) -> InferenceResult;
}

/// Encodes requests and creates a fresh decoder per exchange.
pub trait ExchangeCodec: Send + Sync {
    /// The request line, without its terminator.
    fn encode_request(&self, request: &WorkRequest) -> String;

    fn decoder(&self) -> Box<dyn ResponseDecoder>;
}
