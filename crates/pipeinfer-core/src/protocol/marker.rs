//! Marker-framed codec: a response ends at the first line that is an existing
//! filesystem path.
//!
//! A log line that happens to name an existing file ends the exchange early.
//! That matches the worker's contract and is an accepted risk; a framed
//! protocol would replace this codec rather than patch it.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::metrics::{MetricLabel, parse_metric_value};
use super::{DecodeStep, ExchangeCodec, ResponseDecoder, ResponseEnd};
use crate::domain::{InferenceResult, TimingMetrics, WorkRequest};
use crate::settings::DEFAULT_ERROR_TOKEN;

/// Codec for the worker's marker-terminated replies.
#[derive(Debug, Clone)]
pub struct MarkerCodec {
    error_token: String,
}

impl MarkerCodec {
    pub fn new(error_token: impl Into<String>) -> Self {
        Self {
            error_token: error_token.into(),
        }
    }

    pub fn error_token(&self) -> &str {
        &self.error_token
    }
}

impl Default for MarkerCodec {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_TOKEN)
    }
}

impl ExchangeCodec for MarkerCodec {
    fn encode_request(&self, request: &WorkRequest) -> String {
        request.path().to_string_lossy().into_owned()
    }

    fn decoder(&self) -> Box<dyn ResponseDecoder> {
        Box::new(MarkerDecoder::new(self.error_token.clone()))
    }
}

/// Per-exchange state of the marker codec.
#[derive(Debug)]
pub struct MarkerDecoder {
    error_token: String,
    raw_log: Vec<String>,
    metrics: TimingMetrics,
    marker: Option<String>,
}

impl MarkerDecoder {
    pub fn new(error_token: impl Into<String>) -> Self {
        Self {
            error_token: error_token.into(),
            raw_log: Vec::new(),
            metrics: TimingMetrics::default(),
            marker: None,
        }
    }

    /// Metrics parsed so far.
    pub const fn metrics(&self) -> &TimingMetrics {
        &self.metrics
    }

    fn record_metric(&mut self, label: MetricLabel, line: &str) {
        match parse_metric_value(line) {
            Ok(value) => {
                debug!(metric = %label, value, "parsed timing metric");
                label.apply(&mut self.metrics, value);
            }
            Err(e) => {
                warn!(metric = %label, line = %line, error = %e, "ignoring malformed timing metric");
            }
        }
    }
}

impl ResponseDecoder for MarkerDecoder {
    fn push_line(&mut self, line: String) -> DecodeStep {
        let text = line.trim().to_string();
        self.raw_log.push(line);

        if let Some(label) = MetricLabel::detect(&text) {
            self.record_metric(label, &text);
            return DecodeStep::NeedMore;
        }

        if !text.is_empty() && Path::new(&text).exists() {
            self.marker = Some(text);
            return DecodeStep::Complete;
        }

        DecodeStep::NeedMore
    }

    fn finish(self: Box<Self>, end: ResponseEnd) -> InferenceResult {
        let Self {
            error_token,
            raw_log,
            metrics,
            marker,
        } = *self;

        let reason = match (end, marker) {
            (ResponseEnd::Complete, Some(marker)) => {
                if !error_token.is_empty() && marker.contains(&error_token) {
                    format!("worker reported an error: {marker}")
                } else {
                    return InferenceResult::Success {
                        result_path: PathBuf::from(marker),
                        metrics,
                        raw_log,
                    };
                }
            }
            (ResponseEnd::Complete, None) => "response ended without a result marker".to_string(),
            (ResponseEnd::EndOfStream, _) => {
                "worker closed its output before sending a result".to_string()
            }
            (ResponseEnd::ReadError(e), _) => format!("failed to read worker output: {e}"),
            (ResponseEnd::TimedOut(waited), _) => format!(
                "no response from worker within {}s",
                waited.as_secs_f64()
            ),
        };

        InferenceResult::Failure {
            reason,
            metrics,
            raw_log,
        }
    }
}
