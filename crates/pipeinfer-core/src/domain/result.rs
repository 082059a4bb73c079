use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Durations reported by the worker for one exchange, in milliseconds.
///
/// A stage whose line never appeared stays at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingMetrics {
    pub preprocess_ms: f64,
    pub inference_ms: f64,
    pub postprocess_ms: f64,
}

impl TimingMetrics {
    /// Sum of the three stages.
    pub fn total_ms(&self) -> f64 {
        self.preprocess_ms + self.inference_ms + self.postprocess_ms
    }

    /// Throughput implied by the total, or zero when nothing was reported.
    pub fn fps(&self) -> f64 {
        let total = self.total_ms();
        if total > 0.0 { 1000.0 / total } else { 0.0 }
    }
}

/// Typed result of one exchange with the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InferenceResult {
    /// The worker named an existing result file without an error token.
    Success {
        result_path: PathBuf,
        metrics: TimingMetrics,
        raw_log: Vec<String>,
    },

    /// Anything else. `raw_log` holds every line consumed before giving up.
    Failure {
        reason: String,
        metrics: TimingMetrics,
        raw_log: Vec<String>,
    },
}

impl InferenceResult {
    /// Failure with no worker output, used when the exchange never started.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
            metrics: TimingMetrics::default(),
            raw_log: Vec::new(),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn result_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Success { result_path, .. } => Some(result_path),
            Self::Failure { .. } => None,
        }
    }

    pub fn metrics(&self) -> &TimingMetrics {
        match self {
            Self::Success { metrics, .. } | Self::Failure { metrics, .. } => metrics,
        }
    }

    pub fn raw_log(&self) -> &[String] {
        match self {
            Self::Success { raw_log, .. } | Self::Failure { raw_log, .. } => raw_log,
        }
    }

    /// Failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }
}

/// Flat view of an [`InferenceResult`] for front-end collaborators.
///
/// `result_path` is `None` on failure; the raw log is newline-joined, with the
/// failure reason appended as a final line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceOutcome {
    pub result_path: Option<PathBuf>,
    pub raw_log: String,
    pub prep_ms: f64,
    pub inf_ms: f64,
    pub post_ms: f64,
}

impl From<InferenceResult> for InferenceOutcome {
    fn from(result: InferenceResult) -> Self {
        let metrics = *result.metrics();
        let (result_path, raw_log) = match result {
            InferenceResult::Success {
                result_path,
                raw_log,
                ..
            } => (Some(result_path), raw_log.join("\n")),
            InferenceResult::Failure {
                reason, raw_log, ..
            } => {
                let mut log = raw_log.join("\n");
                if !log.is_empty() {
                    log.push('\n');
                }
                log.push_str(&reason);
                (None, log)
            }
        };

        Self {
            result_path,
            raw_log,
            prep_ms: metrics.preprocess_ms,
            inf_ms: metrics.inference_ms,
            post_ms: metrics.postprocess_ms,
        }
    }
}
