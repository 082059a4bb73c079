//! Timing metric lines.
//!
//! The worker prints stage timings as free text, e.g.
//! `prepare image take: 12.5 ms`. Only the three labels below are recognized;
//! everything else is inert.

use thiserror::Error;

use crate::domain::TimingMetrics;

/// The closed set of timing labels the worker emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricLabel {
    Preprocess,
    Inference,
    Postprocess,
}

/// Why a recognized metric line carried no usable number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricParseError {
    #[error("no ':' separator")]
    MissingSeparator,

    #[error("no value after ':'")]
    MissingValue,

    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    #[error("'{0}' is not a non-negative duration")]
    OutOfRange(String),
}

impl MetricLabel {
    /// Labels in the order lines are tested against them.
    pub const ALL: [Self; 3] = [Self::Preprocess, Self::Inference, Self::Postprocess];

    /// Text that identifies the metric on a line, colon included.
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Preprocess => "prepare image take:",
            Self::Inference => "Inference take:",
            Self::Postprocess => "Post process take:",
        }
    }

    /// Find the label a line carries, if any.
    pub fn detect(line: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| line.contains(label.marker()))
    }

    /// Store `value` in the matching field.
    pub fn apply(self, metrics: &mut TimingMetrics, value: f64) {
        match self {
            Self::Preprocess => metrics.preprocess_ms = value,
            Self::Inference => metrics.inference_ms = value,
            Self::Postprocess => metrics.postprocess_ms = value,
        }
    }
}

impl std::fmt::Display for MetricLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.marker().trim_end_matches(':'))
    }
}

/// Extract the numeric value of a metric line.
///
/// Splits on the first colon, trims, and parses the first space-separated
/// token; the unit that follows is ignored.
pub fn parse_metric_value(line: &str) -> Result<f64, MetricParseError> {
    let (_, rest) = line
        .split_once(':')
        .ok_or(MetricParseError::MissingSeparator)?;

    let rest = rest.trim();
    let token = rest.split(' ').next().unwrap_or_default();
    if token.is_empty() {
        return Err(MetricParseError::MissingValue);
    }

    let value: f64 = token
        .parse()
        .map_err(|_| MetricParseError::InvalidNumber(token.to_string()))?;

    if !value.is_finite() || value < 0.0 {
        return Err(MetricParseError::OutOfRange(token.to_string()));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_each_label() {
        assert_eq!(
            MetricLabel::detect("prepare image take: 12.5 ms"),
            Some(MetricLabel::Preprocess)
        );
        assert_eq!(
            MetricLabel::detect("Inference take: 30.0 ms"),
            Some(MetricLabel::Inference)
        );
        assert_eq!(
            MetricLabel::detect("Post process take: 4.2 ms"),
            Some(MetricLabel::Postprocess)
        );
    }

    #[test]
    fn test_detect_is_case_sensitive_and_needs_colon() {
        assert_eq!(MetricLabel::detect("inference take: 3 ms"), None);
        assert_eq!(MetricLabel::detect("Inference take 3 ms"), None);
        assert_eq!(MetricLabel::detect("loading engine"), None);
    }

    #[test]
    fn test_parse_value_ignores_unit() {
        assert_eq!(parse_metric_value("Inference take: 30.0 ms"), Ok(30.0));
        assert_eq!(parse_metric_value("Inference take:   7 ms  "), Ok(7.0));
        assert_eq!(parse_metric_value("Inference take: 8.25"), Ok(8.25));
    }

    #[test]
    fn test_parse_value_errors() {
        assert_eq!(
            parse_metric_value("Inference take: abc ms"),
            Err(MetricParseError::InvalidNumber("abc".to_string()))
        );
        assert_eq!(
            parse_metric_value("Inference take:"),
            Err(MetricParseError::MissingValue)
        );
        assert_eq!(
            parse_metric_value("Inference take: -1 ms"),
            Err(MetricParseError::OutOfRange("-1".to_string()))
        );
        assert_eq!(
            parse_metric_value("Inference take: NaN ms"),
            Err(MetricParseError::OutOfRange("NaN".to_string()))
        );
        assert_eq!(
            parse_metric_value("no separator"),
            Err(MetricParseError::MissingSeparator)
        );
    }

    #[test]
    fn test_apply_sets_matching_field() {
        let mut metrics = TimingMetrics::default();
        MetricLabel::Postprocess.apply(&mut metrics, 4.2);
        assert!((metrics.postprocess_ms - 4.2).abs() < f64::EPSILON);
        assert!(metrics.preprocess_ms.abs() < f64::EPSILON);
    }

    #[test]
    fn test_display_drops_colon() {
        assert_eq!(MetricLabel::Preprocess.to_string(), "prepare image take");
    }
}
