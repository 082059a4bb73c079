//! Per-file result report.

use std::fmt;
use std::path::Path;

use pipeinfer_core::{InferenceResult, MediaKind};

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Human-readable view of one file's result.
pub struct Report<'a> {
    pub file: &'a Path,
    pub kind: MediaKind,
    pub result: &'a InferenceResult,
}

impl<'a> Report<'a> {
    pub const fn new(file: &'a Path, kind: MediaKind, result: &'a InferenceResult) -> Self {
        Self { file, kind, result }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.file.display(), self.kind)?;

        match self.result {
            InferenceResult::Success { result_path, .. } => {
                writeln!(f, "  result:  {}", result_path.display())?;
            }
            InferenceResult::Failure { reason, .. } => {
                writeln!(f, "  FAILED:  {reason}")?;
            }
        }

        let metrics = self.result.metrics();
        writeln!(
            f,
            "  timing:  prep {:.2} ms | inf {:.2} ms | post {:.2} ms | total {:.2} ms",
            metrics.preprocess_ms,
            metrics.inference_ms,
            metrics.postprocess_ms,
            metrics.total_ms()
        )?;
        if metrics.fps() > 0.0 {
            writeln!(f, "  fps:     {:.1}", metrics.fps())?;
        }

        let log = self.result.raw_log();
        if !log.is_empty() {
            writeln!(f, "  worker output:")?;
            for line in log {
                writeln!(f, "    {line}")?;
            }
        }
        Ok(())
    }
}
