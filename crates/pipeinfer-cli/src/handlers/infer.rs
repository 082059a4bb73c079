//! Infer command handler.
//!
//! Sends each file to the shared worker in order and reports what came back.

use std::path::PathBuf;

use anyhow::Result;
use pipeinfer_core::{InferenceOutcome, InferenceResult, InferenceService, MediaKind, WorkRequest};
use serde_json::json;
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{Report, print_separator};

/// Execute the infer command.
///
/// Missing inputs are reported as failures without reaching the worker.
/// The worker is shut down once every file has been handled.
///
/// # Errors
///
/// Returns `CliError::Inference` if at least one file failed.
pub async fn execute(ctx: &CliContext, files: &[PathBuf], json_output: bool) -> Result<()> {
    let mut failed = 0usize;

    for (index, file) in files.iter().enumerate() {
        let (kind, result) = match WorkRequest::new(file) {
            Ok(request) => (request.media_kind(), run_one(ctx, request).await),
            Err(e) => (
                MediaKind::from_path(file),
                InferenceResult::failure(format!("invalid request path: {e}")),
            ),
        };
        if !result.is_success() {
            failed += 1;
        }

        if json_output {
            let line = json!({
                "file": file,
                "media_kind": kind,
                "outcome": InferenceOutcome::from(result),
            });
            println!("{line}");
        } else {
            if index > 0 {
                print_separator(60);
            }
            print!("{}", Report::new(file, kind, &result));
        }
    }

    ctx.session().shutdown().await;

    if failed > 0 {
        return Err(CliError::Inference(format!(
            "{failed} of {} file(s) did not produce a result",
            files.len()
        ))
        .into());
    }
    Ok(())
}

async fn run_one(ctx: &CliContext, request: WorkRequest) -> InferenceResult {
    if !request.path().is_file() {
        return InferenceResult::failure(format!(
            "input file not found: {}",
            request.path().display()
        ));
    }
    debug!(path = %request.path().display(), "submitting");
    ctx.session().submit(request).await
}
