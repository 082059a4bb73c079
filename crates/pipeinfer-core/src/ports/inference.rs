//! Inference service port.
//!
//! This is the only boundary a front-end touches: hand over a file, get a
//! typed result back. Failures are values, not errors.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::{InferenceOutcome, InferenceResult, WorkRequest};

/// Runs work items against a supervised worker.
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Run one exchange. Calls are serialized; a second caller waits.
    async fn submit(&self, request: WorkRequest) -> InferenceResult;

    /// Stop the worker, if any. Idempotent.
    async fn shutdown(&self);

    /// Collaborator-facing variant of [`submit`](Self::submit) taking a raw path.
    async fn submit_path(&self, path: &Path) -> InferenceOutcome {
        match WorkRequest::new(path) {
            Ok(request) => self.submit(request).await.into(),
            Err(e) => InferenceResult::failure(format!("invalid request path: {e}")).into(),
        }
    }
}
