//! Inference session: the single entry point for running work on the worker.
//!
//! The session owns at most one worker. Each `submit` holds the worker lock
//! for the whole exchange, so requests never interleave on the pipe.
//!
//! # Failure policy
//!
//! - A missing or dead worker gets exactly one restart per call. If that
//!   fails, the call returns `backend unavailable` without touching the pipe.
//! - A worker whose reply ended abnormally (end-of-stream, read error,
//!   timeout) or that refused the request line is discarded; the next call
//!   starts a fresh one.
//! - Nothing is retried automatically; callers decide whether to resubmit.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pipeinfer_core::ports::{InferenceService, WorkerChannel, WorkerError, WorkerLauncher};
use pipeinfer_core::protocol::{DecodeStep, ExchangeCodec, MarkerCodec, ResponseEnd};
use pipeinfer_core::settings::DEFAULT_READINESS_TOKEN;
use pipeinfer_core::{InferenceResult, Settings, WorkRequest};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::process::ProcessLauncher;
use crate::readiness::wait_until_ready;

/// Prefix of the failure reason when no worker could be started.
pub const BACKEND_UNAVAILABLE: &str = "backend unavailable";

/// Coordinates request/response exchanges with one supervised worker.
pub struct InferenceSession {
    launcher: Arc<dyn WorkerLauncher>,
    codec: Arc<dyn ExchangeCodec>,
    readiness_token: String,
    startup_timeout: Option<Duration>,
    response_timeout: Option<Duration>,
    worker: Mutex<Option<Box<dyn WorkerChannel>>>,
    launches: AtomicU64,
}

impl InferenceSession {
    /// Session with the marker codec, default tokens and no timeouts.
    ///
    /// No worker is spawned until the first `submit` (or `start`).
    pub fn new(launcher: Arc<dyn WorkerLauncher>) -> Self {
        Self {
            launcher,
            codec: Arc::new(MarkerCodec::default()),
            readiness_token: DEFAULT_READINESS_TOKEN.to_string(),
            startup_timeout: None,
            response_timeout: None,
            worker: Mutex::new(None),
            launches: AtomicU64::new(0),
        }
    }

    /// Session for a local worker process described by `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Arc::new(ProcessLauncher::from_settings(settings)))
            .with_codec(Arc::new(MarkerCodec::new(settings.error_token.clone())))
            .with_readiness_token(settings.readiness_token.clone())
            .with_startup_timeout(settings.startup_timeout())
            .with_response_timeout(settings.response_timeout())
    }

    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn ExchangeCodec>) -> Self {
        self.codec = codec;
        self
    }

    #[must_use]
    pub fn with_readiness_token(mut self, token: impl Into<String>) -> Self {
        self.readiness_token = token.into();
        self
    }

    #[must_use]
    pub const fn with_startup_timeout(mut self, limit: Option<Duration>) -> Self {
        self.startup_timeout = limit;
        self
    }

    #[must_use]
    pub const fn with_response_timeout(mut self, limit: Option<Duration>) -> Self {
        self.response_timeout = limit;
        self
    }

    /// Number of launch attempts so far, the first start included.
    ///
    /// Attempts whose spawn failed are counted too.
    pub fn launch_count(&self) -> u64 {
        self.launches.load(Ordering::Relaxed)
    }

    /// Start the worker now instead of on first use.
    pub async fn start(&self) -> Result<(), WorkerError> {
        let mut slot = self.worker.lock().await;
        self.ensure_worker(&mut slot).await
    }

    /// Make sure `slot` holds a live, ready worker, restarting at most once.
    async fn ensure_worker(
        &self,
        slot: &mut Option<Box<dyn WorkerChannel>>,
    ) -> Result<(), WorkerError> {
        if let Some(worker) = slot.as_mut() {
            if worker.is_alive() {
                return Ok(());
            }
            warn!(pid = ?worker.pid(), "worker is not running, restarting");
            worker.terminate().await;
        }
        *slot = None;

        self.launches.fetch_add(1, Ordering::Relaxed);
        let mut worker = self.launcher.launch().await?;
        wait_until_ready(
            worker.as_mut(),
            &self.readiness_token,
            self.startup_timeout,
        )
        .await?;

        info!(pid = ?worker.pid(), launches = self.launch_count(), "worker started");
        *slot = Some(worker);
        Ok(())
    }

    /// Read response lines until the codec completes or the stream stops.
    async fn read_response(&self, worker: &mut dyn WorkerChannel) -> (InferenceResult, bool) {
        let mut decoder = self.codec.decoder();

        let end = loop {
            let next = match self.response_timeout {
                Some(limit) => match timeout(limit, worker.read_line()).await {
                    Ok(next) => next,
                    Err(_) => break ResponseEnd::TimedOut(limit),
                },
                None => worker.read_line().await,
            };

            match next {
                Ok(Some(line)) => {
                    debug!(pid = ?worker.pid(), "worker: {}", line);
                    if decoder.push_line(line) == DecodeStep::Complete {
                        break ResponseEnd::Complete;
                    }
                }
                Ok(None) => break ResponseEnd::EndOfStream,
                Err(e) => break ResponseEnd::ReadError(e.to_string()),
            }
        };

        let reusable = end == ResponseEnd::Complete;
        (decoder.finish(end), reusable)
    }

    async fn discard(slot: &mut Option<Box<dyn WorkerChannel>>) {
        if let Some(mut worker) = slot.take() {
            worker.terminate().await;
        }
    }
}

#[async_trait]
impl InferenceService for InferenceSession {
    async fn submit(&self, request: WorkRequest) -> InferenceResult {
        let mut slot = self.worker.lock().await;

        if let Err(e) = self.ensure_worker(&mut slot).await {
            warn!(error = %e, "cannot run request without a worker");
            return InferenceResult::failure(format!(
                "{BACKEND_UNAVAILABLE}: {}",
                e.diagnostics()
            ));
        }
        let Some(worker) = slot.as_mut() else {
            return InferenceResult::failure(BACKEND_UNAVAILABLE);
        };

        let line = self.codec.encode_request(&request);
        let (result, reusable) = match worker.write_line(&line).await {
            Ok(()) => self.read_response(worker.as_mut()).await,
            Err(e) => (InferenceResult::failure(e.to_string()), false),
        };

        if !reusable {
            warn!(
                reason = result.reason().unwrap_or_default(),
                "exchange ended abnormally, discarding worker"
            );
            Self::discard(&mut slot).await;
        }

        match &result {
            InferenceResult::Success { result_path, .. } => {
                debug!(request = %request.path().display(), result = %result_path.display(), "exchange succeeded");
            }
            InferenceResult::Failure { reason, .. } => {
                warn!(request = %request.path().display(), %reason, "exchange failed");
            }
        }
        result
    }

    async fn shutdown(&self) {
        let mut slot = self.worker.lock().await;
        if slot.is_some() {
            info!("shutting down worker");
        }
        Self::discard(&mut slot).await;
    }
}
