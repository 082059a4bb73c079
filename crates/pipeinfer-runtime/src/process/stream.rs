//! Line readers for worker streams (non-UTF8-safe).
//!
//! Native inference workers can emit non-UTF8 bytes on stdout/stderr.
//! `BufReader::lines()` fails on invalid UTF-8, which would end an exchange
//! early, so lines are read as bytes and decoded lossily.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Number of trailing stderr lines kept for startup failure reports.
const STDERR_TAIL_LINES: usize = 200;

/// Reads newline-terminated lines from an async byte stream.
pub struct LineReader<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(stream: R) -> Self {
        Self {
            inner: BufReader::new(stream),
            buf: Vec::with_capacity(1024),
        }
    }

    /// Next line with `\n` or `\r\n` removed; `None` at end-of-stream.
    ///
    /// A final line without a terminator is still returned.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.inner.read_until(b'\n', &mut self.buf).await? == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }

        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

/// Continuously drains a worker's stderr so it can never block on a full pipe.
///
/// Lines go to `debug!`; the last [`STDERR_TAIL_LINES`] are kept in a buffer
/// shared with the reader task, so they can be collected even while some
/// other process still holds the write end open.
pub struct StderrCollector {
    task: JoinHandle<()>,
    tail: Arc<Mutex<VecDeque<String>>>,
}

impl StderrCollector {
    pub fn spawn(stream: impl AsyncRead + Unpin + Send + 'static, pid: Option<u32>) -> Self {
        let tail = Arc::new(Mutex::new(VecDeque::with_capacity(STDERR_TAIL_LINES)));
        let buffer = Arc::clone(&tail);

        let task = tokio::spawn(async move {
            let mut reader = LineReader::new(stream);
            loop {
                match reader.next_line().await {
                    Ok(Some(line)) => {
                        debug!(pid = ?pid, "stderr: {}", line);
                        let mut tail = buffer.lock().unwrap_or_else(PoisonError::into_inner);
                        if tail.len() == STDERR_TAIL_LINES {
                            tail.pop_front();
                        }
                        tail.push_back(line);
                    }
                    Ok(None) => break,
                    Err(e) => {
                        debug!(pid = ?pid, error = %e, "stderr reader exiting due to read error");
                        break;
                    }
                }
            }
            debug!(pid = ?pid, "stderr reader task exiting");
        });

        Self { task, tail }
    }

    /// Wait up to `grace` for end-of-stream, then stop reading and return the
    /// collected tail joined by newlines.
    pub async fn finish(mut self, grace: Duration) -> String {
        match timeout(grace, &mut self.task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "stderr reader task failed"),
            Err(_) => {
                debug!(?grace, "stderr still open, keeping what was read");
                self.task.abort();
            }
        }

        let lines = std::mem::take(&mut *self.tail.lock().unwrap_or_else(PoisonError::into_inner));
        Vec::from(lines).join("\n")
    }
}
