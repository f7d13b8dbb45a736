//! Caller-owned execution context for analysis requests.
//!
//! A `Session` runs one `Analyzer` on a dedicated worker thread so the
//! caller never blocks on parsing. Every submission gets the next sequence
//! number; only the response to the most recent submission is ever
//! delivered. Older responses are dropped on arrival, and requests that are
//! already superseded when the worker reaches them are skipped.
//!
//! Cancellation is coarse: `dispose` abandons all queued and in-flight work
//! and nothing is delivered afterwards.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use crate::diagnostic::Diagnostic;
use crate::engine::{Analyzer, RenderedTemplate};
use crate::parser::Dialect;
use crate::synth::TemplateOptions;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session has been disposed")]
    Disposed,
    #[error("failed to start analysis worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// The outcome of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub seq: u64,
    pub result: Result<RenderedTemplate, Diagnostic>,
}

impl Response {
    /// Boundary form: `{"seq":n,"result":{"ok":text}}` or `{"seq":n,"result":{"err":diag}}`.
    pub fn to_wire(&self) -> WireResponse<'_> {
        WireResponse {
            seq: self.seq,
            result: match &self.result {
                Ok(template) => WireResult::Ok(&template.text),
                Err(diag) => WireResult::Err(diag),
            },
        }
    }
}

/// Serializable response envelope.
#[derive(Debug, Serialize)]
pub struct WireResponse<'a> {
    pub seq: u64,
    pub result: WireResult<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireResult<'a> {
    Ok(&'a str),
    Err(&'a Diagnostic),
}

struct Request {
    seq: u64,
    source: String,
}

/// A running analysis context.
pub struct Session {
    requests: Option<UnboundedSender<Request>>,
    responses: UnboundedReceiver<Response>,
    /// Highest sequence number handed out, shared with the worker.
    latest: Arc<AtomicU64>,
    disposed: Arc<AtomicBool>,
}

impl Session {
    /// Start a worker thread owning a warm analyzer.
    pub fn spawn(dialect: Dialect, options: TemplateOptions) -> Result<Self, SessionError> {
        let (req_tx, mut req_rx) = mpsc::unbounded_channel::<Request>();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel::<Response>();
        let latest = Arc::new(AtomicU64::new(0));
        let disposed = Arc::new(AtomicBool::new(false));

        let worker_latest = Arc::clone(&latest);
        let worker_disposed = Arc::clone(&disposed);
        thread::Builder::new()
            .name("zubora-session".to_string())
            .spawn(move || {
                let mut analyzer = Analyzer::with_options(dialect, options);
                while let Some(request) = req_rx.blocking_recv() {
                    if worker_disposed.load(Ordering::Acquire) {
                        break;
                    }
                    if request.seq < worker_latest.load(Ordering::Acquire) {
                        log::debug!("skipping superseded request #{}", request.seq);
                        continue;
                    }
                    let result = analyzer.analyze(&request.source);
                    if worker_disposed.load(Ordering::Acquire) {
                        break;
                    }
                    let response = Response {
                        seq: request.seq,
                        result,
                    };
                    if resp_tx.send(response).is_err() {
                        break;
                    }
                }
                log::debug!("analysis worker stopped");
            })?;

        Ok(Self {
            requests: Some(req_tx),
            responses: resp_rx,
            latest,
            disposed,
        })
    }

    /// Queue module text for analysis and return its sequence number.
    pub fn submit(&mut self, source: impl Into<String>) -> Result<u64, SessionError> {
        let sender = self.requests.as_ref().ok_or(SessionError::Disposed)?;
        let seq = self.latest.load(Ordering::Acquire) + 1;
        self.latest.store(seq, Ordering::Release);
        sender
            .send(Request {
                seq,
                source: source.into(),
            })
            .map_err(|_| SessionError::Disposed)?;
        Ok(seq)
    }

    /// Sequence number of the most recent submission (0 before any).
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Wait for the response to the latest submission.
    ///
    /// Returns `None` once the session is disposed or the worker is gone.
    pub async fn recv(&mut self) -> Option<Response> {
        loop {
            if self.is_disposed() {
                return None;
            }
            let response = self.responses.recv().await?;
            if let Some(response) = self.accept(response) {
                return Some(response);
            }
        }
    }

    /// Blocking `recv` for callers without a runtime.
    ///
    /// Panics if called from within an async context.
    pub fn recv_blocking(&mut self) -> Option<Response> {
        loop {
            if self.is_disposed() {
                return None;
            }
            let response = self.responses.blocking_recv()?;
            if let Some(response) = self.accept(response) {
                return Some(response);
            }
        }
    }

    /// The latest response if it has already arrived.
    pub fn try_recv(&mut self) -> Option<Response> {
        loop {
            if self.is_disposed() {
                return None;
            }
            match self.responses.try_recv() {
                Ok(response) => {
                    if let Some(response) = self.accept(response) {
                        return Some(response);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// Terminate the context. Further submissions fail and nothing more is
    /// delivered.
    pub fn dispose(&mut self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.requests = None;
        self.responses.close();
        log::debug!("session disposed at #{}", self.latest());
    }

    fn accept(&self, response: Response) -> Option<Response> {
        if response.seq == self.latest() {
            Some(response)
        } else {
            log::debug!(
                "dropping stale response #{} (latest #{})",
                response.seq,
                self.latest()
            );
            None
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.dispose();
    }
}
