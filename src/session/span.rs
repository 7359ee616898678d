//! Request span records and the guaranteed-close guard.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::TraceError;
use crate::session::recorder::SpanRecorder;
use crate::session::Session;

/// State of a request span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStatus {
    /// Span is open; the request is in flight.
    Running,
    /// The wrapped handler returned a response.
    Completed,
    /// The wrapped handler returned an error.
    Failed,
    /// The request was torn down before the handler finished.
    Cancelled,
}

/// Request attributes fixed when the span opens. Read-only annotation; not
/// propagated onward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    pub method: String,
    pub path: String,
    pub query: String,
    pub scheme: String,
    pub host: String,
}

impl RequestInfo {
    /// Capture the attributes the span is annotated with.
    pub fn from_request<B>(request: &http::Request<B>) -> Self {
        let uri = request.uri();
        let host = uri
            .authority()
            .map(|authority| authority.to_string())
            .or_else(|| {
                request
                    .headers()
                    .get(http::header::HOST)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            })
            .unwrap_or_default();

        Self {
            method: request.method().to_string(),
            path: uri.path().to_string(),
            query: uri.query().unwrap_or_default().to_string(),
            scheme: uri.scheme_str().unwrap_or("http").to_string(),
            host,
        }
    }
}

/// One recorded request span.
#[derive(Debug, Clone)]
pub struct SpanRecord {
    pub name: String,
    pub base_id: String,
    pub span_id: String,
    pub parent_id: Option<String>,
    pub info: RequestInfo,
    pub status: SpanStatus,
    pub duration: Option<Duration>,
}

/// Scope guard pairing span open with a close that fires on every exit
/// path. An unfinished guard closes on drop as `Cancelled`, so a response
/// future torn down mid-flight still releases its span.
pub(crate) struct SpanGuard {
    record: Option<SpanRecord>,
    recorder: Arc<dyn SpanRecorder>,
    started: Instant,
}

impl SpanGuard {
    /// Open a span for `session`. The recorder may refuse, in which case
    /// the caller serves the request untraced.
    pub(crate) fn open(
        name: &str,
        session: &Session,
        info: RequestInfo,
        recorder: Arc<dyn SpanRecorder>,
    ) -> Result<Self, TraceError> {
        let record = SpanRecord {
            name: name.to_string(),
            base_id: session.base_id().to_string(),
            span_id: session.span_id().to_string(),
            parent_id: session.parent_id().map(str::to_string),
            info,
            status: SpanStatus::Running,
            duration: None,
        };
        recorder.open(&record)?;
        tracing::debug!(
            base_id = %record.base_id,
            span_id = %record.span_id,
            "request span opened"
        );
        Ok(Self {
            record: Some(record),
            recorder,
            started: Instant::now(),
        })
    }

    /// Close the span with a terminal status.
    pub(crate) fn finish(mut self, status: SpanStatus) {
        self.close(status);
    }

    fn close(&mut self, status: SpanStatus) {
        // The record leaves the guard on first close; a later drop is a no-op.
        let Some(mut record) = self.record.take() else {
            return;
        };
        let duration = self.started.elapsed();
        record.status = status;
        record.duration = Some(duration);
        tracing::debug!(
            base_id = %record.base_id,
            span_id = %record.span_id,
            status = ?status,
            duration_ms = duration.as_millis() as u64,
            "request span closed"
        );
        self.recorder.close(record);
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        self.close(SpanStatus::Cancelled);
    }
}
