//! Consumed interface to the profiler backend.
//!
//! Span storage, tree assembly, and export to a collector live on the
//! backend's side of this boundary; the adapter only opens and closes.

use std::sync::Mutex;

use crate::error::TraceError;
use crate::session::span::SpanRecord;

/// Sink for request spans, implemented by the host's profiler backend.
///
/// Implementations are shared across concurrent requests and must handle
/// their own synchronization.
pub trait SpanRecorder: Send + Sync + 'static {
    /// Called once when a request span opens. Returning an error downgrades
    /// that request to untraced pass-through; it never fails the request.
    fn open(&self, record: &SpanRecord) -> Result<(), TraceError>;

    /// Called exactly once when the span closes, on every exit path.
    fn close(&self, record: SpanRecord);
}

/// Recorder that discards everything. The default when no backend is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecorder;

impl SpanRecorder for NoopRecorder {
    fn open(&self, _record: &SpanRecord) -> Result<(), TraceError> {
        Ok(())
    }

    fn close(&self, _record: SpanRecord) {}
}

/// Recorder that keeps every span in memory, for tests and local inspection.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    opened: Mutex<Vec<SpanRecord>>,
    closed: Mutex<Vec<SpanRecord>>,
}

impl MemoryRecorder {
    /// Snapshot of spans opened so far.
    pub fn opened(&self) -> Vec<SpanRecord> {
        self.opened.lock().unwrap().clone()
    }

    /// Snapshot of spans closed so far.
    pub fn closed(&self) -> Vec<SpanRecord> {
        self.closed.lock().unwrap().clone()
    }
}

impl SpanRecorder for MemoryRecorder {
    fn open(&self, record: &SpanRecord) -> Result<(), TraceError> {
        self.opened.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn close(&self, record: SpanRecord) {
        self.closed.lock().unwrap().push(record);
    }
}
