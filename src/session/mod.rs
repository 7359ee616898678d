//! Request-local profiling session.
//!
//! # Responsibilities
//! - Resume a session from a decoded lineage, or mint a fresh one
//! - Hold the identifiers the request span and outbound calls derive from
//! - Stay request-local: one session per inbound request, carried in that
//!   request's extensions, never shared across requests
//!
//! # Design Decisions
//! - Freshly minted identifiers are UUID v4 strings; resumed identifiers
//!   stay opaque end-to-end
//! - Inbound metadata is carried on the session and re-emitted verbatim on
//!   outbound calls (relay behavior)

pub mod recorder;
pub mod span;

pub use recorder::{MemoryRecorder, NoopRecorder, SpanRecorder};
pub use span::{RequestInfo, SpanRecord, SpanStatus};

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::context::Lineage;

/// Live trace state for one inbound request.
///
/// Cheap to clone; the adapter inserts one into the request's extensions
/// so handlers can propagate the lineage on downstream calls.
#[derive(Debug, Clone)]
pub struct Session {
    base_id: String,
    span_id: String,
    parent_id: Option<String>,
    extras: Map<String, Value>,
}

impl Session {
    /// Resume the trace described by an inbound lineage. The request span
    /// gets a fresh id and the caller's span becomes its parent.
    pub fn resume(lineage: Lineage) -> Self {
        Self {
            base_id: lineage.base_id,
            span_id: Uuid::new_v4().to_string(),
            parent_id: Some(lineage.parent_id),
            extras: lineage.extras,
        }
    }

    /// Start a fresh trace: newly minted root id, no parent.
    pub fn fresh() -> Self {
        Self {
            base_id: Uuid::new_v4().to_string(),
            span_id: Uuid::new_v4().to_string(),
            parent_id: None,
            extras: Map::new(),
        }
    }

    /// Root identifier of the distributed trace.
    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// Identifier of the span opened for this request.
    pub fn span_id(&self) -> &str {
        &self.span_id
    }

    /// Span id of the upstream caller, if the trace was resumed.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Lineage to hand to a downstream call: same root, this request's
    /// span as the parent, inbound metadata carried forward.
    pub fn lineage(&self) -> Lineage {
        Lineage {
            base_id: self.base_id.clone(),
            parent_id: self.span_id.clone(),
            extras: self.extras.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_keeps_root_and_parent() {
        let session = Session::resume(Lineage::new("trace-1", "span-7"));
        assert_eq!(session.base_id(), "trace-1");
        assert_eq!(session.parent_id(), Some("span-7"));
        assert_ne!(session.span_id(), "span-7");
    }

    #[test]
    fn test_fresh_mints_root_without_parent() {
        let session = Session::fresh();
        assert!(Uuid::parse_str(session.base_id()).is_ok());
        assert!(session.parent_id().is_none());
        assert_ne!(session.base_id(), session.span_id());
    }

    #[test]
    fn test_outbound_lineage_parents_on_current_span() {
        let mut inbound = Lineage::new("trace-1", "span-7");
        inbound
            .extras
            .insert("tenant".to_string(), Value::String("acme".to_string()));

        let session = Session::resume(inbound);
        let outbound = session.lineage();

        assert_eq!(outbound.base_id, "trace-1");
        assert_eq!(outbound.parent_id, session.span_id());
        assert_eq!(
            outbound.extras["tenant"],
            Value::String("acme".to_string())
        );
    }
}
