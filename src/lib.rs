//! Request-scoped trace-context propagation for tower/axum services.
//!
//! An upstream caller serializes its trace lineage (root trace id plus the
//! id of the calling span) into a single header. This crate detects that
//! header on an inbound request, resumes the lineage, scopes one profiling
//! span to the request's lifetime, and re-emits the lineage on downstream
//! calls made from inside that scope.
//!
//! # Request Flow
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!   inbound request   │  TraceRelayService                           │
//!   ──────────────────┼─▶ read x-trace-info ──▶ decode lineage       │
//!                     │        │ absent or malformed → fresh trace   │
//!                     │        ▼                                     │
//!                     │   resume/start session                       │
//!                     │        ▼                                     │
//!                     │   open request span ──▶ wrapped handler      │
//!                     │        │                      │              │
//!   response / error  │        └── close span ◀───────┘              │
//!   ◀─────────────────┼──────────── exactly once, every exit path    │
//!                     └──────────────────────────────────────────────┘
//! ```
//!
//! Tracing is observability, never a dependency of the request path: a
//! malformed header, a refusing profiler backend, or any other failure
//! inside this crate downgrades the request to untraced pass-through
//! instead of failing it. Failures raised by the wrapped handler are
//! surfaced unchanged, after the span closes.

// Core protocol
pub mod context;
pub mod session;

// Request boundary
pub mod middleware;
pub mod outbound;

// Cross-cutting concerns
pub mod config;
pub mod error;

pub use config::TraceConfig;
pub use context::Lineage;
pub use error::{MalformedContext, TraceError};
pub use middleware::{TraceRelayLayer, TraceRelayService};
pub use session::{MemoryRecorder, NoopRecorder, Session, SpanRecord, SpanRecorder, SpanStatus};
