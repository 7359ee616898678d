//! Request-scoped tracer adapter.
//!
//! # Responsibilities
//! - Read and decode the configured trace header from inbound requests
//! - Resume or start a session; open one span per request
//! - Guarantee the span closes exactly once on every exit path
//! - Contain tracing-layer failures; never fail a request for them
//!
//! # Design Decisions
//! - Implemented as a `tower::Layer` so any tower/axum stack can mount it
//! - The span close lives in a drop guard owned by the response future:
//!   normal return, inner-service error, unwind, and cancellation all
//!   release it
//! - Undecodable headers start a fresh trace by default; `strict` mode
//!   rejects them with 400 before the inner service runs

mod future;
mod layer;

pub use future::ResponseFuture;
pub use layer::{TraceRelayLayer, TraceRelayService};
