//! Trace lineage and its transport-header codec.
//!
//! # Responsibilities
//! - Define the propagated unit: root trace id + calling span id + extras
//! - Encode it into a single printable, header-safe string
//! - Decode it back, treating the header as untrusted input
//!
//! # Design Decisions
//! - Wire form is base64 over a JSON object with `base_id` and `parent_id`
//!   keys; unknown primitive keys pass through so relay hops do not strip
//!   fields they do not understand
//! - The payload is data, never code: decoding validates a fixed schema
//!   and rejects anything else
//! - Identifiers are opaque strings; their format is the session's concern

pub mod codec;

pub use codec::Lineage;
