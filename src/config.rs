//! Configuration schema for the tracer adapter.
//!
//! The host service owns config loading and deserializes this section from
//! whatever file or source it uses; all types derive Serde traits for that
//! purpose.

use serde::{Deserialize, Serialize};

/// Header carrying the encoded lineage when none is configured.
pub const DEFAULT_HEADER_KEY: &str = "x-trace-info";

/// Tracer adapter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Enable request tracing. Disabled instances pass every request
    /// through untouched and never read the trace header.
    pub enabled: bool,

    /// Logical operation name recorded on every request span.
    pub service_name: String,

    /// Header field carrying the encoded lineage, inbound and outbound.
    pub header_key: String,

    /// Reject requests whose trace header does not decode (400) instead of
    /// serving them with a fresh trace.
    pub strict: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: "http".to_string(),
            header_key: DEFAULT_HEADER_KEY.to_string(),
            strict: false,
        }
    }
}
