//! Error definitions for the tracing layer.
//!
//! Everything here is contained locally: tracing is observability, not a
//! dependency of the request path, so none of these errors ever turns an
//! otherwise-successful request into a failure.

use thiserror::Error;

/// Rejections produced while decoding an inbound trace-context header.
///
/// The header crosses a trust boundary, so every shape violation is a
/// distinct, inspectable rejection rather than a panic or a silent guess.
#[derive(Debug, Error)]
pub enum MalformedContext {
    /// Header value contains bytes that are not printable ASCII.
    #[error("header value is not printable ASCII")]
    Unprintable,

    /// Header value is not valid base64.
    #[error("not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Decoded bytes are not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),

    /// Payload deserialized to something other than a JSON object.
    #[error("payload is not a JSON object")]
    NotAnObject,

    /// A required identifier field is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A required identifier field is present but empty.
    #[error("field `{0}` is empty")]
    EmptyField(&'static str),

    /// A required identifier field holds a non-string value.
    #[error("field `{0}` is not a string")]
    WrongFieldType(&'static str),

    /// Metadata values must be JSON primitives (string, number, bool).
    #[error("metadata key `{key}` holds a non-primitive value")]
    NonPrimitiveExtra { key: String },
}

/// Errors raised by the tracing layer itself.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The profiler backend refused to open a span. The request is served
    /// untraced.
    #[error("profiler session unavailable: {0}")]
    SessionUnavailable(String),

    /// The configured header key is not a legal HTTP header name.
    #[error("`{0}` is not a valid header name")]
    InvalidHeaderKey(String),

    /// An inbound header failed to decode.
    #[error(transparent)]
    MalformedContext(#[from] MalformedContext),
}
