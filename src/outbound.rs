//! Outbound header production for downstream calls.
//!
//! A handler making a downstream call while its request span is open
//! attaches the active lineage as the same single header the adapter reads
//! on the inbound side. No active session, no header.

use http::{Extensions, HeaderMap, HeaderName, HeaderValue};

use crate::session::Session;

/// Resolve the request-local session from a request's extensions.
///
/// Present only while the request's span is live; pass-through requests
/// (disabled adapter, refused span) carry none.
pub fn current_session(extensions: &Extensions) -> Option<&Session> {
    extensions.get::<Session>()
}

/// Attach the session's lineage to an outbound header map.
///
/// The downstream service will parent its own span on this request's span.
pub fn inject(session: &Session, header: &HeaderName, headers: &mut HeaderMap) {
    let encoded = session.lineage().encode();
    let value = HeaderValue::from_str(&encoded).expect("base64 is a valid header value");
    headers.insert(header.clone(), value);
}

/// Attach the active lineage, if any, resolved from request extensions.
/// Leaves the map untouched when the request carries no session.
pub fn inject_current(extensions: &Extensions, header: &HeaderName, headers: &mut HeaderMap) {
    if let Some(session) = current_session(extensions) {
        inject(session, header, headers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Lineage;

    fn trace_header() -> HeaderName {
        HeaderName::from_static("x-trace-info")
    }

    #[test]
    fn test_inject_produces_decodable_lineage() {
        let session = Session::resume(Lineage::new("trace-1", "span-7"));
        let mut headers = HeaderMap::new();

        inject(&session, &trace_header(), &mut headers);

        let value = headers.get("x-trace-info").unwrap().to_str().unwrap();
        let lineage = Lineage::decode(value).unwrap();
        assert_eq!(lineage.base_id, "trace-1");
        assert_eq!(lineage.parent_id, session.span_id());
    }

    #[test]
    fn test_inject_current_without_session_is_a_no_op() {
        let extensions = Extensions::new();
        let mut headers = HeaderMap::new();

        inject_current(&extensions, &trace_header(), &mut headers);

        assert!(headers.is_empty());
    }

    #[test]
    fn test_inject_current_with_session_sets_header() {
        let mut extensions = Extensions::new();
        extensions.insert(Session::fresh());
        let mut headers = HeaderMap::new();

        inject_current(&extensions, &trace_header(), &mut headers);

        assert!(headers.contains_key("x-trace-info"));
    }
}
