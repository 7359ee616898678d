//! Lineage type and the reversible header encoding.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::MalformedContext;

/// The propagated trace lineage.
///
/// `base_id` names the whole distributed trace and is stable across hops;
/// `parent_id` names the span that issued the current call. Both are
/// opaque, non-empty tokens. `extras` carries forward-looking metadata
/// restricted to JSON primitives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lineage {
    pub base_id: String,
    pub parent_id: String,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl Lineage {
    pub fn new(base_id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            base_id: base_id.into(),
            parent_id: parent_id.into(),
            extras: Map::new(),
        }
    }

    /// Serialize into a single header-safe string.
    ///
    /// Pure transform: base64 over the JSON serialization of the lineage
    /// fields. Never carries anything but the plain fields above.
    pub fn encode(&self) -> String {
        let payload = serde_json::to_vec(self).expect("lineage is always JSON-serializable");
        BASE64.encode(payload)
    }

    /// Decode an inbound header value.
    ///
    /// The value crosses a trust boundary: validate everything, execute
    /// nothing. Corrupt encoding, truncated input, a non-object payload,
    /// missing/empty/non-string identifiers, and non-primitive metadata
    /// are all rejected as [`MalformedContext`].
    pub fn decode(value: &str) -> Result<Self, MalformedContext> {
        let bytes = BASE64.decode(value.trim())?;
        let payload: Value = serde_json::from_slice(&bytes)?;
        let Value::Object(mut fields) = payload else {
            return Err(MalformedContext::NotAnObject);
        };

        let base_id = take_id(&mut fields, "base_id")?;
        let parent_id = take_id(&mut fields, "parent_id")?;

        for (key, value) in &fields {
            if !matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_)) {
                return Err(MalformedContext::NonPrimitiveExtra { key: key.clone() });
            }
        }

        Ok(Self {
            base_id,
            parent_id,
            extras: fields,
        })
    }
}

fn take_id(
    fields: &mut Map<String, Value>,
    key: &'static str,
) -> Result<String, MalformedContext> {
    match fields.remove(key) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id),
        Some(Value::String(_)) => Err(MalformedContext::EmptyField(key)),
        Some(_) => Err(MalformedContext::WrongFieldType(key)),
        None => Err(MalformedContext::MissingField(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let lineage = Lineage::new("trace-1", "span-7");
        let decoded = Lineage::decode(&lineage.encode()).unwrap();
        assert_eq!(decoded, lineage);
    }

    #[test]
    fn test_round_trip_preserves_extras() {
        let mut lineage = Lineage::new("trace-1", "span-7");
        lineage
            .extras
            .insert("tenant".to_string(), Value::String("acme".to_string()));
        lineage.extras.insert("hop".to_string(), Value::from(3));
        lineage.extras.insert("sampled".to_string(), Value::Bool(true));

        let decoded = Lineage::decode(&lineage.encode()).unwrap();
        assert_eq!(decoded, lineage);
        assert_eq!(decoded.extras["tenant"], Value::String("acme".to_string()));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Lineage::decode("!!!not-base64!!!"),
            Err(MalformedContext::Encoding(_))
        ));
    }

    #[test]
    fn test_rejects_truncated() {
        let encoded = Lineage::new("trace-1", "span-7").encode();
        let truncated = &encoded[..encoded.len() / 2];
        assert!(Lineage::decode(truncated).is_err());
    }

    #[test]
    fn test_rejects_non_object_payload() {
        let encoded = BASE64.encode(b"[1, 2, 3]");
        assert!(matches!(
            Lineage::decode(&encoded),
            Err(MalformedContext::NotAnObject)
        ));
    }

    #[test]
    fn test_rejects_missing_parent() {
        let encoded = BASE64.encode(br#"{"base_id": "trace-1"}"#);
        assert!(matches!(
            Lineage::decode(&encoded),
            Err(MalformedContext::MissingField("parent_id"))
        ));
    }

    #[test]
    fn test_rejects_empty_base_id() {
        let encoded = BASE64.encode(br#"{"base_id": "", "parent_id": "span-7"}"#);
        assert!(matches!(
            Lineage::decode(&encoded),
            Err(MalformedContext::EmptyField("base_id"))
        ));
    }

    #[test]
    fn test_rejects_non_string_id() {
        let encoded = BASE64.encode(br#"{"base_id": 42, "parent_id": "span-7"}"#);
        assert!(matches!(
            Lineage::decode(&encoded),
            Err(MalformedContext::WrongFieldType("base_id"))
        ));
    }

    #[test]
    fn test_rejects_nested_extras() {
        let encoded = BASE64.encode(
            br#"{"base_id": "trace-1", "parent_id": "span-7", "payload": {"exec": "rm -rf"}}"#,
        );
        assert!(matches!(
            Lineage::decode(&encoded),
            Err(MalformedContext::NonPrimitiveExtra { .. })
        ));
    }

    #[test]
    fn test_rejects_null_extra() {
        let encoded =
            BASE64.encode(br#"{"base_id": "trace-1", "parent_id": "span-7", "note": null}"#);
        assert!(matches!(
            Lineage::decode(&encoded),
            Err(MalformedContext::NonPrimitiveExtra { .. })
        ));
    }
}
