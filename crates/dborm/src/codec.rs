//! Text serialization of complex columns.
//!
//! The same [`Codec`] instance serializes complex field values on write and
//! deserializes complex columns on read, so whatever a client stores it can
//! read back.

use crate::error::{OrmError, OrmResult};
use std::sync::Arc;

/// Serialization strategy for complex columns.
pub trait Codec: Send + Sync {
    /// Serialize a document to the text stored in the column.
    fn encode(&self, doc: &serde_json::Value) -> OrmResult<String>;

    /// Parse the raw bytes of a column back into a document.
    fn decode(&self, bytes: &[u8]) -> OrmResult<serde_json::Value>;
}

/// JSON text, via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, doc: &serde_json::Value) -> OrmResult<String> {
        Ok(serde_json::to_string(doc)?)
    }

    fn decode(&self, bytes: &[u8]) -> OrmResult<serde_json::Value> {
        serde_json::from_slice(bytes).map_err(|e| {
            OrmError::Serialization(format!("{e}, check if the destination type matches"))
        })
    }
}

/// Shared codec handle.
pub type SharedCodec = Arc<dyn Codec>;

pub(crate) fn default_codec() -> SharedCodec {
    Arc::new(JsonCodec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip() {
        let doc = serde_json::json!({"a": [1, 2], "b": {"c": null}});
        let text = JsonCodec.encode(&doc).unwrap();
        assert_eq!(JsonCodec.decode(text.as_bytes()).unwrap(), doc);
    }

    #[test]
    fn encode_keeps_key_order() {
        let doc = serde_json::json!({"theme": "dark", "langs": ["en"], "a": 1});
        assert_eq!(
            JsonCodec.encode(&doc).unwrap(),
            r#"{"theme":"dark","langs":["en"],"a":1}"#
        );
    }

    #[test]
    fn decode_failure_is_a_serialization_error() {
        let err = JsonCodec.decode(b"{not json").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Serialization);
    }
}
