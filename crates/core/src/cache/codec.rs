//! Self-describing value encoding.
//!
//! Every stored value is a one-byte tag followed by the payload: raw bytes are
//! kept verbatim, anything else is stored as JSON text.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Tag for JSON payloads.
pub const STRUCT_TAG: u8 = 0;

/// Tag for raw binary payloads.
pub const RAW_TAG: u8 = 1;

/// A value that can be stored in the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    /// Binary payload, stored and returned unchanged.
    Raw(Vec<u8>),
    /// Structured payload, stored as JSON.
    Struct(serde_json::Value),
}

impl CacheValue {
    /// Build a structured value from anything serializable.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, crate::Error> {
        Ok(CacheValue::Struct(serde_json::to_value(value)?))
    }

    /// Read a structured value back into a concrete type.
    ///
    /// Returns None for raw payloads or when the shape does not match `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Option<T> {
        match self {
            CacheValue::Struct(v) => serde_json::from_value(v).ok(),
            CacheValue::Raw(_) => None,
        }
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(bytes: Vec<u8>) -> Self {
        CacheValue::Raw(bytes)
    }
}

impl From<serde_json::Value> for CacheValue {
    fn from(value: serde_json::Value) -> Self {
        CacheValue::Struct(value)
    }
}

/// Encode a value into its tagged byte form.
pub fn encode(value: &CacheValue) -> Result<Vec<u8>, crate::Error> {
    match value {
        CacheValue::Raw(bytes) => {
            let mut out = Vec::with_capacity(bytes.len() + 1);
            out.push(RAW_TAG);
            out.extend_from_slice(bytes);
            Ok(out)
        }
        CacheValue::Struct(v) => {
            let mut out = vec![STRUCT_TAG];
            serde_json::to_writer(&mut out, v)?;
            Ok(out)
        }
    }
}

/// Decode tagged bytes.
///
/// Empty input, an unknown tag, or a JSON body that fails to parse all
/// decode to None. Corruption reads as a miss.
pub fn decode(bytes: &[u8]) -> Option<CacheValue> {
    let (&tag, body) = bytes.split_first()?;

    match tag {
        RAW_TAG => Some(CacheValue::Raw(body.to_vec())),
        STRUCT_TAG => match serde_json::from_slice(body) {
            Ok(v) => Some(CacheValue::Struct(v)),
            Err(e) => {
                tracing::warn!(error = %e, len = body.len(), "Discarding unparseable cached payload");
                None
            }
        },
        other => {
            tracing::warn!(tag = other, "Discarding cached payload with unknown tag");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_empty_decodes_to_none() {
        assert_eq!(decode(&[]), None);
    }

    #[test]
    fn test_raw_is_stored_verbatim() {
        let encoded = encode(&CacheValue::Raw(vec![0xde, 0xad])).unwrap();
        assert_eq!(encoded, vec![RAW_TAG, 0xde, 0xad]);
    }

    #[test]
    fn test_struct_is_json() {
        let encoded = encode(&CacheValue::Struct(json!({"a": 1}))).unwrap();
        assert_eq!(encoded[0], STRUCT_TAG);
        assert_eq!(&encoded[1..], br#"{"a":1}"#);
    }

    #[test]
    fn test_conversions_pick_the_tag() {
        let raw: CacheValue = vec![1u8, 2].into();
        let structured: CacheValue = json!({"a": 1}).into();
        assert_eq!(encode(&raw).unwrap()[0], RAW_TAG);
        assert_eq!(encode(&structured).unwrap()[0], STRUCT_TAG);
    }

    #[test]
    fn test_empty_raw_round_trips() {
        let encoded = encode(&CacheValue::Raw(Vec::new())).unwrap();
        assert_eq!(decode(&encoded), Some(CacheValue::Raw(Vec::new())));
    }

    #[test]
    fn test_corrupt_struct_decodes_to_none() {
        assert_eq!(decode(&[STRUCT_TAG, b'{', b'x']), None);
        assert_eq!(decode(&[STRUCT_TAG]), None);
    }

    #[test]
    fn test_unknown_tag_decodes_to_none() {
        assert_eq!(decode(&[7, b'1']), None);
    }

    #[test]
    fn test_typed_round_trip() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Row {
            id: i64,
            title: String,
        }

        let rows = vec![Row { id: 1, title: "one".into() }, Row { id: 2, title: "two".into() }];
        let encoded = encode(&CacheValue::json(&rows).unwrap()).unwrap();
        let decoded: Vec<Row> = decode(&encoded).unwrap().into_json().unwrap();
        assert_eq!(decoded, rows);
    }

    #[test]
    fn test_into_json_shape_mismatch_is_none() {
        let value = CacheValue::Struct(json!("not a number"));
        assert_eq!(value.into_json::<i64>(), None);
        assert_eq!(CacheValue::Raw(vec![1]).into_json::<serde_json::Value>(), None);
    }

    fn arb_json() -> impl Strategy<Value = serde_json::Value> {
        let leaf = prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::from),
            any::<i64>().prop_map(serde_json::Value::from),
            ".*".prop_map(serde_json::Value::from),
        ];
        leaf.prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(serde_json::Value::Array),
                prop::collection::btree_map("[a-z]{0,8}", inner, 0..6)
                    .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_raw_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
            let value = CacheValue::Raw(bytes);
            let encoded = encode(&value).unwrap();
            prop_assert_eq!(decode(&encoded), Some(value));
        }

        #[test]
        fn prop_struct_round_trip(v in arb_json()) {
            let value = CacheValue::Struct(v);
            let encoded = encode(&value).unwrap();
            prop_assert_eq!(decode(&encoded), Some(value));
        }
    }
}
