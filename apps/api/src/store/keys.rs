//! Identifier normalization.
//!
//! Records may carry a native ObjectId, an opaque client string under `id`,
//! or both. A client id of exactly 24 hex characters is tried as an ObjectId
//! first and as an opaque string second; anything else is opaque only.

use bson::{doc, oid::ObjectId, Document};

use crate::store::{NATIVE_ID_FIELD, OPAQUE_ID_FIELD};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordKey {
    Native { oid: ObjectId, raw: String },
    Opaque(String),
}

impl RecordKey {
    pub fn parse(raw: &str) -> Self {
        if is_native_shape(raw) {
            if let Ok(oid) = ObjectId::parse_str(raw) {
                return RecordKey::Native {
                    oid,
                    raw: raw.to_string(),
                };
            }
        }
        RecordKey::Opaque(raw.to_string())
    }

    /// Ordered lookup filters. Callers stop at the first match.
    pub fn filters(&self) -> Vec<Document> {
        match self {
            RecordKey::Native { oid, raw } => vec![
                doc! { NATIVE_ID_FIELD: *oid },
                doc! { OPAQUE_ID_FIELD: raw.as_str() },
            ],
            RecordKey::Opaque(raw) => vec![doc! { OPAQUE_ID_FIELD: raw.as_str() }],
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            RecordKey::Native { raw, .. } => raw,
            RecordKey::Opaque(raw) => raw,
        }
    }
}

fn is_native_shape(raw: &str) -> bool {
    raw.len() == 24 && raw.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_24_hex_chars_parse_as_native() {
        let key = RecordKey::parse("507f1f77bcf86cd799439011");
        assert!(matches!(key, RecordKey::Native { .. }));
    }

    #[test]
    fn test_uppercase_hex_is_native() {
        let key = RecordKey::parse("507F1F77BCF86CD799439011");
        assert!(matches!(key, RecordKey::Native { .. }));
    }

    #[test]
    fn test_short_id_is_opaque() {
        assert_eq!(RecordKey::parse("r1"), RecordKey::Opaque("r1".to_string()));
    }

    #[test]
    fn test_24_chars_with_non_hex_is_opaque() {
        let key = RecordKey::parse("507f1f77bcf86cd79943901z");
        assert!(matches!(key, RecordKey::Opaque(_)));
    }

    #[test]
    fn test_25_hex_chars_is_opaque() {
        let key = RecordKey::parse("507f1f77bcf86cd7994390111");
        assert!(matches!(key, RecordKey::Opaque(_)));
    }

    #[test]
    fn test_native_filters_try_object_id_then_opaque_string() {
        let raw = "507f1f77bcf86cd799439011";
        let filters = RecordKey::parse(raw).filters();
        assert_eq!(filters.len(), 2);
        assert!(filters[0].get_object_id("_id").is_ok());
        assert_eq!(filters[1].get_str("id").unwrap(), raw);
    }

    #[test]
    fn test_opaque_filters_use_id_field_only() {
        let filters = RecordKey::parse("legacy-42").filters();
        assert_eq!(filters, vec![doc! { "id": "legacy-42" }]);
    }

    #[test]
    fn test_raw_preserves_client_input() {
        assert_eq!(RecordKey::parse("abc").raw(), "abc");
        let hex = "507f1f77bcf86cd799439011";
        assert_eq!(RecordKey::parse(hex).raw(), hex);
    }
}
