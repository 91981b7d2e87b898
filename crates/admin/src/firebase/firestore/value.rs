//! Firestore REST value encoding.
//!
//! Values travel as single-key objects (`{"stringValue": "..."}`);
//! 64-bit integers are sent as strings. Server timestamps are not values
//! on the wire but field transforms applied alongside the update.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};

use super::types::{FieldValue, Fields};

/// Encode fields for an `update` write.
///
/// Returns the encoded `fields` object and the field paths that must be
/// set to the request time by a transform.
pub(crate) fn encode_fields(fields: &Fields) -> (Map<String, Value>, Vec<String>) {
    let mut encoded = Map::new();
    let mut server_timestamps = Vec::new();

    for (name, value) in fields {
        match encode_value(value) {
            Some(v) => {
                encoded.insert(name.clone(), v);
            }
            None => server_timestamps.push(field_path(name)),
        }
    }

    (encoded, server_timestamps)
}

/// Encode a single value; `None` for [`FieldValue::ServerTimestamp`].
pub(crate) fn encode_value(value: &FieldValue) -> Option<Value> {
    Some(match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Boolean(b) => json!({ "booleanValue": b }),
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Timestamp(t) => {
            json!({ "timestampValue": t.to_rfc3339_opts(SecondsFormat::Micros, true) })
        }
        FieldValue::ServerTimestamp => return None,
        FieldValue::Raw(raw) => raw.clone(),
    })
}

/// Decode a document's `fields` object.
pub(crate) fn decode_fields(fields: &Map<String, Value>) -> Fields {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), decode_value(value)))
        .collect()
}

/// Decode a single value. Unknown or malformed kinds are kept as
/// [`FieldValue::Raw`].
pub(crate) fn decode_value(value: &Value) -> FieldValue {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return FieldValue::Raw(value.clone());
    };

    let decoded = match kind.as_str() {
        "nullValue" => Some(FieldValue::Null),
        "booleanValue" => inner.as_bool().map(FieldValue::Boolean),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse().ok())
            .or_else(|| inner.as_i64())
            .map(FieldValue::Integer),
        "doubleValue" => inner.as_f64().map(FieldValue::Double),
        "stringValue" => inner.as_str().map(|s| FieldValue::String(s.to_owned())),
        "timestampValue" => inner
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc))),
        _ => None,
    };

    decoded.unwrap_or_else(|| FieldValue::Raw(value.clone()))
}

/// Quote a field name with backticks unless it is a simple identifier.
fn field_path(name: &str) -> String {
    let mut chars = name.chars();
    let simple = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if simple {
        name.to_owned()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_server_timestamp_becomes_transform() {
        let mut fields = Fields::new();
        fields.insert("name".into(), "Mario".into());
        fields.insert("createdAt".into(), FieldValue::ServerTimestamp);

        let (encoded, transforms) = encode_fields(&fields);
        assert_eq!(encoded.get("name"), Some(&json!({"stringValue": "Mario"})));
        assert!(!encoded.contains_key("createdAt"));
        assert_eq!(transforms, vec!["createdAt".to_string()]);
    }

    #[test]
    fn test_integer_is_sent_as_string() {
        assert_eq!(
            encode_value(&FieldValue::Integer(42)),
            Some(json!({"integerValue": "42"}))
        );
    }

    #[test]
    fn test_decode_known_kinds() {
        assert_eq!(decode_value(&json!({"nullValue": null})), FieldValue::Null);
        assert_eq!(
            decode_value(&json!({"integerValue": "7"})),
            FieldValue::Integer(7)
        );
        assert_eq!(
            decode_value(&json!({"timestampValue": "2024-05-01T10:00:00.123456Z"})),
            FieldValue::Timestamp(
                Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
                    + chrono::Duration::microseconds(123_456)
            )
        );
    }

    #[test]
    fn test_decode_unknown_kind_kept_raw() {
        let map = json!({"mapValue": {"fields": {}}});
        assert_eq!(decode_value(&map), FieldValue::Raw(map.clone()));
    }

    #[test]
    fn test_field_path_quoting() {
        assert_eq!(field_path("createdAt"), "createdAt");
        assert_eq!(field_path("created-at"), "`created-at`");
    }
}
