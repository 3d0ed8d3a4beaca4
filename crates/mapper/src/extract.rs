//! Typed field extraction from untyped native records.
//!
//! The native Brightcove record arrives as an arbitrary JSON object. This
//! module pulls the fixed field set out of it with explicit type checks, so
//! an unexpected shape yields a [`MapError`] instead of a crash. Unknown
//! fields are ignored.

use crate::errors::MapError;
use serde_json::{Map, Value};

/// The fixed field set read from a native Brightcove video record.
///
/// `uuid`, `id`, and `updated_at` are required; `name` is optional and
/// degrades media-type resolution when absent. Validation runs in field
/// order and stops at the first failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeVideo {
    /// Asset uuid
    pub uuid: String,
    /// Brightcove-native id
    pub id: String,
    /// Publication timestamp (the "updated_at" key)
    pub updated_at: String,
    /// File name of the asset, if present and non-empty
    pub name: Option<String>,
}

impl NativeVideo {
    /// Extract the fixed field set from a raw record.
    ///
    /// Fails fast with a field-naming error on the first required field that
    /// is absent, null, empty, or not a string. No partial result is ever
    /// returned.
    pub fn from_value(record: &Value) -> Result<Self, MapError> {
        let fields = record
            .as_object()
            .ok_or_else(|| MapError::InvalidJson("expected a JSON object".to_string()))?;

        let uuid = required_string(fields, "uuid")?;
        let id = required_string(fields, "id")?;
        let updated_at = required_string(fields, "updated_at")?;
        let name = optional_string(fields, "name");

        Ok(Self {
            uuid,
            id,
            updated_at,
            name,
        })
    }
}

/// Extract a required string field, rejecting absent, null, empty, or
/// non-string values.
fn required_string(fields: &Map<String, Value>, field: &str) -> Result<String, MapError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(MapError::missing_field(field)),
        Some(Value::String(s)) if s.is_empty() => Err(MapError::missing_field(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(MapError::invalid_field(field)),
    }
}

/// Extract an optional string field; anything but a non-empty string is None.
fn optional_string(fields: &Map<String, Value>, field: &str) -> Option<String> {
    match fields.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_full_record() {
        let record = json!({
            "uuid": "abc-1",
            "id": "999",
            "updated_at": "2020-01-01T00:00:00Z",
            "name": "clip.mp4",
            "account_id": "ignored"
        });

        let video = NativeVideo::from_value(&record).unwrap();
        assert_eq!(video.uuid, "abc-1");
        assert_eq!(video.id, "999");
        assert_eq!(video.updated_at, "2020-01-01T00:00:00Z");
        assert_eq!(video.name.as_deref(), Some("clip.mp4"));
    }

    #[test]
    fn test_missing_uuid_rejected() {
        let record = json!({"id": "999", "updated_at": "2020-01-01T00:00:00Z"});
        let err = NativeVideo::from_value(&record).unwrap_err();
        assert_eq!(err, MapError::missing_field("uuid"));
    }

    #[test]
    fn test_empty_uuid_rejected() {
        let record = json!({"uuid": "", "id": "999", "updated_at": "2020-01-01T00:00:00Z"});
        let err = NativeVideo::from_value(&record).unwrap_err();
        assert_eq!(err, MapError::missing_field("uuid"));
    }

    #[test]
    fn test_null_uuid_rejected() {
        let record = json!({"uuid": null, "id": "999", "updated_at": "2020-01-01T00:00:00Z"});
        let err = NativeVideo::from_value(&record).unwrap_err();
        assert_eq!(err, MapError::missing_field("uuid"));
    }

    #[test]
    fn test_non_string_uuid_rejected_without_panic() {
        let record = json!({"uuid": 42, "id": "999", "updated_at": "2020-01-01T00:00:00Z"});
        let err = NativeVideo::from_value(&record).unwrap_err();
        assert_eq!(err, MapError::invalid_field("uuid"));
    }

    #[test]
    fn test_first_failure_wins() {
        // Both uuid and id are bad; the diagnostic names uuid.
        let record = json!({"uuid": "", "id": "", "updated_at": ""});
        let err = NativeVideo::from_value(&record).unwrap_err();
        assert_eq!(err, MapError::missing_field("uuid"));
    }

    #[test]
    fn test_missing_id_rejected() {
        let record = json!({"uuid": "abc-1", "updated_at": "2020-01-01T00:00:00Z"});
        let err = NativeVideo::from_value(&record).unwrap_err();
        assert_eq!(err, MapError::missing_field("id"));
    }

    #[test]
    fn test_missing_updated_at_rejected() {
        let record = json!({"uuid": "abc-1", "id": "999"});
        let err = NativeVideo::from_value(&record).unwrap_err();
        assert_eq!(err, MapError::missing_field("updated_at"));
    }

    #[test]
    fn test_absent_name_is_tolerated() {
        let record = json!({"uuid": "abc-1", "id": "999", "updated_at": "2020-01-01T00:00:00Z"});
        let video = NativeVideo::from_value(&record).unwrap();
        assert_eq!(video.name, None);
    }

    #[test]
    fn test_empty_name_is_tolerated_as_absent() {
        let record = json!({
            "uuid": "abc-1",
            "id": "999",
            "updated_at": "2020-01-01T00:00:00Z",
            "name": ""
        });
        let video = NativeVideo::from_value(&record).unwrap();
        assert_eq!(video.name, None);
    }

    #[test]
    fn test_non_object_record_rejected() {
        let err = NativeVideo::from_value(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, MapError::InvalidJson(_)));
    }
}
