// ABOUTME: Conversion between plain JSON and Firestore REST typed values
// ABOUTME: Encodes field maps for writes and decodes document resources from reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Firestore's REST API wraps every value in a single-key object naming its
//! type (`{"stringValue": "egg"}`, `{"integerValue": "4"}`). The rest of the
//! crate works with plain `serde_json` values, so these helpers translate at
//! the wire boundary.

use serde_json::{json, Map, Number, Value};

use crate::backend::{Document, Fields};
use crate::errors::{AppError, AppResult};

/// Wrap a plain JSON value in Firestore's typed representation
#[must_use]
pub fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => json!({ "integerValue": i.to_string() }),
            (None, Some(u)) => json!({ "integerValue": u.to_string() }),
            (None, None) => json!({ "doubleValue": n }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(to_firestore_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encode a field map as a Firestore `fields` object
#[must_use]
pub fn encode_fields(fields: &Fields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(name, value)| (name.clone(), to_firestore_value(value)))
            .collect(),
    )
}

/// Unwrap a Firestore typed value into plain JSON
///
/// Timestamps, references, and bytes come back as strings; geo points as
/// `{latitude, longitude}` objects.
///
/// # Errors
///
/// Returns a serialization error for unknown or malformed value types.
pub fn from_firestore_value(value: &Value) -> AppResult<Value> {
    let Some((kind, inner)) = value.as_object().and_then(|map| map.iter().next()) else {
        return Err(malformed(value));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "geoPointValue" => Ok(inner.clone()),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => {
            inner.as_str().map(|s| Value::String(s.to_owned())).ok_or_else(|| malformed(value))
        }
        "integerValue" => parse_integer(inner).ok_or_else(|| malformed(value)),
        "doubleValue" => match inner {
            Value::Number(_) => Ok(inner.clone()),
            // NaN and infinities arrive as strings and have no JSON form
            _ => Ok(Value::Null),
        },
        "arrayValue" => inner
            .get("values")
            .and_then(Value::as_array)
            .map_or(Ok(Vec::new()), |items| {
                items.iter().map(from_firestore_value).collect()
            })
            .map(Value::Array),
        "mapValue" => decode_fields(inner.get("fields")).map(Value::Object),
        _ => Err(malformed(value)),
    }
}

/// Decode a Firestore `fields` object, absent meaning empty
///
/// # Errors
///
/// Returns a serialization error if any field value is malformed.
pub fn decode_fields(fields: Option<&Value>) -> AppResult<Fields> {
    let Some(fields) = fields else {
        return Ok(Map::new());
    };
    let fields = fields.as_object().ok_or_else(|| malformed(fields))?;
    fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), from_firestore_value(value)?)))
        .collect()
}

/// Decode a Firestore document resource (`{name, fields, createTime, ...}`)
///
/// # Errors
///
/// Returns a serialization error if the resource has no name or bad fields.
pub fn decode_document(resource: &Value) -> AppResult<Document> {
    let name = resource
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::serialization("Firestore document without a name"))?;
    let id = name.rsplit('/').next().unwrap_or(name).to_owned();
    Ok(Document::new(id, decode_fields(resource.get("fields"))?))
}

fn parse_integer(inner: &Value) -> Option<Value> {
    match inner {
        Value::String(s) => s
            .parse::<i64>()
            .ok()
            .map(|i| Value::Number(Number::from(i))),
        Value::Number(_) => Some(inner.clone()),
        _ => None,
    }
}

fn malformed(value: &Value) -> AppError {
    AppError::serialization(format!("Unrecognized Firestore value: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_recipe_fields() {
        let fields = json!({
            "name": "Menemen",
            "cookTime": 20,
            "calories": 310.5,
            "ingredients": ["egg", "tomato"],
            "steps": []
        });
        let encoded = encode_fields(fields.as_object().unwrap());
        assert_eq!(encoded["name"], json!({"stringValue": "Menemen"}));
        assert_eq!(encoded["cookTime"], json!({"integerValue": "20"}));
        assert_eq!(encoded["calories"], json!({"doubleValue": 310.5}));
        assert_eq!(
            encoded["ingredients"],
            json!({"arrayValue": {"values": [{"stringValue": "egg"}, {"stringValue": "tomato"}]}})
        );
        assert_eq!(encoded["steps"], json!({"arrayValue": {"values": []}}));
    }

    #[test]
    fn test_decode_document_resource() {
        let resource = json!({
            "name": "projects/p/databases/(default)/documents/users/u1",
            "fields": {
                "height": {"integerValue": "180"},
                "bmi": {"doubleValue": 22.9},
                "savedRecipes": {"arrayValue": {}},
                "meta": {"mapValue": {"fields": {"active": {"booleanValue": true}}}},
                "updated": {"timestampValue": "2024-05-01T10:00:00Z"},
                "nickname": {"nullValue": null}
            }
        });
        let doc = decode_document(&resource).unwrap();
        assert_eq!(doc.id, "u1");
        assert_eq!(doc.fields["height"], json!(180));
        assert_eq!(doc.fields["bmi"], json!(22.9));
        assert_eq!(doc.fields["savedRecipes"], json!([]));
        assert_eq!(doc.fields["meta"], json!({"active": true}));
        assert_eq!(doc.fields["updated"], json!("2024-05-01T10:00:00Z"));
        assert_eq!(doc.fields["nickname"], Value::Null);
    }

    #[test]
    fn test_nested_values_survive_a_write_and_read() {
        let original = json!({"recipe": {"id": "r1", "ingredients": ["egg"], "ratings": [{"rating": 5}]}});
        let encoded = to_firestore_value(&original);
        assert_eq!(from_firestore_value(&encoded).unwrap(), original);
    }

    #[test]
    fn test_rejects_unknown_types() {
        assert!(from_firestore_value(&json!({"mysteryValue": 1})).is_err());
        assert!(from_firestore_value(&json!("bare")).is_err());
        assert!(decode_document(&json!({"fields": {}})).is_err());
    }
}
