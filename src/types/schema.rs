// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Strict, path-aware decoding of daemon replies.
//!
//! A [`Record`] declares its fields by pulling them out of a [`Fields`] view:
//! `required`, `optional`, `record`, `records` and `embedded`. The first
//! failure aborts construction and is reported as a [`DecodeError`] carrying
//! the root record name and the dotted path of the offending field. Keys the
//! record does not ask for are ignored.

use serde_json::{Map, Value};

use crate::error::DecodeError;

/// A typed view over one JSON object shape.
pub trait Record: Sized {
    /// Name used in decode errors.
    const NAME: &'static str;

    fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError>;
}

/// Validates `value` against `R` and constructs it, or fails naming the
/// first offending field.
pub fn decode<R: Record>(value: &Value) -> Result<R, DecodeError> {
    let fields = Fields::new(R::NAME, String::new(), value)?;
    R::from_fields(&fields)
}

/// Parses `text` as JSON and decodes it as `R`.
pub fn decode_str<R: Record>(text: &str) -> Result<R, DecodeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::new(R::NAME, "", format!("invalid JSON: {}", e)))?;
    decode(&value)
}

/// The fields of one JSON object under decode.
pub struct Fields<'a> {
    root: &'static str,
    path: String,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn new(root: &'static str, path: String, value: &'a Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(map) => Ok(Self { root, path, map }),
            other => Err(DecodeError::new(
                root,
                path,
                format!("expected object, found {}", json_kind(other)),
            )),
        }
    }

    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn missing(&self, key: &str) -> DecodeError {
        DecodeError::new(self.root, self.child_path(key), "missing required field")
    }

    /// A field that must be present, non-null and of type `T`.
    pub fn required<T: FieldValue>(&self, key: &str) -> Result<T, DecodeError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Err(self.missing(key)),
            Some(value) => T::extract(value, self.root, &self.child_path(key)),
        }
    }

    /// A field that may be absent or null, but is of type `T` when present.
    pub fn optional<T: FieldValue>(&self, key: &str) -> Result<Option<T>, DecodeError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::extract(value, self.root, &self.child_path(key)).map(Some),
        }
    }

    /// A required nested record.
    pub fn record<R: Record>(&self, key: &str) -> Result<R, DecodeError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Err(self.missing(key)),
            Some(value) => nested(value, self.root, self.child_path(key)),
        }
    }

    /// A required list of nested records.
    pub fn records<R: Record>(&self, key: &str) -> Result<Vec<R>, DecodeError> {
        let path = self.child_path(key);
        match self.map.get(key) {
            None | Some(Value::Null) => Err(self.missing(key)),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| nested(item, self.root, format!("{}[{}]", path, i)))
                .collect(),
            Some(other) => Err(type_error(self.root, path, "list", other)),
        }
    }

    /// A required record that the daemon may ship as a JSON document embedded
    /// in a string. Strings are decoded in two passes (text, then structure);
    /// objects are decoded directly.
    pub fn embedded<R: Record>(&self, key: &str) -> Result<R, DecodeError> {
        let path = self.child_path(key);
        match self.map.get(key) {
            None | Some(Value::Null) => Err(self.missing(key)),
            Some(Value::String(text)) => {
                let inner: Value = serde_json::from_str(text)
                    .map_err(|e| DecodeError::new(self.root, path.clone(), format!("invalid embedded JSON: {}", e)))?;
                nested(&inner, self.root, path)
            },
            Some(value @ Value::Object(_)) => nested(value, self.root, path),
            Some(other) => Err(type_error(self.root, path, "embedded JSON string or object", other)),
        }
    }
}

fn nested<R: Record>(value: &Value, root: &'static str, path: String) -> Result<R, DecodeError> {
    let fields = Fields::new(root, path, value)?;
    R::from_fields(&fields)
}

/// Scalar and list types a field can be extracted as.
pub trait FieldValue: Sized {
    fn extract(value: &Value, root: &'static str, path: &str) -> Result<Self, DecodeError>;
}

impl FieldValue for bool {
    fn extract(value: &Value, root: &'static str, path: &str) -> Result<Self, DecodeError> {
        value.as_bool().ok_or_else(|| type_error(root, path, "boolean", value))
    }
}

impl FieldValue for i64 {
    fn extract(value: &Value, root: &'static str, path: &str) -> Result<Self, DecodeError> {
        value.as_i64().ok_or_else(|| type_error(root, path, "integer", value))
    }
}

impl FieldValue for u64 {
    fn extract(value: &Value, root: &'static str, path: &str) -> Result<Self, DecodeError> {
        value
            .as_u64()
            .ok_or_else(|| type_error(root, path, "non-negative integer", value))
    }
}

impl FieldValue for u32 {
    fn extract(value: &Value, root: &'static str, path: &str) -> Result<Self, DecodeError> {
        value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| type_error(root, path, "32-bit non-negative integer", value))
    }
}

impl FieldValue for f64 {
    fn extract(value: &Value, root: &'static str, path: &str) -> Result<Self, DecodeError> {
        value.as_f64().ok_or_else(|| type_error(root, path, "number", value))
    }
}

impl FieldValue for String {
    fn extract(value: &Value, root: &'static str, path: &str) -> Result<Self, DecodeError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| type_error(root, path, "string", value))
    }
}

/// Untyped passthrough for fields whose content is opaque to the client.
impl FieldValue for Value {
    fn extract(value: &Value, _root: &'static str, _path: &str) -> Result<Self, DecodeError> {
        Ok(value.clone())
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn extract(value: &Value, root: &'static str, path: &str) -> Result<Self, DecodeError> {
        match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| T::extract(item, root, &format!("{}[{}]", path, i)))
                .collect(),
            other => Err(type_error(root, path, "list", other)),
        }
    }
}

fn type_error(root: &'static str, path: impl Into<String>, expected: &str, found: &Value) -> DecodeError {
    DecodeError::new(
        root,
        path,
        format!("expected {}, found {}", expected, json_kind(found)),
    )
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "floating-point number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Inner {
        n: u64,
    }

    impl Record for Inner {
        const NAME: &'static str = "Inner";

        fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
            Ok(Self { n: fields.required("n")? })
        }
    }

    #[derive(Debug, PartialEq)]
    struct Outer {
        flag: bool,
        label: Option<String>,
        ratio: f64,
        inners: Vec<Inner>,
        embedded: Inner,
    }

    impl Record for Outer {
        const NAME: &'static str = "Outer";

        fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
            Ok(Self {
                flag: fields.required("flag")?,
                label: fields.optional("label")?,
                ratio: fields.required("ratio")?,
                inners: fields.records("inners")?,
                embedded: fields.embedded("embedded")?,
            })
        }
    }

    fn valid() -> Value {
        json!({
            "flag": true,
            "ratio": 1,
            "inners": [{"n": 1}, {"n": 2}],
            "embedded": "{\"n\": 7}",
            "extra": "ignored"
        })
    }

    #[test]
    fn decodes_valid_document() {
        let outer: Outer = decode(&valid()).unwrap();
        assert!(outer.flag);
        assert_eq!(outer.label, None);
        assert_eq!(outer.ratio, 1.0);
        assert_eq!(outer.inners, vec![Inner { n: 1 }, Inner { n: 2 }]);
        assert_eq!(outer.embedded, Inner { n: 7 });
    }

    #[test]
    fn decode_is_deterministic() {
        let doc = valid();
        assert_eq!(decode::<Outer>(&doc).unwrap(), decode::<Outer>(&doc).unwrap());

        let mut broken = valid();
        broken["inners"][1]["n"] = json!(-1);
        assert_eq!(
            decode::<Outer>(&broken).unwrap_err(),
            decode::<Outer>(&broken).unwrap_err()
        );
    }

    #[test]
    fn missing_required_field_is_named() {
        let mut doc = valid();
        doc.as_object_mut().unwrap().remove("flag");
        let err = decode::<Outer>(&doc).unwrap_err();
        assert_eq!(err.record, "Outer");
        assert_eq!(err.path, "flag");
    }

    #[test]
    fn null_required_field_counts_as_missing() {
        let mut doc = valid();
        doc["flag"] = Value::Null;
        assert_eq!(decode::<Outer>(&doc).unwrap_err().path, "flag");
    }

    #[test]
    fn nested_failures_carry_full_path() {
        let mut doc = valid();
        doc["inners"][1]["n"] = json!("two");
        let err = decode::<Outer>(&doc).unwrap_err();
        assert_eq!(err.path, "inners[1].n");
        assert!(err.reason.contains("found string"));
    }

    #[test]
    fn optional_field_with_wrong_type_fails() {
        let mut doc = valid();
        doc["label"] = json!(5);
        assert_eq!(decode::<Outer>(&doc).unwrap_err().path, "label");
    }

    #[test]
    fn embedded_accepts_object_and_rejects_bad_text() {
        let mut doc = valid();
        doc["embedded"] = json!({"n": 3});
        assert_eq!(decode::<Outer>(&doc).unwrap().embedded, Inner { n: 3 });

        doc["embedded"] = json!("{not json");
        let err = decode::<Outer>(&doc).unwrap_err();
        assert_eq!(err.path, "embedded");
        assert!(err.reason.contains("invalid embedded JSON"));

        doc["embedded"] = json!("[1, 2]");
        assert_eq!(decode::<Outer>(&doc).unwrap_err().path, "embedded");
    }

    #[test]
    fn root_must_be_an_object() {
        let err = decode::<Outer>(&json!([1, 2])).unwrap_err();
        assert_eq!(err.path, "");
        assert!(err.reason.contains("expected object"));
        assert!(decode_str::<Outer>("not json").is_err());
    }
}
