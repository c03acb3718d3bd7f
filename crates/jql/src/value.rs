//! Cell values and the JSON boundary
//!
//! Decoded JSON is converted once into [`Value`]; everything past this module
//! matches on the closed enum and never sees `serde_json` types.

use std::fmt;

use indexmap::IndexMap;

use crate::schema::SchemaError;

/// One row: column name -> value, in the key order of the source object.
pub type Row = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Convert a decoded JSON value.
    ///
    /// Fails with [`SchemaError::UnknownValueKind`] for numbers that have no
    /// finite `f64` representation. This is a guard only: serde_json without
    /// `arbitrary_precision` rejects such literals while decoding, so values
    /// that reach this point always convert.
    pub fn from_json(json: serde_json::Value) -> Result<Self, SchemaError> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) if f.is_finite() => Value::Number(f),
                _ => return Err(SchemaError::UnknownValueKind(n.to_string())),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::from_json)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(map) => Value::Object(object_from_json(map)?),
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// Integral numbers go back out as JSON integers so `[1,2]` stays `[1,2]`.
fn number_to_json(n: f64) -> serde_json::Value {
    const I64_RANGE: std::ops::Range<f64> = -9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0;

    if n.fract() == 0.0 && I64_RANGE.contains(&n) {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

fn object_from_json(map: serde_json::Map<String, serde_json::Value>) -> Result<Row, SchemaError> {
    map.into_iter()
        .map(|(k, v)| Ok((k, Value::from_json(v)?)))
        .collect()
}

/// Display string used for projected cells.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(_) | Value::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Convert a decoded JSON document into rows.
///
/// The document must be an array of objects.
pub fn rows_from_json(document: serde_json::Value) -> Result<Vec<Row>, SchemaError> {
    let serde_json::Value::Array(items) = document else {
        return Err(SchemaError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            serde_json::Value::Object(map) => object_from_json(map),
            _ => Err(SchemaError::RowNotAnObject { index }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_strings() {
        assert_eq!(Value::from(1i64).to_string(), "1");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(-0.25).to_string(), "-0.25");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("plain text").to_string(), "plain text");
    }

    #[test]
    fn nested_values_display_as_compact_json() {
        let value = Value::from_json(json!({"b": [1, 2.5, null], "a": {"x": "y"}})).unwrap();
        assert_eq!(value.to_string(), r#"{"b":[1,2.5,null],"a":{"x":"y"}}"#);
    }

    #[test]
    fn from_json_keeps_key_order() {
        let value = Value::from_json(json!({"z": 1, "a": 2, "m": 3})).unwrap();
        let Value::Object(map) = value else {
            panic!("expected object");
        };
        assert_eq!(map.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
    }

    #[test]
    fn rows_require_array_of_objects() {
        assert_eq!(rows_from_json(json!({"a": 1})), Err(SchemaError::NotAnArray));
        assert_eq!(
            rows_from_json(json!([{"a": 1}, 2])),
            Err(SchemaError::RowNotAnObject { index: 1 })
        );

        let rows = rows_from_json(json!([{"a": 1}, {"b": "x"}])).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["a"], Value::Number(1.0));
        assert_eq!(rows[1]["b"], Value::from("x"));
    }

    #[test]
    fn out_of_range_numbers_fail_while_decoding() {
        assert!(serde_json::from_str::<serde_json::Value>(r#"[{"a": 1e400}]"#).is_err());
        let big = serde_json::from_str(r#"[{"a": 1e300}]"#).unwrap();
        assert_eq!(rows_from_json(big).unwrap()[0]["a"], Value::Number(1e300));
    }

    #[test]
    fn empty_array_is_zero_rows() {
        assert_eq!(rows_from_json(json!([])).unwrap(), Vec::<Row>::new());
    }
}
