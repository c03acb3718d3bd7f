//! Column type inference
//!
//! Every value seen under a key contributes its type to that key's type set.
//! Null is absorbed by any other type, and two or more distinct non-null
//! types widen the column to `String`.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use thiserror::Error;

use crate::value::{Row, Value};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("no rows to infer a schema from")]
    EmptyInput,

    #[error("unsupported value: {0}")]
    UnknownValueKind(String),

    #[error("expected a JSON array of objects")]
    NotAnArray,

    #[error("row {index} is not a JSON object")]
    RowNotAnObject { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ColumnType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ColumnType::Null,
            Value::Boolean(_) => ColumnType::Boolean,
            Value::Number(_) => ColumnType::Number,
            Value::String(_) => ColumnType::String,
            Value::Array(_) => ColumnType::Array,
            Value::Object(_) => ColumnType::Object,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Null => "null",
            ColumnType::Boolean => "boolean",
            ColumnType::Number => "number",
            ColumnType::String => "string",
            ColumnType::Array => "array",
            ColumnType::Object => "object",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Column name -> type, in order of first appearance across rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema(IndexMap<String, ColumnType>);

impl Schema {
    pub fn get(&self, column: &str) -> Option<ColumnType> {
        self.0.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.0.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ColumnType)> for Schema {
    fn from_iter<I: IntoIterator<Item = (String, ColumnType)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Infer one type per column over all rows.
pub fn infer(rows: &[Row]) -> Result<Schema, SchemaError> {
    if rows.is_empty() {
        return Err(SchemaError::EmptyInput);
    }

    let mut observed: IndexMap<&str, IndexSet<ColumnType>> = IndexMap::new();
    for row in rows {
        for (key, value) in row {
            observed
                .entry(key.as_str())
                .or_default()
                .insert(ColumnType::of(value));
        }
    }

    Ok(observed
        .into_iter()
        .map(|(key, types)| (key.to_string(), resolve(&types)))
        .collect())
}

fn resolve(types: &IndexSet<ColumnType>) -> ColumnType {
    let mut non_null = types.iter().filter(|ty| **ty != ColumnType::Null);
    match (non_null.next(), non_null.next()) {
        (None, _) => ColumnType::Null,
        (Some(ty), None) => *ty,
        (Some(_), Some(_)) => ColumnType::String,
    }
}
