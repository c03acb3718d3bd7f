//! In-memory tables
//!
//! A table is a set of rows plus the schema inferred from all of them. The
//! schema is computed once at construction and never changes.

use serde::Serialize;
use thiserror::Error;

use crate::schema::{self, Schema, SchemaError};
use crate::value::Row;

/// Column name that expands to every schema column.
pub const WILDCARD: &str = "*";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("table has no rows")]
    EmptyArray,

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Clone)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

/// Result of a select: headers plus one display string per cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Result<Self, TableError> {
        if rows.is_empty() {
            return Err(TableError::EmptyArray);
        }
        let schema = schema::infer(&rows)?;
        Ok(Self { schema, rows })
    }

    pub fn columns(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false, a table holds at least one row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Project the named columns out of every row.
    ///
    /// `*` expands in place to all columns in schema order. Duplicates are
    /// kept. Cells missing from a row render as the empty string.
    pub fn project<S: AsRef<str>>(&self, columns: &[S]) -> Result<Projection, TableError> {
        let mut headers = Vec::new();
        for column in columns {
            let column = column.as_ref();
            if column == WILDCARD {
                headers.extend(self.schema.names().map(str::to_string));
            } else if self.schema.contains(column) {
                headers.push(column.to_string());
            } else {
                return Err(TableError::UnknownColumn(column.to_string()));
            }
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|h| row.get(h).map(ToString::to_string).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Projection { headers, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;
    use crate::value::rows_from_json;
    use serde_json::json;

    fn people() -> Table {
        Table::new(
            rows_from_json(json!([
                {"name": "ada", "age": 36},
                {"name": "alan", "age": 41.5, "city": "london"},
            ]))
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn empty_rows_rejected() {
        assert_eq!(Table::new(vec![]).unwrap_err(), TableError::EmptyArray);
    }

    #[test]
    fn schema_is_union_of_rows() {
        let table = people();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.columns().iter().collect::<Vec<_>>(),
            [
                ("name", ColumnType::String),
                ("age", ColumnType::Number),
                ("city", ColumnType::String),
            ]
        );
    }

    #[test]
    fn project_named_columns() {
        let projection = people().project(&["age", "name"]).unwrap();
        assert_eq!(projection.headers, ["age", "name"]);
        assert_eq!(projection.rows, [["36", "ada"], ["41.5", "alan"]]);
    }

    #[test]
    fn missing_cells_are_empty() {
        let projection = people().project(&["city"]).unwrap();
        assert_eq!(projection.rows, [[""], ["london"]]);
    }

    #[test]
    fn wildcard_expands_in_place() {
        let projection = people().project(&["city", "*", "name"]).unwrap();
        assert_eq!(projection.headers, ["city", "name", "age", "city", "name"]);
        assert_eq!(projection.rows[1], ["london", "alan", "41.5", "london", "alan"]);
    }

    #[test]
    fn unknown_column() {
        assert_eq!(
            people().project(&["name", "salary"]).unwrap_err(),
            TableError::UnknownColumn("salary".into())
        );
    }

    #[test]
    fn nested_and_null_cells() {
        let table = Table::new(
            rows_from_json(json!([{"tags": ["a", "b"], "meta": {"k": 1}, "gone": null}])).unwrap(),
        )
        .unwrap();
        let projection = table.project(&["*"]).unwrap();
        assert_eq!(projection.rows, [[r#"["a","b"]"#, r#"{"k":1}"#, "null"]]);
    }
}
