//! Statement execution against a registry of named tables
//!
//! The [`Executor`] interprets one parsed statement at a time. It owns the
//! [`RowSource`] used by `load` and is handed the [`Registry`] explicitly.
//! [`QueryEngine`] bundles both for callers that just want to run text.

use std::io;
use std::path::Path;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;
use thiserror::Error;

use crate::ast::{AstNode, Keyword, Literal};
use crate::lexer::Lexer;
use crate::parse::Parser;
use crate::schema::SchemaError;
use crate::table::{Projection, Table, TableError};
use crate::value::Row;
use crate::JqlError;

// ============ Row sources ============

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Where `load` gets its rows from.
pub trait RowSource {
    fn load(&self, path: &str) -> Result<Vec<Row>, LoadError>;
}

impl<F> RowSource for F
where
    F: Fn(&str) -> Result<Vec<Row>, LoadError>,
{
    fn load(&self, path: &str) -> Result<Vec<Row>, LoadError> {
        self(path)
    }
}

/// Rows registered up front under a path, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: IndexMap<String, Vec<Row>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, path: impl Into<String>, rows: Vec<Row>) -> Self {
        self.insert(path, rows);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, rows: Vec<Row>) {
        self.files.insert(path.into(), rows);
    }
}

impl RowSource for MemorySource {
    fn load(&self, path: &str) -> Result<Vec<Row>, LoadError> {
        self.files.get(path).cloned().ok_or_else(|| {
            LoadError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {path}"),
            ))
        })
    }
}

// ============ Registry ============

/// Loaded tables by name, in load order.
#[derive(Debug, Default)]
pub struct Registry {
    tables: IndexMap<String, Table>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Insert `table` unless `name` is taken. An existing table is never
    /// replaced.
    pub fn insert_new(&mut self, name: String, table: Table) -> Result<&Table, ExecError> {
        match self.tables.entry(name) {
            Entry::Occupied(entry) => Err(ExecError::TableAlreadyLoaded(entry.key().clone())),
            Entry::Vacant(entry) => Ok(entry.insert(table)),
        }
    }
}

// ============ Executor ============

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("table '{0}' is already loaded")]
    TableAlreadyLoaded(String),

    #[error("table '{0}' not found")]
    TableNotFound(String),

    #[error("unknown column '{column}' in table '{table}'")]
    UnknownColumn { column: String, table: String },

    #[error("unknown command")]
    UnknownCommand,

    #[error("'load' command: filename must be a quoted string, got {0}")]
    FilenameNotQuoted(String),

    #[error("cannot derive a table name from '{0}'")]
    UnnamedTable(String),

    #[error("malformed '{0}' statement")]
    MalformedStatement(Keyword),

    #[error("failed to load '{path}': {source}")]
    Load {
        path: String,
        #[source]
        source: LoadError,
    },

    #[error(transparent)]
    Table(#[from] TableError),
}

/// What a successful statement produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Loaded { table: String, rows: usize },
    Tables(Vec<String>),
    Rows(Projection),
}

pub struct Executor<S> {
    source: S,
}

impl<S: RowSource> Executor<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn execute(&self, ast: &AstNode, registry: &mut Registry) -> Result<Outcome, ExecError> {
        match ast.as_keyword() {
            Some(Keyword::Load) => self.load(ast, registry),
            Some(Keyword::Tables) => Ok(Outcome::Tables(registry.names().map(str::to_string).collect())),
            Some(Keyword::Select) => select(ast, registry),
            _ => Err(ExecError::UnknownCommand),
        }
    }

    fn load(&self, ast: &AstNode, registry: &mut Registry) -> Result<Outcome, ExecError> {
        let filename = ast
            .child(0)
            .and_then(AstNode::as_literal)
            .ok_or(ExecError::MalformedStatement(Keyword::Load))?;
        if !filename.quoted {
            return Err(ExecError::FilenameNotQuoted(filename.text.clone()));
        }
        let path = filename.as_str();

        let name = match ast.alias() {
            Some(alias) => alias.text.clone(),
            None => default_table_name(path).ok_or_else(|| ExecError::UnnamedTable(path.to_string()))?,
        };

        if registry.contains(&name) {
            return Err(ExecError::TableAlreadyLoaded(name));
        }

        let rows = self.source.load(path).map_err(|source| ExecError::Load {
            path: path.to_string(),
            source,
        })?;
        let table = Table::new(rows)?;
        let rows = table.len();
        registry.insert_new(name.clone(), table)?;

        log::info!("loaded table '{}' from {} ({} rows)", name, path, rows);
        Ok(Outcome::Loaded { table: name, rows })
    }
}

fn select(ast: &AstNode, registry: &Registry) -> Result<Outcome, ExecError> {
    let malformed = || ExecError::MalformedStatement(Keyword::Select);

    let (from, columns) = ast.children().split_last().ok_or_else(malformed)?;
    if !from.is_keyword(Keyword::From) || columns.is_empty() {
        return Err(malformed());
    }
    let table_name = from
        .child(0)
        .and_then(AstNode::as_literal)
        .map(Literal::as_str)
        .ok_or_else(malformed)?;
    let columns = columns
        .iter()
        .map(|c| c.as_literal().map(Literal::as_str))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(malformed)?;

    let table = registry
        .get(table_name)
        .ok_or_else(|| ExecError::TableNotFound(table_name.to_string()))?;

    let projection = table.project(&columns).map_err(|e| match e {
        TableError::UnknownColumn(column) => ExecError::UnknownColumn {
            column,
            table: table_name.to_string(),
        },
        other => ExecError::Table(other),
    })?;
    Ok(Outcome::Rows(projection))
}

/// Table name for `load` without `as`.
///
/// Everything from the first `.json` on is dropped and the basename of what
/// is left is used. Without `.json` the file stem is used instead.
pub fn default_table_name(filename: &str) -> Option<String> {
    let name = match filename.find(".json") {
        Some(idx) => Path::new(&filename[..idx]).file_name(),
        None => Path::new(filename).file_stem(),
    };
    name.and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

// ============ QueryEngine ============

/// Executor plus the registry it runs against.
///
/// # Example
///
/// ```
/// use jql::{MemorySource, Outcome, QueryEngine, rows_from_json};
///
/// let rows = rows_from_json(serde_json::json!([{"name": "ada", "age": 36}])).unwrap();
/// let mut engine = QueryEngine::new(MemorySource::new().with_rows("people.json", rows));
///
/// let results = engine.run(r#"load "people.json" as p; select name from p;"#);
/// assert!(matches!(&results[1], Ok(Outcome::Rows(p)) if p.rows == [["ada"]]));
/// ```
pub struct QueryEngine<S> {
    executor: Executor<S>,
    registry: Registry,
}

impl<S: RowSource> QueryEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            executor: Executor::new(source),
            registry: Registry::new(),
        }
    }

    /// Run every statement in `text`, one result per statement.
    ///
    /// A failing statement does not stop the ones after it, except for a
    /// lexing error which ends the command.
    pub fn run(&mut self, text: &str) -> Vec<Result<Outcome, JqlError>> {
        Parser::new(Lexer::new(text))
            .map(|parsed| -> Result<Outcome, JqlError> {
                let ast = parsed?;
                Ok(self.execute(&ast)?)
            })
            .collect()
    }

    pub fn execute(&mut self, ast: &AstNode) -> Result<Outcome, ExecError> {
        self.executor.execute(ast, &mut self.registry)
    }

    /// Load a file as if by `load "<path>" [as <name>];`.
    pub fn load_table(&mut self, path: &str, name: Option<&str>) -> Result<Outcome, ExecError> {
        let mut ast = AstNode::keyword(Keyword::Load).with_child(AstNode::literal(Literal::quoted(path)));
        if let Some(name) = name {
            ast.push(AstNode::keyword(Keyword::As).with_child(AstNode::literal(Literal::quoted(name))));
        }
        self.execute(&ast)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.registry.get(name)
    }

    pub fn table_names(&self) -> Vec<String> {
        self.registry.names().map(str::to_string).collect()
    }
}
