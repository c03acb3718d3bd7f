//! JQL - a tiny query language over JSON tables
//!
//! Commands are `;`-terminated statements. Each is tokenized, parsed into an
//! AST and executed against a registry of tables loaded from JSON arrays of
//! objects. Column types are inferred from the data.
//!
//! ## Quick Start
//!
//! ```
//! use jql::{MemorySource, Outcome, QueryEngine, rows_from_json};
//!
//! let rows = rows_from_json(serde_json::json!([
//!     {"name": "ada", "age": 36},
//!     {"name": "alan", "age": 41},
//! ]))
//! .unwrap();
//!
//! let mut engine = QueryEngine::new(MemorySource::new().with_rows("people.json", rows));
//! for result in engine.run(r#"load "people.json"; tables; select name, age from people;"#) {
//!     match result {
//!         Ok(Outcome::Loaded { table, rows }) => println!("{table}: {rows} rows"),
//!         Ok(Outcome::Tables(names)) => println!("{names:?}"),
//!         Ok(Outcome::Rows(projection)) => println!("{:?}", projection.rows),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! ```
//!
//! ## Grammar
//!
//! ```text
//! load "<file>" [as <table>] ;
//! tables ;
//! select <col> [as <alias>] [, <col> [as <alias>]]... from <table> ;
//! select * from <table> ;
//! ```
//!
//! Keywords are lowercase and matched exactly. Filenames must be quoted; table and column
//! names may be bare words or quoted strings.

mod ast;
mod cursor;
mod engine;
mod lexer;
mod parse;
mod pretty;
mod schema;
mod table;
mod value;

use thiserror::Error;

// ============ Primary Public API ============

pub use engine::{
    ExecError, Executor, LoadError, MemorySource, Outcome, QueryEngine, Registry, RowSource,
    default_table_name,
};
pub use schema::{ColumnType, Schema, SchemaError, infer};
pub use table::{Projection, Table, TableError, WILDCARD};
pub use value::{Row, Value, rows_from_json};

/// Run every statement in `text` once against a fresh engine.
pub fn run<S: RowSource>(text: &str, source: S) -> Vec<Result<Outcome, JqlError>> {
    QueryEngine::new(source).run(text)
}

// ============ Errors ============

#[derive(Error, Debug)]
pub enum JqlError {
    #[error("Parse error: {0}")]
    Parse(#[from] parse::ParseError),
    #[error("Execution error: {0}")]
    Exec(#[from] engine::ExecError),
}

pub use lexer::LexError;
pub use parse::ParseError;

// ============ Advanced: AST Access ============

/// Tokens, AST types and the parser, for tooling and introspection
pub mod advanced {
    pub use crate::ast::{AstNode, Keyword, Literal, NodeValue};
    pub use crate::cursor::{TokenCursor, TokenList};
    pub use crate::lexer::{Lexer, Token, TokenKind, tokenize};
    pub use crate::parse::{Parser, parse, parse_statement};
    pub use crate::pretty::tree;
}
