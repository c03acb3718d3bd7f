//! JQL shell - load JSON files and query them interactively
//!
//! This crate wraps the [`jql`] engine with a file loader, an ASCII table
//! renderer and a line-oriented REPL. The `jql` binary is a thin CLI over
//! [`Session`].
//!
//! # Example
//!
//! ```no_run
//! use jql_shell::{JsonFileLoader, OutputFormat, Session};
//!
//! let mut session = Session::new(JsonFileLoader::new(), OutputFormat::Table);
//! session.preload("./data/people.json").unwrap();
//!
//! let mut stdout = std::io::stdout();
//! let failed = session
//!     .execute("select name, age from people;", &mut stdout)
//!     .unwrap();
//! assert_eq!(failed, 0);
//! ```

pub mod loader;
pub mod render;
pub mod session;

// Re-exports for convenience
pub use loader::JsonFileLoader;
pub use render::{OutputFormat, RenderError, render_outcome, render_table};
pub use session::Session;
