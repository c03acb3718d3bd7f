//! Interactive session over a [`QueryEngine`]

use std::io::{BufRead, Write};

use jql::{ExecError, Outcome, QueryEngine};

use crate::loader::JsonFileLoader;
use crate::render::{OutputFormat, RenderError, render_outcome};

const PROMPT: &str = "jql> ";
const CONTINUATION_PROMPT: &str = "  -> ";

const HELP: &str = "\
Statements end with ';' and may span several lines:
    load \"<file>\" [as <table>];
    tables;
    select <col> [as <alias>], ... from <table>;
    select * from <table>;

Commands:
    .help             show this message
    .tables           list loaded tables
    .schema <table>   show inferred column types
    .quit, .exit      leave the shell
";

pub struct Session {
    engine: QueryEngine<JsonFileLoader>,
    format: OutputFormat,
}

impl Session {
    pub fn new(loader: JsonFileLoader, format: OutputFormat) -> Self {
        Self {
            engine: QueryEngine::new(loader),
            format,
        }
    }

    pub fn engine(&self) -> &QueryEngine<JsonFileLoader> {
        &self.engine
    }

    /// Load a file under its default table name.
    pub fn preload(&mut self, path: &str) -> Result<Outcome, ExecError> {
        self.engine.load_table(path, None)
    }

    /// Run every statement in `text`, writing each outcome to `out`.
    ///
    /// Failed statements are logged and skipped. Returns how many failed.
    pub fn execute<W: Write>(&mut self, text: &str, out: &mut W) -> Result<usize, RenderError> {
        let mut failed = 0;
        for result in self.engine.run(text) {
            match result {
                Ok(outcome) => render_outcome(&outcome, self.format, out)?,
                Err(e) => {
                    log::error!("failed to execute statement: {}", e);
                    failed += 1;
                }
            }
        }
        Ok(failed)
    }

    /// Read commands from `input` until it runs out or `.quit` is entered.
    ///
    /// Lines accumulate until the buffered text ends with `;`. Dot commands
    /// are only recognized at the start of a statement.
    pub fn repl<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), RenderError> {
        let mut buffer = String::new();
        let mut lines = input.lines();

        loop {
            let prompt = if buffer.is_empty() { PROMPT } else { CONTINUATION_PROMPT };
            write!(out, "{prompt}")?;
            out.flush()?;

            let Some(line) = lines.next().transpose()? else {
                writeln!(out)?;
                return Ok(());
            };
            let trimmed = line.trim();

            if buffer.is_empty() && trimmed.starts_with('.') {
                match self.dot_command(trimmed, out)? {
                    Flow::Continue => continue,
                    Flow::Quit => return Ok(()),
                }
            }

            // Blank lines matter inside an open quoted literal
            if buffer.is_empty() && trimmed.is_empty() {
                continue;
            }
            if !buffer.is_empty() {
                buffer.push('\n');
            }
            buffer.push_str(&line);

            if buffer.trim_end().ends_with(';') {
                let failed = self.execute(&buffer, out)?;
                log::debug!("ran {:?}, {} failure(s)", buffer, failed);
                buffer.clear();
            }
        }
    }

    fn dot_command<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow, RenderError> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let argument = parts.next();

        match (command, argument) {
            (".quit" | ".exit", _) => return Ok(Flow::Quit),
            (".help", _) => write!(out, "{HELP}")?,
            (".tables", _) => {
                let names = self.engine.table_names();
                render_outcome(&Outcome::Tables(names), self.format, out)?;
            }
            (".schema", Some(name)) => match self.engine.table(name) {
                Some(table) => {
                    for (column, ty) in table.columns().iter() {
                        writeln!(out, "  {column}: {ty}")?;
                    }
                }
                None => log::error!("table '{}' not found", name),
            },
            (".schema", None) => log::error!("usage: .schema <table>"),
            (other, _) => log::error!("unknown command '{}', try .help", other),
        }
        Ok(Flow::Continue)
    }
}

enum Flow {
    Continue,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_dot_commands() {
        for command in [".help", ".tables", ".schema", ".quit"] {
            assert!(HELP.contains(command), "{command}");
        }
    }

    #[test]
    fn unknown_dot_command_keeps_going() {
        let mut session = Session::new(JsonFileLoader::new(), OutputFormat::Table);
        let mut out = Vec::new();
        session.repl(".bogus\n.schema\n.schema nope\n".as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(PROMPT).count(), 4);
    }
}
