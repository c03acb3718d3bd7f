//! End-to-end tests for the shell: files on disk through to rendered output

use std::fs;
use std::path::Path;

use jql::{ColumnType, ExecError};
use jql_shell::{JsonFileLoader, OutputFormat, Session};
use tempfile::TempDir;

fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("people.json"),
        r#"[
            {"name": "ada", "age": 36},
            {"name": "grace", "age": 85, "team": "navy"}
        ]"#,
    )
    .unwrap();
    fs::write(dir.path().join("scores.json"), r#"[{"score": 1.5}, {"score": "n/a"}]"#).unwrap();
    fs::write(dir.path().join("empty.json"), "[]").unwrap();
    fs::write(dir.path().join("broken.json"), "[{\"a\": ").unwrap();
    dir
}

fn session(dir: &Path, format: OutputFormat) -> Session {
    Session::new(JsonFileLoader::with_root(dir), format)
}

fn execute(session: &mut Session, text: &str) -> (usize, String) {
    let mut out = Vec::new();
    let failed = session.execute(text, &mut out).unwrap();
    (failed, String::from_utf8(out).unwrap())
}

#[test]
fn load_and_select_renders_table() {
    let dir = data_dir();
    let mut session = session(dir.path(), OutputFormat::Table);

    let (failed, text) = execute(
        &mut session,
        r#"load "people.json"; select name, team, age from people;"#,
    );
    assert_eq!(failed, 0);
    assert_eq!(
        text,
        concat!(
            "Loaded table 'people'\n",
            " name|team|age|\n",
            "---------------\n",
            "  ada|    | 36|\n",
            "grace|navy| 85|\n",
        )
    );
}

#[test]
fn tables_in_load_order() {
    let dir = data_dir();
    let mut session = session(dir.path(), OutputFormat::Table);

    let (failed, text) = execute(
        &mut session,
        r#"load "scores.json" as s; load "people.json"; tables;"#,
    );
    assert_eq!(failed, 0);
    assert!(text.ends_with("  - s\n  - people\n"), "{text}");
}

#[test]
fn failures_are_counted_and_skipped() {
    let dir = data_dir();
    let mut session = session(dir.path(), OutputFormat::Table);

    let (failed, text) = execute(
        &mut session,
        r#"load "missing.json"; load "empty.json"; load "broken.json"; load "people.json"; load "people.json"; select x from people; tables;"#,
    );
    assert_eq!(failed, 5);
    assert_eq!(text, "Loaded table 'people'\n  - people\n");
}

#[test]
fn mixed_column_is_string() {
    let dir = data_dir();
    let mut session = session(dir.path(), OutputFormat::Table);
    session.preload("scores.json").unwrap();

    let columns = session.engine().table("scores").unwrap().columns();
    assert_eq!(columns.get("score"), Some(ColumnType::String));
}

#[test]
fn preload_duplicate_fails() {
    let dir = data_dir();
    let mut session = session(dir.path(), OutputFormat::Table);
    session.preload("people.json").unwrap();
    assert!(matches!(
        session.preload("people.json"),
        Err(ExecError::TableAlreadyLoaded(name)) if name == "people"
    ));
}

#[test]
fn json_output() {
    let dir = data_dir();
    let mut session = session(dir.path(), OutputFormat::Json);

    let (_, text) = execute(&mut session, r#"load "people.json" as p; select name from p;"#);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            r#"{"loaded":{"table":"p","rows":2}}"#,
            r#"{"rows":{"headers":["name"],"rows":[["ada"],["grace"]]}}"#,
        ]
    );
}

#[test]
fn repl_accumulates_lines_until_separator() {
    let dir = data_dir();
    let mut session = session(dir.path(), OutputFormat::Table);

    let input = "load \"people.json\"\n  as p;\nselect\nname\nfrom p;\n.schema p\n.quit\ntables;\n";
    let mut out = Vec::new();
    session.repl(input.as_bytes(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Loaded table 'p'"), "{text}");
    assert!(text.contains("  -> "), "{text}");
    assert!(text.contains("grace|"), "{text}");
    assert!(text.contains("  name: string\n  age: number\n  team: string\n"), "{text}");
    // Nothing after .quit runs
    assert!(!text.contains("  - p"), "{text}");
}

#[test]
fn repl_dot_tables_and_end_of_input() {
    let dir = data_dir();
    let mut session = session(dir.path(), OutputFormat::Table);
    session.preload("people.json").unwrap();

    let mut out = Vec::new();
    session.repl(".tables\nselect name\n".as_bytes(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("  - people\n"), "{text}");
    // The unterminated select is never run
    assert!(!text.contains("ada"), "{text}");
}

#[test]
fn repl_keeps_whitespace_inside_multiline_quotes() {
    let dir = data_dir();
    let mut session = session(dir.path(), OutputFormat::Table);

    let input = "load \"people.json\" as \"first\n\n  second \";\n  tables;\n";
    let mut out = Vec::new();
    session.repl(input.as_bytes(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("  - first\n\n  second \n"), "{text}");
}
