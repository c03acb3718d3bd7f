//! Pretty printing for JQL ASTs
//!
//! `Display` re-serializes a statement into canonical command text that parses
//! back into the same tree. [`tree`] draws the node hierarchy and is what the
//! parser writes to the debug log.

use std::fmt::{self, Display, Write};

use crate::ast::{AstNode, Keyword, Literal, NodeValue};

// ============ Display (command text) ============

impl Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

impl Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeValue::Keyword(kw) => write!(f, "{}", kw),
            NodeValue::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

impl Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self)?;
        if self.as_keyword().is_some_and(Keyword::starts_statement) {
            write!(f, ";")?;
        }
        Ok(())
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &AstNode) -> fmt::Result {
    write!(f, "{}", node.value)?;

    if node.is_keyword(Keyword::Select) {
        // Columns are comma separated, the from clause is not
        let mut first_column = true;
        for child in node.children() {
            if child.is_keyword(Keyword::From) {
                write!(f, " ")?;
            } else if first_column {
                write!(f, " ")?;
                first_column = false;
            } else {
                write!(f, ", ")?;
            }
            write_node(f, child)?;
        }
    } else {
        for child in node.children() {
            write!(f, " ")?;
            write_node(f, child)?;
        }
    }
    Ok(())
}

// ============ Tree ============

/// Render `node` and its children as a box-drawing tree.
///
/// ```text
/// [keyword: load]
/// ├── [string: f.json]
/// └── [keyword: as]
///     └── [word: t]
/// ```
pub fn tree(node: &AstNode) -> String {
    let mut out = String::new();
    write_tree(&mut out, node, "", None);
    out
}

fn label(value: &NodeValue) -> String {
    match value {
        NodeValue::Keyword(kw) => format!("[keyword: {}]", kw),
        NodeValue::Literal(lit) if lit.quoted => format!("[string: {}]", lit.text),
        NodeValue::Literal(lit) => format!("[word: {}]", lit.text),
    }
}

/// `is_last` is `None` for the root.
fn write_tree(out: &mut String, node: &AstNode, prefix: &str, is_last: Option<bool>) {
    let (branch, child_prefix) = match is_last {
        None => ("", prefix.to_string()),
        Some(true) => ("└── ", format!("{prefix}    ")),
        Some(false) => ("├── ", format!("{prefix}│   ")),
    };

    // Writing to a String cannot fail
    let _ = writeln!(out, "{prefix}{branch}{}", label(&node.value));

    let count = node.children().len();
    for (i, child) in node.children().iter().enumerate() {
        write_tree(out, child, &child_prefix, Some(i + 1 == count));
    }
}
