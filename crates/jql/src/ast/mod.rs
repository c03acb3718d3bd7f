//! AST types for JQL
//!
//! One parsed statement is a tree of [`AstNode`]s. Every node carries either a
//! keyword or a literal, plus its children in source order:
//!
//! ```text
//! load "people.json" as p;      select name, age as years from p;
//!
//! [keyword: load]               [keyword: select]
//! ├── [string: people.json]     ├── [word: name]
//! └── [keyword: as]             ├── [word: age]
//!     └── [word: p]             │   └── [keyword: as]
//!                               │       └── [word: years]
//!                               └── [keyword: from]
//!                                   └── [word: p]
//! ```

mod keyword;

pub use keyword::Keyword;

use serde::Serialize;

/// A filename, table name, column name or alias as written in the command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    pub text: String,
    /// Whether the literal came from a quoted string token
    pub quoted: bool,
}

impl Literal {
    pub fn word(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum NodeValue {
    Keyword(Keyword),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AstNode {
    pub value: NodeValue,
    pub children: Vec<AstNode>,
}

impl AstNode {
    pub fn keyword(keyword: Keyword) -> Self {
        Self {
            value: NodeValue::Keyword(keyword),
            children: Vec::new(),
        }
    }

    pub fn literal(literal: Literal) -> Self {
        Self {
            value: NodeValue::Literal(literal),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: AstNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: AstNode) {
        self.children.push(child);
    }

    pub fn as_keyword(&self) -> Option<Keyword> {
        match &self.value {
            NodeValue::Keyword(kw) => Some(*kw),
            NodeValue::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.value {
            NodeValue::Literal(lit) => Some(lit),
            NodeValue::Keyword(_) => None,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.as_keyword() == Some(keyword)
    }

    pub fn children(&self) -> &[AstNode] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&AstNode> {
        self.children.get(index)
    }

    /// Literal wrapped by an `as` child, if any.
    ///
    /// Used for `load ... as <name>` on the statement root and for column
    /// aliases on select column nodes.
    pub fn alias(&self) -> Option<&Literal> {
        self.children
            .iter()
            .find(|child| child.is_keyword(Keyword::As))
            .and_then(|as_node| as_node.child(0))
            .and_then(AstNode::as_literal)
    }
}
