//! Keywords of the command language

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    Load,
    As,
    Tables,
    Select,
    From,
}

impl Keyword {
    pub const ALL: [Keyword; 5] = [
        Keyword::Load,
        Keyword::As,
        Keyword::Tables,
        Keyword::Select,
        Keyword::From,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Load => "load",
            Keyword::As => "as",
            Keyword::Tables => "tables",
            Keyword::Select => "select",
            Keyword::From => "from",
        }
    }

    /// Exact lookup of a bare word. Keywords are lowercase only.
    pub fn from_word(word: &str) -> Option<Keyword> {
        Self::ALL.into_iter().find(|kw| kw.as_str() == word)
    }

    /// Keywords that may start a statement.
    pub fn starts_statement(self) -> bool {
        matches!(self, Keyword::Load | Keyword::Tables | Keyword::Select)
    }
}
