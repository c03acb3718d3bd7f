//! Parser for JQL commands
//!
//! Recursive descent over a [`TokenCursor`], one statement at a time, with a
//! single token of lookahead. Statements end at `;`; a trailing fragment that
//! never sees its `;` is dropped once the input runs out.

use thiserror::Error;

use crate::ast::{AstNode, Keyword, Literal};
use crate::cursor::{TokenCursor, TokenList};
use crate::lexer::{LexError, Lexer, Token, TokenKind};
use crate::pretty::tree;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown keyword '{0}'")]
    UnknownKeyword(String),

    #[error("unexpected token {0}")]
    UnexpectedToken(String),

    #[error("empty command")]
    EmptyCommand,

    #[error("'load' command: missing filename")]
    MissingFilename,

    #[error("missing table name")]
    MissingTableName,

    #[error("'select' command: missing 'from' keyword")]
    MissingFromKeyword,

    #[error("'select' command: missing column name")]
    MissingColumnName,

    #[error(transparent)]
    Lex(#[from] LexError),
}

type Result<T> = std::result::Result<T, ParseError>;

/// Parse every `;`-terminated statement in `input`.
///
/// Fails on the first bad statement. Use [`Parser`] directly to keep going
/// past failures.
pub fn parse(input: &str) -> Result<Vec<AstNode>> {
    Parser::new(Lexer::new(input)).collect()
}

/// Streams statements out of a token cursor.
///
/// Tokens are buffered up to the next separator and the buffered statement is
/// then parsed on its own, so an error in one statement leaves the following
/// ones intact. A lexing error ends the stream.
pub struct Parser<C> {
    tokens: C,
    parsed: usize,
    done: bool,
}

impl<C: TokenCursor> Parser<C> {
    pub fn new(tokens: C) -> Self {
        Self {
            tokens,
            parsed: 0,
            done: false,
        }
    }

    /// Parse the next statement, `None` once the input is exhausted.
    pub fn next_statement(&mut self) -> Option<Result<AstNode>> {
        if self.done {
            return None;
        }

        let mut buffer = Vec::new();
        loop {
            let token = match self.tokens.next_token() {
                Ok(token) => token,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };

            match token {
                None => {
                    self.done = true;
                    if !buffer.is_empty() {
                        log::debug!(
                            "discarding {} token(s) not terminated by ';'",
                            buffer.len()
                        );
                    }
                    return None;
                }
                Some(t) if t.is(TokenKind::StatementSeparator) => {
                    if buffer.is_empty() {
                        // `;;` is an empty statement, nothing to do
                        continue;
                    }
                    self.parsed += 1;
                    let result = parse_statement(&mut TokenList::new(buffer));
                    if let Ok(node) = &result {
                        log::debug!("statement {}:\n{}", self.parsed, tree(node));
                    }
                    return Some(result);
                }
                Some(t) => buffer.push(t),
            }
        }
    }
}

impl<C: TokenCursor> Iterator for Parser<C> {
    type Item = Result<AstNode>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_statement()
    }
}

/// Parse the tokens of exactly one statement, without its separator.
pub fn parse_statement<C: TokenCursor>(tokens: &mut C) -> Result<AstNode> {
    let Some(first) = tokens.next_token()? else {
        return Err(ParseError::EmptyCommand);
    };

    if !first.is(TokenKind::Word) {
        return Err(ParseError::UnexpectedToken(first.to_string()));
    }

    match Keyword::from_word(&first.text) {
        Some(Keyword::Load) => parse_load(tokens),
        Some(Keyword::Tables) => parse_tables(tokens),
        Some(Keyword::Select) => parse_select(tokens),
        _ => Err(ParseError::UnknownKeyword(first.text)),
    }
}

// ============ load ============

fn parse_load<C: TokenCursor>(tokens: &mut C) -> Result<AstNode> {
    // Word filenames get through here; the executor rejects them
    let filename = next_literal(tokens)?.ok_or(ParseError::MissingFilename)?;
    let mut root = AstNode::keyword(Keyword::Load).with_child(AstNode::literal(filename));

    let Some(next) = tokens.next_token()? else {
        return Ok(root);
    };
    if !is_keyword(&next, Keyword::As) {
        return Err(ParseError::UnexpectedToken(next.to_string()));
    }

    let table = next_literal(tokens)?.ok_or(ParseError::MissingTableName)?;
    root.push(AstNode::keyword(Keyword::As).with_child(AstNode::literal(table)));

    expect_end(tokens)?;
    Ok(root)
}

// ============ tables ============

fn parse_tables<C: TokenCursor>(tokens: &mut C) -> Result<AstNode> {
    expect_end(tokens)?;
    Ok(AstNode::keyword(Keyword::Tables))
}

// ============ select ============

fn parse_select<C: TokenCursor>(tokens: &mut C) -> Result<AstNode> {
    let mut root = AstNode::keyword(Keyword::Select);
    let mut expecting_column = true;

    loop {
        let Some(token) = tokens.next_token()? else {
            return Err(if root.children.is_empty() {
                ParseError::MissingColumnName
            } else {
                ParseError::MissingFromKeyword
            });
        };

        if is_keyword(&token, Keyword::From) {
            if expecting_column {
                return Err(ParseError::MissingColumnName);
            }
            break;
        }

        if token.is_word(",") {
            if expecting_column {
                return Err(ParseError::MissingColumnName);
            }
            expecting_column = true;
            continue;
        }

        if !expecting_column {
            return Err(ParseError::UnexpectedToken(token.to_string()));
        }

        let mut column = AstNode::literal(literal(token));
        if let Some(alias) = parse_alias(tokens)? {
            column.push(AstNode::keyword(Keyword::As).with_child(AstNode::literal(alias)));
        }
        root.push(column);
        expecting_column = false;
    }

    let table = next_literal(tokens)?.ok_or(ParseError::MissingTableName)?;
    root.push(AstNode::keyword(Keyword::From).with_child(AstNode::literal(table)));

    expect_end(tokens)?;
    Ok(root)
}

/// `as <name>` after a column, if present. A bare `from` is never taken as an alias.
fn parse_alias<C: TokenCursor>(tokens: &mut C) -> Result<Option<Literal>> {
    match tokens.peek_token()? {
        Some(t) if is_keyword(&t, Keyword::As) => {}
        _ => return Ok(None),
    }
    tokens.next_token()?;

    match tokens.next_token()? {
        Some(alias)
            if alias.is(TokenKind::QuotedString)
                || (alias.is(TokenKind::Word)
                    && !alias.is_word(",")
                    && !is_keyword(&alias, Keyword::From)) =>
        {
            Ok(Some(literal(alias)))
        }
        _ => Err(ParseError::MissingColumnName),
    }
}

// ============ Helpers ============

fn is_keyword(token: &Token, keyword: Keyword) -> bool {
    token.is_word(keyword.as_str())
}

fn literal(token: Token) -> Literal {
    match token.kind {
        TokenKind::QuotedString => Literal::quoted(token.text),
        TokenKind::Word | TokenKind::StatementSeparator => Literal::word(token.text),
    }
}

/// Next token as a literal; `None` at end of input or on a separator.
fn next_literal<C: TokenCursor>(tokens: &mut C) -> Result<Option<Literal>> {
    Ok(tokens
        .next_token()?
        .filter(|t| !t.is(TokenKind::StatementSeparator))
        .map(literal))
}

fn expect_end<C: TokenCursor>(tokens: &mut C) -> Result<()> {
    match tokens.next_token()? {
        None => Ok(()),
        Some(extra) => Err(ParseError::UnexpectedToken(extra.to_string())),
    }
}

// ============ Sanity Tests ============
// Most testing is done via integration tests in tests/integration.rs

#[cfg(test)]
mod tests {
    use super::*;

    fn one(input: &str) -> AstNode {
        let mut statements = parse(input).unwrap();
        assert_eq!(statements.len(), 1, "expected one statement in {input:?}");
        statements.remove(0)
    }

    fn word(text: &str) -> AstNode {
        AstNode::literal(Literal::word(text))
    }

    #[test]
    fn parse_load_with_alias() {
        let node = one(r#"load "f.json" as t;"#);
        assert_eq!(
            node,
            AstNode::keyword(Keyword::Load)
                .with_child(AstNode::literal(Literal::quoted("f.json")))
                .with_child(AstNode::keyword(Keyword::As).with_child(word("t")))
        );
    }

    #[test]
    fn parse_load_without_alias() {
        let node = one(r#"load "./data/people.json";"#);
        assert_eq!(node.children.len(), 1);
        assert!(node.alias().is_none());
    }

    #[test]
    fn parse_load_quoted_table_name() {
        let node = one(r#"load "f.json" as "my table";"#);
        assert_eq!(node.alias(), Some(&Literal::quoted("my table")));
    }

    #[test]
    fn parse_load_errors() {
        assert_eq!(parse("load;"), Err(ParseError::MissingFilename));
        assert_eq!(parse(r#"load "f.json" as;"#), Err(ParseError::MissingTableName));
        assert_eq!(
            parse(r#"load "f.json" into t;"#),
            Err(ParseError::UnexpectedToken("into".into()))
        );
        assert_eq!(
            parse(r#"load "f.json" as t extra;"#),
            Err(ParseError::UnexpectedToken("extra".into()))
        );
    }

    #[test]
    fn parse_load_word_filename_is_accepted() {
        let node = one("load data as t;");
        assert_eq!(node.child(0), Some(&word("data")));
    }

    #[test]
    fn parse_tables() {
        assert_eq!(one("tables;"), AstNode::keyword(Keyword::Tables));
        assert_eq!(
            parse("tables now;"),
            Err(ParseError::UnexpectedToken("now".into()))
        );
    }

    #[test]
    fn parse_select_columns_in_order() {
        let node = one("select b, a, * from t;");
        let columns: Vec<_> = node.children[..3]
            .iter()
            .map(|c| c.as_literal().unwrap().text.clone())
            .collect();
        assert_eq!(columns, ["b", "a", "*"]);
        assert_eq!(
            node.children[3],
            AstNode::keyword(Keyword::From).with_child(word("t"))
        );
    }

    #[test]
    fn parse_select_alias_attaches_to_column() {
        let node = one("select a as x, b from t;");
        assert_eq!(node.children.len(), 3);
        assert_eq!(node.children[0].alias(), Some(&Literal::word("x")));
        assert!(node.children[1].alias().is_none());
    }

    #[test]
    fn parse_select_errors() {
        assert_eq!(parse("select;"), Err(ParseError::MissingColumnName));
        assert_eq!(parse("select from t;"), Err(ParseError::MissingColumnName));
        assert_eq!(parse("select a, from t;"), Err(ParseError::MissingColumnName));
        assert_eq!(parse("select a as from t;"), Err(ParseError::MissingColumnName));
        assert_eq!(parse("select a as , b from t;"), Err(ParseError::MissingColumnName));
        assert_eq!(parse("select a;"), Err(ParseError::MissingFromKeyword));
        assert_eq!(parse("select a from;"), Err(ParseError::MissingTableName));
        assert_eq!(
            parse("select a b from t;"),
            Err(ParseError::UnexpectedToken("b".into()))
        );
        assert_eq!(
            parse("select a from t u;"),
            Err(ParseError::UnexpectedToken("u".into()))
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            parse(r#"LOAD "f.json";"#),
            Err(ParseError::UnknownKeyword("LOAD".into()))
        );
        assert_eq!(parse("Tables;"), Err(ParseError::UnknownKeyword("Tables".into())));
        assert_eq!(
            parse(r#"load "f.json" AS t;"#),
            Err(ParseError::UnexpectedToken("AS".into()))
        );
    }

    #[test]
    fn capitalized_keywords_are_plain_names() {
        let node = one("select From, AS as x from t;");
        assert_eq!(node.children[0], word("From"));
        assert_eq!(node.children[1].as_literal(), Some(&Literal::word("AS")));
        assert_eq!(node.children[1].alias(), Some(&Literal::word("x")));
        assert!(node.children[2].is_keyword(Keyword::From));
    }

    #[test]
    fn quoted_from_is_a_column() {
        let node = one(r#"select "from" from t;"#);
        assert_eq!(
            node.children[0],
            AstNode::literal(Literal::quoted("from"))
        );
    }

    #[test]
    fn dispatch_errors() {
        assert_eq!(parse("drop t;"), Err(ParseError::UnknownKeyword("drop".into())));
        assert_eq!(parse("from t;"), Err(ParseError::UnknownKeyword("from".into())));
        assert_eq!(
            parse(r#""load";"#),
            Err(ParseError::UnexpectedToken("\"load\"".into()))
        );
    }

    #[test]
    fn empty_statements_are_skipped() {
        assert_eq!(parse(";;  ;").unwrap(), vec![]);
        assert_eq!(parse("tables;;tables;").unwrap().len(), 2);
    }

    #[test]
    fn unterminated_statement_is_dropped() {
        assert_eq!(parse("tables; tables").unwrap().len(), 1);
        assert!(parse("select a").unwrap().is_empty());
    }

    #[test]
    fn empty_command_from_direct_entry() {
        assert_eq!(
            parse_statement(&mut TokenList::default()),
            Err(ParseError::EmptyCommand)
        );
    }

    #[test]
    fn parse_statement_from_lexer() {
        let node = parse_statement(&mut Lexer::new("tables")).unwrap();
        assert!(node.is_keyword(Keyword::Tables));
    }

    #[test]
    fn parser_continues_after_bad_statement() {
        let results: Vec<_> = Parser::new(Lexer::new("bogus; tables;")).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }

    #[test]
    fn lex_error_ends_stream() {
        let results: Vec<_> = Parser::new(Lexer::new(r#"tables; load "x; tables;"#)).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ParseError::Lex(_))));
    }
}
