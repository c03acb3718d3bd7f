//! Tokenizer for JQL commands
//!
//! Context free: it knows nothing about statements beyond `;`. Symbols are
//! surfaced as one-character words (`,` and `*` included) and it is up to the
//! parser to give them meaning.

use std::fmt;

use thiserror::Error;
use winnow::combinator::{alt, terminated};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_till, take_until, take_while};

use crate::cursor::TokenCursor;

type PResult<T> = winnow::ModalResult<T>;

const SEPARATORS: [char; 4] = [' ', '\t', '\n', '\r'];

const SYMBOLS: [char; 24] = [
    // parentheses
    '(', ')', '[', ']', '{', '}',
    // arithmetic
    '+', '-', '/', '%', '*',
    // punctuation
    ',', ':', ';', '\'', '"', '.',
    // logical
    '|', '&', '?', '!',
    // comparison
    '<', '>', '=',
];

fn is_symbol(c: char) -> bool {
    SYMBOLS.contains(&c)
}

fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Word,
    QuotedString,
    StatementSeparator,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Word => "word",
            TokenKind::QuotedString => "string",
            TokenKind::StatementSeparator => "separator",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Word, text)
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self::new(TokenKind::QuotedString, text)
    }

    pub fn separator() -> Self {
        Self::new(TokenKind::StatementSeparator, ";")
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// True for a bare word exactly equal to `word`.
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text == word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::QuotedString => write!(f, "\"{}\"", self.text),
            TokenKind::Word | TokenKind::StatementSeparator => write!(f, "{}", self.text),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
}

/// Pull-based tokenizer over a command string.
pub struct Lexer<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, rest: source }
    }

    /// Byte offset of the next unread character.
    pub fn offset(&self) -> usize {
        self.source.len() - self.rest.len()
    }

    /// Produce the next token, or `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let mut input = self.rest;
        // Infallible: zero or more separators
        let _ = skip_separators(&mut input);
        let start = self.source.len() - input.len();

        let token = match lexeme.parse_next(&mut input) {
            // Only fails on empty input
            Err(_) => None,
            Ok(Lexeme::Symbol(';')) => Some(Token::separator()),
            Ok(Lexeme::Symbol('"')) => match quoted_body.parse_next(&mut input) {
                Ok(body) => Some(Token::quoted(body)),
                Err(_) => {
                    self.rest = "";
                    return Err(LexError::UnterminatedString { offset: start });
                }
            },
            Ok(Lexeme::Symbol(other)) => Some(Token::word(other.to_string())),
            Ok(Lexeme::Word(text)) => Some(Token::word(text)),
        };

        self.rest = input;

        if let Some(t) = &token {
            log::debug!("token kind={} value={:?}", t.kind, t.text);
        }
        Ok(token)
    }

    /// Look at the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<Option<Token>, LexError> {
        let saved = self.rest;
        let token = self.next_token();
        self.rest = saved;
        token
    }

    /// Drain every remaining token, stopping at the first error.
    pub fn collect_tokens(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

impl TokenCursor for Lexer<'_> {
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        Lexer::next_token(self)
    }

    fn peek_token(&mut self) -> Result<Option<Token>, LexError> {
        Lexer::peek_token(self)
    }
}

/// Tokenize a whole command string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).collect_tokens()
}

// ============ Scanners ============

enum Lexeme<'a> {
    Symbol(char),
    Word(&'a str),
}

fn lexeme<'a>(input: &mut &'a str) -> PResult<Lexeme<'a>> {
    alt((symbol.map(Lexeme::Symbol), word.map(Lexeme::Word))).parse_next(input)
}

fn skip_separators(input: &mut &str) -> PResult<()> {
    take_while(0.., is_separator).void().parse_next(input)
}

fn symbol(input: &mut &str) -> PResult<char> {
    one_of(is_symbol).parse_next(input)
}

fn word<'a>(input: &mut &'a str) -> PResult<&'a str> {
    take_till(1.., |c: char| is_separator(c) || is_symbol(c)).parse_next(input)
}

/// Everything up to the closing quote, verbatim. The quote itself is consumed.
fn quoted_body<'a>(input: &mut &'a str) -> PResult<&'a str> {
    terminated(take_until(0.., "\""), any).parse_next(input)
}
