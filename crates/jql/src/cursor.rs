//! Token cursor consumed by the parser
//!
//! The parser pulls tokens one at a time and looks at most one token ahead.
//! Both the live [`Lexer`](crate::lexer::Lexer) and an already materialized
//! [`TokenList`] can feed it.

use std::collections::VecDeque;

use crate::lexer::{LexError, Token};

pub trait TokenCursor {
    /// Consume and return the next token, `None` at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError>;

    /// Return the next token without consuming it.
    fn peek_token(&mut self) -> Result<Option<Token>, LexError>;
}

/// Cursor over tokens that were already produced.
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    tokens: VecDeque<Token>,
}

impl TokenList {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TokenCursor for TokenList {
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        Ok(self.tokens.pop_front())
    }

    fn peek_token(&mut self) -> Result<Option<Token>, LexError> {
        Ok(self.tokens.front().cloned())
    }
}

impl<C: TokenCursor + ?Sized> TokenCursor for &mut C {
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        (**self).next_token()
    }

    fn peek_token(&mut self) -> Result<Option<Token>, LexError> {
        (**self).peek_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_cursor_pulls_in_order() {
        let mut cursor = TokenList::new([Token::word("a"), Token::word(",")]);
        assert_eq!(cursor.peek_token().unwrap(), Some(Token::word("a")));
        assert_eq!(cursor.next_token().unwrap(), Some(Token::word("a")));
        assert_eq!(cursor.len(), 1);
        assert_eq!(cursor.next_token().unwrap(), Some(Token::word(",")));
        assert_eq!(cursor.next_token().unwrap(), None);
        assert!(cursor.is_empty());
    }
}
