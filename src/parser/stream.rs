//! Token stream wrapper for the statement parser.

use crate::lexer::Token;

/// Token stream with one-token lookahead.
///
/// Exhaustion stands in for the grammar's end-of-input marker: once `next`
/// starts returning `None` it does so on every further call.
pub struct TokenStream<'src> {
    tokens: &'src [Token],
    pos: usize,
}

impl<'src> TokenStream<'src> {
    /// Create a new token stream.
    pub fn new(tokens: &'src [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Advance to the next token and return the current one.
    pub fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Check if the current token matches the expected token exactly.
    pub fn check(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    /// Check if we've reached the end of the token stream.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookahead_does_not_consume() {
        let tokens = vec![Token::Plus, Token::Minus];
        let mut stream = TokenStream::new(&tokens);
        assert_eq!(stream.peek(), Some(&Token::Plus));
        assert_eq!(stream.peek(), Some(&Token::Plus));
        assert_eq!(stream.next(), Some(&Token::Plus));
        assert_eq!(stream.peek(), Some(&Token::Minus));
    }

    #[test]
    fn test_end_is_idempotent() {
        let tokens = vec![Token::Assign];
        let mut stream = TokenStream::new(&tokens);
        stream.next();
        assert!(stream.at_end());
        assert_eq!(stream.next(), None);
        assert_eq!(stream.next(), None);
    }
}
