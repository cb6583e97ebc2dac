//! Lexical analysis for assignment statements.
//!
//! Tokenization of statement source using logos.
//!
//! # Design
//!
//! - `Token` — all token types of the statement language (operators,
//!   punctuation, literals, identifiers)
//! - Whitespace is skipped during lexing (not a token)
//! - Identifiers come in two spellings: plain (`total_return`) and
//!   backtick-quoted (`` `total return` ``), which admits any character except
//!   a backtick and performs no escaping
//! - End of input is represented by stream exhaustion, not a sentinel token
//!
//! # Examples
//!
//! ```
//! use series_expr::lexer::{tokenize, Token};
//! let tokens = tokenize("z = a + 2").unwrap();
//! assert_eq!(tokens[1], Token::Assign);
//! ```

use logos::Logos;

use crate::parser::ParseError;

/// Statement token.
///
/// Represents all lexical elements of the assignment language: the four
/// arithmetic operators, parentheses, comma, `=`, numeric literals, and
/// identifiers. Unary negation and function markers are parser-internal
/// states and never appear in lexer output.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    /// Operator `+`
    #[token("+")]
    Plus,
    /// Operator `-` (binary subtraction or unary negation, disambiguated by
    /// the parser)
    #[token("-")]
    Minus,
    /// Operator `*`
    #[token("*")]
    Star,
    /// Operator `/`
    #[token("/")]
    Slash,
    /// Delimiter `(`
    #[token("(")]
    LParen,
    /// Delimiter `)`
    #[token(")")]
    RParen,
    /// Argument separator `,`
    #[token(",")]
    Comma,
    /// Assignment `=`
    #[token("=")]
    Assign,

    /// Numeric literal (e.g., 42, 3.14, .5, 1e10)
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    /// Identifier (e.g., carry, total_return, `total return`)
    ///
    /// The backtick-quoted form takes its content verbatim between the
    /// backticks; both spellings produce the same token.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    #[regex(r"`[^`]*`", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    Ident(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Assign => write!(f, "="),
            Token::Number(n) => write!(f, "{}", n),
            Token::Ident(name) => write!(f, "{}", name),
        }
    }
}

/// Tokenize statement source into a token sequence.
///
/// # Errors
///
/// Returns a [`ParseError`] for an unterminated backtick identifier, a
/// numeric literal that cannot be scanned (a bare `.`), or any character
/// outside the language.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push(token),
            Err(()) => {
                let offending = source[span].chars().next().unwrap_or_default();
                return Err(match offending {
                    '`' => ParseError::UnterminatedIdentifier,
                    '.' => ParseError::InvalidNumber,
                    ch => ParseError::UnexpectedChar { ch },
                });
            }
        }
    }
    Ok(tokens)
}
