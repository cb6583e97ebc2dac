//! Parse error types.

use crate::lexer::Token;

/// Error raised by the tokenizer or parser for malformed statement source.
///
/// Compilation is all-or-nothing: when any of these is raised, no partial
/// [`Program`](crate::Program) is returned and no external state has been
/// touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// A backtick-quoted identifier was opened but never closed.
    #[error("unterminated backtick identifier")]
    UnterminatedIdentifier,

    /// A numeric literal could not be scanned at this position.
    #[error("invalid numeric literal")]
    InvalidNumber,

    /// A character outside the language was encountered.
    #[error("unexpected character '{ch}'")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
    },

    /// The statement does not begin with an assignment target identifier.
    #[error("expected assignment target identifier at start of statement")]
    MissingTarget,

    /// The assignment target is not immediately followed by `=`.
    #[error("expected '=' after assignment target")]
    MissingAssign,

    /// Nothing follows the `=`.
    #[error("expected expression after '='")]
    EmptyExpression,

    /// A comma appeared outside a function call's argument list, or below
    /// its outermost nesting level.
    #[error("comma outside function argument list")]
    MisplacedComma,

    /// A `)` with no matching `(`.
    #[error("mismatched ')'")]
    UnmatchedCloseParen,

    /// A `(` left open at end of input.
    #[error("unmatched '('")]
    UnmatchedOpenParen,

    /// A function call left open at end of input.
    #[error("unterminated call to function '{name}'")]
    UnterminatedCall {
        /// The function whose argument list was never closed.
        name: String,
    },

    /// A function call with syntactically empty parentheses. There is no
    /// zero-argument call form.
    #[error("empty argument list in call to function '{name}'")]
    EmptyArgumentList {
        /// The function that was called with no arguments.
        name: String,
    },

    /// A token that is not valid at its position (operand where an operator
    /// is required, or vice versa).
    #[error("unexpected token '{token}' ({context})")]
    UnexpectedToken {
        /// The offending token.
        token: Token,
        /// What the parser was expecting instead.
        context: &'static str,
    },

    /// Input ended while an operand was still expected.
    #[error("unexpected end of input (expected operand)")]
    UnexpectedEof,
}
