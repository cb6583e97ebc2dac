//! # series-expr
//!
//! Expression compiler and evaluator for a small language of assignment
//! statements over scalar and series values, e.g. `z = a + b - c / 2` or
//! `s = sumproduct(a, b)`.
//!
//! The crate is backend-agnostic: it compiles text into a postfix
//! instruction [`Program`] and executes it as a stack machine against any
//! host-supplied [`Backend`], which owns the actual value type and its
//! arithmetic, alignment, and function semantics.
//!
//! ## Pipeline
//!
//! ```text
//! text ──tokenize──▶ tokens ──shunting-yard──▶ Program ──execute──▶ stored value
//!        lexer.rs             parser/                    executor.rs
//! ```
//!
//! - [`lexer`] — logos-based tokenization, including backtick-quoted
//!   identifiers for names containing spaces or symbols
//! - [`parser`] — shunting-yard parse with unary-minus disambiguation and
//!   function-call arity tracking, lowered to instructions
//! - [`program`] — the immutable, re-executable compile artifact
//! - [`executor`] — generic stack machine over the [`Backend`] capability set
//! - [`series`] — a reference backend (scalar/series sum type) for tests,
//!   examples, and as a template for real hosts
//!
//! ## Usage
//!
//! ```
//! use series_expr::{compile, execute, SeriesStore, Value};
//!
//! let mut store = SeriesStore::new();
//! store.insert("a", vec![1.0, 2.0, 3.0]);
//! store.insert("b", vec![10.0, 20.0, 30.0]);
//!
//! let program = compile("z = a * -b").unwrap();
//! execute(&program, &mut store).unwrap();
//!
//! assert_eq!(
//!     store.get("z"),
//!     Some(&Value::Series(vec![-10.0, -40.0, -90.0]))
//! );
//! ```
//!
//! Compilation and execution are synchronous and single-threaded. A
//! [`Program`] is immutable once produced and may be executed any number of
//! times, concurrently if each execution has its own backend discipline.

pub mod error;
pub mod executor;
pub mod lexer;
pub mod parser;
pub mod program;
pub mod series;

pub use error::{Error, Result};
pub use executor::{execute, Backend, EvalError};
pub use lexer::Token;
pub use parser::{compile, ParseError};
pub use program::{BinaryOp, Instruction, Program};
pub use series::{SeriesStore, Value};

/// Compile and execute a statement in one call.
///
/// Equivalent to [`compile`] followed by [`execute`]. A parse failure leaves
/// the backend untouched; an execution failure leaves it untouched too,
/// since the store is the last instruction to run.
///
/// # Errors
///
/// Returns [`Error::Parse`] or [`Error::Eval`] from the respective stage.
///
/// # Examples
///
/// ```
/// use series_expr::{evaluate, SeriesStore, Value};
///
/// let mut store = SeriesStore::new();
/// store.insert("a", vec![1.0, 2.0, 3.0]);
/// store.insert("b", vec![10.0, 20.0, 30.0]);
/// evaluate("s = sumproduct(a, b)", &mut store).unwrap();
/// assert_eq!(store.get("s"), Some(&Value::Scalar(140.0)));
/// ```
pub fn evaluate<B: Backend>(source: &str, backend: &mut B) -> Result<()> {
    let program = compile(source)?;
    execute(&program, backend)?;
    Ok(())
}
