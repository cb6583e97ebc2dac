//! Crate-level error type.

use crate::executor::EvalError;
use crate::parser::ParseError;

/// Any failure from the compile-and-execute pipeline.
///
/// [`compile`](crate::compile) raises only [`Error::Parse`] and
/// [`execute`](crate::execute) only [`Error::Eval`]; this type exists for
/// callers of [`evaluate`](crate::evaluate) and for hosts that funnel both
/// stages through one error path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The statement source was malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Execution against the backend failed.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Convenience alias for pipeline results.
pub type Result<T> = std::result::Result<T, Error>;
