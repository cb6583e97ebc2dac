//! Stack-machine execution of compiled programs.
//!
//! The executor replays a [`Program`]'s instruction sequence against a
//! host-supplied [`Backend`], producing one final value that is stored into
//! the target variable. The operand stack is local to each call, so a failed
//! run discards all intermediate values and never performs a partial store.
//!
//! The executor is generic over the backend and is monomorphized per concrete
//! value type; backends are a capability set, not a class hierarchy.

use tracing::trace;

use crate::program::{BinaryOp, Instruction, Program};

/// Error raised during program execution.
///
/// Backend-reported domain failures (shape mismatches, unsupported
/// functions) use these variants too and are surfaced as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// A variable reference the backend could not resolve.
    #[error("unknown variable '{name}'")]
    UnknownVariable {
        /// The unresolved variable name.
        name: String,
    },

    /// A function name the backend does not accept.
    #[error("unknown function '{name}'")]
    UnknownFunction {
        /// The rejected function name.
        name: String,
    },

    /// A function called with an argument count the backend does not accept.
    #[error("function '{name}' expects {expected} arguments, got {found}")]
    WrongArity {
        /// The function name.
        name: String,
        /// The argument count the backend accepts.
        expected: usize,
        /// The argument count in the compiled call.
        found: usize,
    },

    /// Operand stack underflow: a malformed program or insufficient call
    /// arguments.
    #[error("operand stack underflow")]
    StackUnderflow,

    /// The stack did not hold exactly the expected values when the program
    /// finished (malformed program).
    #[error("unexpected operand stack depth: expected {expected}, found {found}")]
    UnexpectedStackDepth {
        /// The expected number of remaining values.
        expected: usize,
        /// The actual number of remaining values.
        found: usize,
    },

    /// Two series of incompatible lengths were combined (backend alignment
    /// policy).
    #[error("series length mismatch: {left} vs {right}")]
    LengthMismatch {
        /// Length of the left operand.
        left: usize,
        /// Length of the right operand.
        right: usize,
    },
}

/// Capability set a host must supply to execute programs.
///
/// The core places no constraint on [`Backend::Value`]'s internal shape; it
/// is opaque and passed by ownership through the operand stack. Arithmetic
/// semantics, alignment/broadcast rules, division-by-zero handling, and the
/// accepted function set are all backend policy.
pub trait Backend {
    /// The host's value type (e.g., a series/scalar sum type).
    type Value;

    /// Resolve a variable by name.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownVariable`] if the name is not bound.
    fn load(&self, name: &str) -> Result<Self::Value, EvalError>;

    /// Store the final value under a variable name.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the store.
    fn store(&mut self, name: &str, value: Self::Value) -> Result<(), EvalError>;

    /// Construct a value from a numeric literal.
    fn literal(&self, value: f64) -> Self::Value;

    /// Negate a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value's shape does not support negation.
    fn negate(&self, value: Self::Value) -> Result<Self::Value, EvalError>;

    /// Apply a binary arithmetic operator.
    ///
    /// # Errors
    ///
    /// Returns an error for incompatible operand shapes.
    fn binary(
        &self,
        op: BinaryOp,
        lhs: Self::Value,
        rhs: Self::Value,
    ) -> Result<Self::Value, EvalError>;

    /// Call a named function with arguments in left-to-right order.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownFunction`] for a name the backend does
    /// not accept, or any domain error the function raises.
    fn call(&self, name: &str, args: Vec<Self::Value>) -> Result<Self::Value, EvalError>;
}

/// Execute a compiled program against a backend.
///
/// Mutates the backend only through its store operation; if execution fails
/// before the trailing store, the backend is left untouched.
///
/// # Errors
///
/// Returns an [`EvalError`] for unknown variables or functions, operand
/// stack violations, or any backend-reported domain failure.
///
/// # Examples
///
/// ```
/// use series_expr::{compile, execute, SeriesStore, Value};
///
/// let mut store = SeriesStore::new();
/// store.insert("x", Value::Scalar(10.0));
/// let program = compile("y = x * 3 - 4").unwrap();
/// execute(&program, &mut store).unwrap();
/// assert_eq!(store.get("y"), Some(&Value::Scalar(26.0)));
/// ```
pub fn execute<B: Backend>(program: &Program, backend: &mut B) -> Result<(), EvalError> {
    let mut stack: Vec<B::Value> = Vec::with_capacity(program.len());

    for instruction in program.instructions() {
        trace!(?instruction, depth = stack.len(), "executing");
        match instruction {
            Instruction::PushVariable(name) => stack.push(backend.load(name)?),
            Instruction::PushLiteral(value) => stack.push(backend.literal(*value)),
            Instruction::Negate => {
                let value = pop(&mut stack)?;
                stack.push(backend.negate(value)?);
            }
            Instruction::Add => apply_binary(backend, &mut stack, BinaryOp::Add)?,
            Instruction::Subtract => apply_binary(backend, &mut stack, BinaryOp::Subtract)?,
            Instruction::Multiply => apply_binary(backend, &mut stack, BinaryOp::Multiply)?,
            Instruction::Divide => apply_binary(backend, &mut stack, BinaryOp::Divide)?,
            Instruction::Call { name, arity } => {
                if stack.len() < *arity {
                    return Err(EvalError::StackUnderflow);
                }
                // split_off keeps the arguments in left-to-right order
                let args = stack.split_off(stack.len() - *arity);
                stack.push(backend.call(name, args)?);
            }
            Instruction::StoreVariable(name) => {
                let value = pop(&mut stack)?;
                backend.store(name, value)?;
            }
        }
    }

    if !stack.is_empty() {
        return Err(EvalError::UnexpectedStackDepth {
            expected: 0,
            found: stack.len(),
        });
    }
    Ok(())
}

fn pop<V>(stack: &mut Vec<V>) -> Result<V, EvalError> {
    stack.pop().ok_or(EvalError::StackUnderflow)
}

/// Pop the right then the left operand and push the backend's result.
fn apply_binary<B: Backend>(
    backend: &B,
    stack: &mut Vec<B::Value>,
    op: BinaryOp,
) -> Result<(), EvalError> {
    let rhs = pop(stack)?;
    let lhs = pop(stack)?;
    stack.push(backend.binary(op, lhs, rhs)?);
    Ok(())
}
