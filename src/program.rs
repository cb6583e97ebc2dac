//! Compiled program representation.
//!
//! A [`Program`] is the only artifact that crosses from compile time to run
//! time: an ordered instruction sequence that is immutable, self-contained,
//! and re-executable any number of times against any conforming backend.
//!
//! Well-formedness invariant: a compiler-produced program leaves exactly one
//! value on the evaluation stack immediately before its trailing
//! [`Instruction::StoreVariable`], and the store is always the last
//! instruction.

use serde::{Deserialize, Serialize};

/// Binary arithmetic operator, dispatched to the backend at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`). Division by zero is backend policy; the core does not
    /// special-case it.
    Divide,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Subtract => write!(f, "-"),
            BinaryOp::Multiply => write!(f, "*"),
            BinaryOp::Divide => write!(f, "/"),
        }
    }
}

/// A single stack-machine instruction.
///
/// Instructions are immutable and own their string payloads. `Call` arity is
/// fixed at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Pushes the value loaded from the named backend variable.
    PushVariable(String),
    /// Pushes a literal value constructed by the backend.
    PushLiteral(f64),
    /// Pops one value and pushes its negation.
    Negate,
    /// Pops the right then the left operand and pushes their sum.
    Add,
    /// Pops the right then the left operand and pushes their difference.
    Subtract,
    /// Pops the right then the left operand and pushes their product.
    Multiply,
    /// Pops the right then the left operand and pushes their quotient.
    Divide,
    /// Pops `arity` values (preserving left-to-right argument order) and
    /// pushes the result of the named backend function.
    Call {
        /// Function name, resolved by the backend at call time.
        name: String,
        /// Number of arguments consumed from the stack.
        arity: usize,
    },
    /// Pops the final value and stores it into the named backend variable.
    ///
    /// Always the last instruction of a compiler-produced program.
    StoreVariable(String),
}

/// A complete compiled assignment statement.
///
/// Programs are produced by [`compile`](crate::compile) and executed by
/// [`execute`](crate::execute). Once produced, a program carries no other
/// state and may be shared freely across threads; each execution uses its own
/// operand stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Creates a program from a compiler-emitted instruction sequence.
    pub(crate) fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Returns the ordered instruction sequence.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns the number of instructions, including the trailing store.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the program contains no instructions.
    ///
    /// Compiler-produced programs are never empty; this exists for
    /// completeness of the container API.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
