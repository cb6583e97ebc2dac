//! Hand-written statement parser.
//!
//! Compiles a single assignment statement (`target = expression`) into a
//! stack-machine [`Program`] using the shunting-yard algorithm, extended with
//! function-call and comma handling.
//!
//! ## Architecture
//!
//! - `stream`: TokenStream wrapper with lookahead
//! - `error`: ParseError
//! - [`compile`]: shunting-yard loop emitting postfix instructions
//!
//! ## Disambiguation
//!
//! Two pieces of parser state drive the grammar's context sensitivity:
//!
//! - An explicit two-state flag ("operand expected" / "operator or end
//!   expected") rather than surrounding-token pattern matching. A `-` in
//!   operand position is unary negation; any other token in the wrong
//!   position is rejected at compile time.
//! - A stack of call-frame records, pushed when an identifier is
//!   immediately followed by `(` and popped when that call's parenthesis
//!   nesting returns to zero. Frames track nesting depth, top-level comma
//!   count, and whether any argument content has been seen, so nested calls
//!   compose without aliasing.

mod error;
mod stream;

pub use error::ParseError;
use stream::TokenStream;

use tracing::debug;

use crate::lexer::{tokenize, Token};
use crate::program::{BinaryOp, Instruction, Program};

/// What the parser is positioned to accept next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// An operand must come next: start of expression, after an operator,
    /// after `(`, or after `,`.
    ExpectOperand,
    /// An operator, `)` , `,`, or end of input must come next.
    ExpectOperator,
}

/// Pending entry on the shunting-yard operator stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingOp {
    /// A binary arithmetic operator awaiting its right operand.
    Binary(BinaryOp),
    /// Unary negation (highest precedence, right-associative).
    Negate,
    /// A plain grouping parenthesis.
    OpenParen,
    /// A function call boundary; doubles as the call's own open parenthesis.
    ///
    /// The call's name and argument bookkeeping live in the parallel
    /// [`CallFrame`] stack.
    Call,
}

impl PendingOp {
    fn precedence(self) -> u8 {
        match self {
            PendingOp::Negate => 3,
            PendingOp::Binary(BinaryOp::Multiply) | PendingOp::Binary(BinaryOp::Divide) => 2,
            PendingOp::Binary(BinaryOp::Add) | PendingOp::Binary(BinaryOp::Subtract) => 1,
            PendingOp::OpenParen | PendingOp::Call => 0,
        }
    }

    fn is_operator(self) -> bool {
        matches!(self, PendingOp::Binary(_) | PendingOp::Negate)
    }
}

/// Per-call bookkeeping, alive from `name(` to the matching `)`.
#[derive(Debug)]
struct CallFrame {
    /// The called function's name, for the emitted instruction and errors.
    name: String,
    /// Parenthesis nesting inside this call; the call's own paren counts as 1.
    depth: u32,
    /// Top-level commas seen so far.
    commas: usize,
    /// Whether any argument expression has begun. Distinguishes the rejected
    /// empty-parentheses form from a real argument list.
    saw_argument: bool,
}

/// Compile a single assignment statement into a [`Program`].
///
/// The statement must have the form `target = expression`, where `target` is
/// a plain or backtick-quoted identifier. The expression grammar is standard
/// arithmetic with identifiers, numeric literals, parenthesized groups, unary
/// minus, and function calls `name(arg, ...)`.
///
/// # Errors
///
/// Returns a [`ParseError`] for any malformed input. Compilation never
/// partially mutates external state; on error no program is produced.
///
/// # Examples
///
/// ```
/// use series_expr::compile;
/// let program = compile("z = a * -b + 2").unwrap();
/// assert_eq!(program.len(), 7);
/// ```
pub fn compile(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source)?;
    let mut stream = TokenStream::new(&tokens);

    let target = match stream.next() {
        Some(Token::Ident(name)) => name.clone(),
        _ => return Err(ParseError::MissingTarget),
    };
    if stream.next() != Some(&Token::Assign) {
        return Err(ParseError::MissingAssign);
    }
    if stream.at_end() {
        return Err(ParseError::EmptyExpression);
    }

    let mut compiler = Compiler::new();
    compiler.compile_expression(&mut stream)?;

    let mut instructions = compiler.finish()?;
    instructions.push(Instruction::StoreVariable(target.clone()));

    debug!(
        variable = %target,
        instructions = instructions.len(),
        "compiled assignment statement"
    );
    Ok(Program::from_instructions(instructions))
}

/// Shunting-yard compiler for a single expression.
///
/// Emits postfix instructions directly into the output queue; the 1:1
/// token-to-instruction lowering is fused into emission.
struct Compiler {
    output: Vec<Instruction>,
    ops: Vec<PendingOp>,
    frames: Vec<CallFrame>,
    state: State,
}

impl Compiler {
    fn new() -> Self {
        Self {
            output: Vec::new(),
            ops: Vec::new(),
            frames: Vec::new(),
            state: State::ExpectOperand,
        }
    }

    /// Consume tokens until end of input, building the postfix output.
    fn compile_expression(&mut self, stream: &mut TokenStream<'_>) -> Result<(), ParseError> {
        while let Some(token) = stream.next().cloned() {
            match token {
                Token::Ident(name) => {
                    self.require_operand_position(Token::Ident(name.clone()))?;
                    if stream.check(&Token::LParen) {
                        stream.next();
                        self.ops.push(PendingOp::Call);
                        self.frames.push(CallFrame {
                            name,
                            depth: 1,
                            commas: 0,
                            saw_argument: false,
                        });
                    } else {
                        self.push_operand(Instruction::PushVariable(name));
                    }
                }
                Token::Number(value) => {
                    self.require_operand_position(Token::Number(value))?;
                    self.push_operand(Instruction::PushLiteral(value));
                }
                Token::LParen => {
                    self.require_operand_position(Token::LParen)?;
                    if let Some(frame) = self.frames.last_mut() {
                        frame.depth += 1;
                    }
                    self.ops.push(PendingOp::OpenParen);
                }
                Token::Comma => self.comma()?,
                Token::RParen => self.close_paren()?,
                Token::Minus if self.state == State::ExpectOperand => {
                    self.push_operator(PendingOp::Negate);
                }
                Token::Plus => self.binary(Token::Plus, BinaryOp::Add)?,
                Token::Minus => self.binary(Token::Minus, BinaryOp::Subtract)?,
                Token::Star => self.binary(Token::Star, BinaryOp::Multiply)?,
                Token::Slash => self.binary(Token::Slash, BinaryOp::Divide)?,
                Token::Assign => {
                    return Err(ParseError::UnexpectedToken {
                        token: Token::Assign,
                        context: "not valid inside an expression",
                    });
                }
            }
        }
        Ok(())
    }

    /// Reject operand-kind tokens arriving where an operator is required
    /// (this is what turns trailing garbage into a compile error).
    fn require_operand_position(&self, token: Token) -> Result<(), ParseError> {
        if self.state == State::ExpectOperator {
            return Err(ParseError::UnexpectedToken {
                token,
                context: "expected an operator or end of statement",
            });
        }
        Ok(())
    }

    fn push_operand(&mut self, instruction: Instruction) {
        self.output.push(instruction);
        if let Some(frame) = self.frames.last_mut() {
            frame.saw_argument = true;
        }
        self.state = State::ExpectOperator;
    }

    /// Pop-and-emit per the precedence/associativity rule, then push.
    ///
    /// Left-associative incoming operators pop while the top's precedence is
    /// greater or equal; the right-associative negate pops only while it is
    /// strictly greater.
    fn push_operator(&mut self, op: PendingOp) {
        let right_assoc = op == PendingOp::Negate;
        while let Some(&top) = self.ops.last() {
            if !top.is_operator() {
                break;
            }
            let pop = if right_assoc {
                top.precedence() > op.precedence()
            } else {
                top.precedence() >= op.precedence()
            };
            if !pop {
                break;
            }
            self.ops.pop();
            self.emit_operator(top);
        }
        self.ops.push(op);
        self.state = State::ExpectOperand;
    }

    fn binary(&mut self, token: Token, op: BinaryOp) -> Result<(), ParseError> {
        if self.state == State::ExpectOperand {
            return Err(ParseError::UnexpectedToken {
                token,
                context: "expected an operand",
            });
        }
        self.push_operator(PendingOp::Binary(op));
        Ok(())
    }

    /// A comma separates top-level arguments of the innermost active call.
    fn comma(&mut self) -> Result<(), ParseError> {
        if self.state == State::ExpectOperand {
            return Err(ParseError::UnexpectedToken {
                token: Token::Comma,
                context: "expected an operand",
            });
        }
        match self.frames.last() {
            Some(frame) if frame.depth == 1 => {}
            _ => return Err(ParseError::MisplacedComma),
        }
        self.drain_to_boundary();
        if let Some(frame) = self.frames.last_mut() {
            frame.commas += 1;
        }
        self.state = State::ExpectOperand;
        Ok(())
    }

    fn close_paren(&mut self) -> Result<(), ParseError> {
        if self.state == State::ExpectOperand {
            // `f()` is the one ExpectOperand close we name specifically:
            // there is no zero-argument call form.
            if let Some(frame) = self.frames.last() {
                if frame.depth == 1
                    && !frame.saw_argument
                    && frame.commas == 0
                    && self.ops.last() == Some(&PendingOp::Call)
                {
                    return Err(ParseError::EmptyArgumentList {
                        name: frame.name.clone(),
                    });
                }
            }
            return Err(ParseError::UnexpectedToken {
                token: Token::RParen,
                context: "expected an operand",
            });
        }

        let closes_call = match self.frames.last_mut() {
            Some(frame) => {
                frame.depth -= 1;
                frame.depth == 0
            }
            None => false,
        };
        self.drain_to_boundary();

        if closes_call {
            if self.ops.pop() != Some(PendingOp::Call) {
                return Err(ParseError::UnmatchedCloseParen);
            }
            let frame = match self.frames.pop() {
                Some(frame) => frame,
                None => return Err(ParseError::UnmatchedCloseParen),
            };
            if !frame.saw_argument {
                return Err(ParseError::EmptyArgumentList { name: frame.name });
            }
            self.output.push(Instruction::Call {
                name: frame.name,
                arity: frame.commas + 1,
            });
            if let Some(outer) = self.frames.last_mut() {
                outer.saw_argument = true;
            }
        } else if self.ops.pop() != Some(PendingOp::OpenParen) {
            return Err(ParseError::UnmatchedCloseParen);
        }

        self.state = State::ExpectOperator;
        Ok(())
    }

    /// Pop-and-emit pending operators down to the nearest paren or call
    /// boundary, leaving the boundary in place.
    fn drain_to_boundary(&mut self) {
        while let Some(&top) = self.ops.last() {
            if !top.is_operator() {
                break;
            }
            self.ops.pop();
            self.emit_operator(top);
        }
    }

    fn emit_operator(&mut self, op: PendingOp) {
        let instruction = match op {
            PendingOp::Binary(BinaryOp::Add) => Instruction::Add,
            PendingOp::Binary(BinaryOp::Subtract) => Instruction::Subtract,
            PendingOp::Binary(BinaryOp::Multiply) => Instruction::Multiply,
            PendingOp::Binary(BinaryOp::Divide) => Instruction::Divide,
            PendingOp::Negate => Instruction::Negate,
            // boundaries are discarded, never emitted
            PendingOp::OpenParen | PendingOp::Call => return,
        };
        self.output.push(instruction);
    }

    /// Drain the operator stack at end of input and hand back the output.
    fn finish(mut self) -> Result<Vec<Instruction>, ParseError> {
        if self.state == State::ExpectOperand {
            return Err(ParseError::UnexpectedEof);
        }
        while let Some(op) = self.ops.pop() {
            match op {
                PendingOp::OpenParen => return Err(ParseError::UnmatchedOpenParen),
                PendingOp::Call => {
                    let name = self.frames.pop().map(|f| f.name).unwrap_or_default();
                    return Err(ParseError::UnterminatedCall { name });
                }
                op => self.emit_operator(op),
            }
        }
        debug_assert!(self.frames.is_empty(), "call frame left without marker");
        Ok(self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Instruction as I;

    /// Test helper: compile and unwrap the instruction sequence.
    fn instructions(source: &str) -> Vec<I> {
        compile(source)
            .expect("compile failed on valid source")
            .instructions()
            .to_vec()
    }

    fn var(name: &str) -> I {
        I::PushVariable(name.to_string())
    }

    #[test]
    fn test_simple_assignment() {
        assert_eq!(
            instructions("z = a + b"),
            vec![
                var("a"),
                var("b"),
                I::Add,
                I::StoreVariable("z".to_string()),
            ]
        );
    }

    #[test]
    fn test_multiplication_binds_tighter_than_subtraction() {
        assert_eq!(
            instructions("y = x * 3 - 4"),
            vec![
                var("x"),
                I::PushLiteral(3.0),
                I::Multiply,
                I::PushLiteral(4.0),
                I::Subtract,
                I::StoreVariable("y".to_string()),
            ]
        );
    }

    #[test]
    fn test_same_precedence_is_left_associative() {
        // a - b + c must compile as (a - b) + c
        assert_eq!(
            instructions("z = a - b + c"),
            vec![
                var("a"),
                var("b"),
                I::Subtract,
                var("c"),
                I::Add,
                I::StoreVariable("z".to_string()),
            ]
        );
    }

    #[test]
    fn test_unary_minus_binds_tighter_than_multiply() {
        assert_eq!(
            instructions("z = a * -b"),
            vec![
                var("a"),
                var("b"),
                I::Negate,
                I::Multiply,
                I::StoreVariable("z".to_string()),
            ]
        );
    }

    #[test]
    fn test_double_negate_stacks() {
        assert_eq!(
            instructions("z = --a"),
            vec![
                var("a"),
                I::Negate,
                I::Negate,
                I::StoreVariable("z".to_string()),
            ]
        );
    }

    #[test]
    fn test_parenthesized_group_negated() {
        assert_eq!(
            instructions("z = -(a + b) * 2"),
            vec![
                var("a"),
                var("b"),
                I::Add,
                I::Negate,
                I::PushLiteral(2.0),
                I::Multiply,
                I::StoreVariable("z".to_string()),
            ]
        );
    }

    #[test]
    fn test_call_arity_from_commas() {
        assert_eq!(
            instructions("s = sumproduct(a, b)"),
            vec![
                var("a"),
                var("b"),
                I::Call {
                    name: "sumproduct".to_string(),
                    arity: 2,
                },
                I::StoreVariable("s".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_calls_track_arity_independently() {
        assert_eq!(
            instructions("z = f(g(x), y)"),
            vec![
                var("x"),
                I::Call {
                    name: "g".to_string(),
                    arity: 1,
                },
                var("y"),
                I::Call {
                    name: "f".to_string(),
                    arity: 2,
                },
                I::StoreVariable("z".to_string()),
            ]
        );
    }

    #[test]
    fn test_call_argument_may_be_full_expression() {
        assert_eq!(
            instructions("z = f(a + b * c, 2)"),
            vec![
                var("a"),
                var("b"),
                var("c"),
                I::Multiply,
                I::Add,
                I::PushLiteral(2.0),
                I::Call {
                    name: "f".to_string(),
                    arity: 2,
                },
                I::StoreVariable("z".to_string()),
            ]
        );
    }

    #[test]
    fn test_target_is_not_expression_parsed() {
        // A call-shaped left-hand side is not a valid assignment target.
        assert_eq!(compile("f(x) = 1").unwrap_err(), ParseError::MissingAssign);
    }

    #[test]
    fn test_missing_target() {
        assert_eq!(compile("= 1").unwrap_err(), ParseError::MissingTarget);
        assert_eq!(compile("").unwrap_err(), ParseError::MissingTarget);
        assert_eq!(compile("2 = 1").unwrap_err(), ParseError::MissingTarget);
    }

    #[test]
    fn test_empty_expression() {
        assert_eq!(compile("z =").unwrap_err(), ParseError::EmptyExpression);
    }

    #[test]
    fn test_mismatched_close_paren() {
        assert_eq!(
            compile("z = a + 2)").unwrap_err(),
            ParseError::UnmatchedCloseParen
        );
    }

    #[test]
    fn test_unmatched_open_paren() {
        assert_eq!(
            compile("z = (a + 2").unwrap_err(),
            ParseError::UnmatchedOpenParen
        );
    }

    #[test]
    fn test_unterminated_call() {
        assert_eq!(
            compile("z = f(a + 2").unwrap_err(),
            ParseError::UnterminatedCall {
                name: "f".to_string()
            }
        );
    }

    #[test]
    fn test_empty_argument_list_rejected() {
        assert_eq!(
            compile("z = f()").unwrap_err(),
            ParseError::EmptyArgumentList {
                name: "f".to_string()
            }
        );
    }

    #[test]
    fn test_comma_outside_call() {
        assert_eq!(compile("z = 1, 2").unwrap_err(), ParseError::MisplacedComma);
    }

    #[test]
    fn test_comma_below_argument_list_level() {
        // Commas are only legal at the call's outermost nesting level.
        assert_eq!(
            compile("z = f((a, b))").unwrap_err(),
            ParseError::MisplacedComma
        );
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert!(matches!(
            compile("z = a b").unwrap_err(),
            ParseError::UnexpectedToken { .. }
        ));
        assert!(matches!(
            compile("z = 1 2").unwrap_err(),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_stray_assign_in_expression() {
        assert!(matches!(
            compile("z = a = b").unwrap_err(),
            ParseError::UnexpectedToken {
                token: Token::Assign,
                ..
            }
        ));
    }

    #[test]
    fn test_trailing_operator_rejected() {
        assert_eq!(compile("z = a +").unwrap_err(), ParseError::UnexpectedEof);
    }

    #[test]
    fn test_doubled_operator_rejected() {
        assert!(matches!(
            compile("z = a + * b").unwrap_err(),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_trailing_comma_in_call_rejected() {
        assert!(matches!(
            compile("z = f(a,)").unwrap_err(),
            ParseError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_unary_minus_inside_call_argument() {
        assert_eq!(
            instructions("z = f(-a, b)"),
            vec![
                var("a"),
                I::Negate,
                var("b"),
                I::Call {
                    name: "f".to_string(),
                    arity: 2,
                },
                I::StoreVariable("z".to_string()),
            ]
        );
    }
}
