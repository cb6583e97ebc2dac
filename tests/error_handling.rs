//! Failure-mode coverage for the compile/execute pipeline.
//!
//! Checks that each malformed input is rejected at the stage the design
//! assigns it to (parse vs. evaluation), and that failures never leave
//! partial state in the backend store.

use series_expr::{compile, evaluate, Error, EvalError, ParseError, SeriesStore};

fn store_with_a() -> SeriesStore {
    let mut store = SeriesStore::new();
    store.insert("a", vec![1.0, 2.0, 3.0]);
    store
}

fn parse_err(source: &str) -> ParseError {
    match evaluate(source, &mut store_with_a()).unwrap_err() {
        Error::Parse(err) => err,
        Error::Eval(err) => panic!("expected parse error for {:?}, got eval: {}", source, err),
    }
}

fn eval_err(source: &str) -> EvalError {
    match evaluate(source, &mut store_with_a()).unwrap_err() {
        Error::Eval(err) => err,
        Error::Parse(err) => panic!("expected eval error for {:?}, got parse: {}", source, err),
    }
}

// =============================================================================
// Parse errors
// =============================================================================

#[test]
fn unknown_character() {
    assert_eq!(parse_err("z = a % 2"), ParseError::UnexpectedChar { ch: '%' });
}

#[test]
fn unterminated_backtick_identifier() {
    assert_eq!(parse_err("z = `total return"), ParseError::UnterminatedIdentifier);
}

#[test]
fn missing_assignment() {
    assert_eq!(parse_err("z a + 2"), ParseError::MissingAssign);
    assert_eq!(parse_err("= a"), ParseError::MissingTarget);
}

#[test]
fn empty_right_hand_side() {
    assert_eq!(parse_err("z ="), ParseError::EmptyExpression);
}

#[test]
fn mismatched_parentheses() {
    assert_eq!(parse_err("z = (a + 2"), ParseError::UnmatchedOpenParen);
    assert_eq!(parse_err("z = a + 2)"), ParseError::UnmatchedCloseParen);
}

#[test]
fn unterminated_function_call() {
    assert_eq!(
        parse_err("z = sumproduct(a, a"),
        ParseError::UnterminatedCall {
            name: "sumproduct".to_string()
        }
    );
}

#[test]
fn empty_argument_list() {
    assert_eq!(
        parse_err("z = f()"),
        ParseError::EmptyArgumentList {
            name: "f".to_string()
        }
    );
}

#[test]
fn comma_outside_function_call() {
    assert_eq!(parse_err("z = 1, 2"), ParseError::MisplacedComma);
}

#[test]
fn comma_inside_nested_group() {
    assert_eq!(parse_err("z = f((a, a))"), ParseError::MisplacedComma);
}

#[test]
fn trailing_garbage_after_expression() {
    assert!(matches!(
        parse_err("z = a 2"),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn stray_assign_inside_expression() {
    assert!(matches!(
        parse_err("z = a = 2"),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn dangling_operator_at_end() {
    assert_eq!(parse_err("z = a *"), ParseError::UnexpectedEof);
}

// =============================================================================
// Evaluation errors
// =============================================================================

#[test]
fn unknown_variable() {
    assert_eq!(
        eval_err("z = a + missing"),
        EvalError::UnknownVariable {
            name: "missing".to_string()
        }
    );
}

#[test]
fn unknown_function() {
    assert_eq!(
        eval_err("z = median(a)"),
        EvalError::UnknownFunction {
            name: "median".to_string()
        }
    );
}

#[test]
fn wrong_function_arity() {
    assert_eq!(
        eval_err("z = sumproduct(a, a, a)"),
        EvalError::WrongArity {
            name: "sumproduct".to_string(),
            expected: 2,
            found: 3,
        }
    );
}

#[test]
fn series_length_mismatch() {
    let mut store = store_with_a();
    store.insert("short", vec![1.0]);
    assert_eq!(
        evaluate("z = a + short", &mut store).unwrap_err(),
        Error::Eval(EvalError::LengthMismatch { left: 3, right: 1 })
    );
}

// =============================================================================
// Failure leaves no partial state
// =============================================================================

#[test]
fn failed_compile_touches_nothing() {
    let mut store = store_with_a();
    assert!(compile("z = (a + 2").is_err());
    assert_eq!(store.len(), 1);
    assert!(store.get("z").is_none());
}

#[test]
fn failed_execution_never_stores() {
    let mut store = store_with_a();
    assert!(evaluate("z = a + missing", &mut store).unwrap_err().to_string().contains("missing"));
    assert!(store.get("z").is_none());
    assert_eq!(store.len(), 1);
}
