//! Reference series/scalar backend.
//!
//! A small, self-contained [`Backend`] over a sum type of scalar and
//! vector-of-numbers ("series") values, intended for tests, examples, and as
//! a template for real hosts. Replace with your own value type to get real
//! time-series alignment semantics.
//!
//! Policy decisions made here, not by the core:
//!
//! - series ∘ series arithmetic is elementwise and requires equal lengths
//! - series ∘ scalar (either order) broadcasts the scalar
//! - division follows IEEE semantics, no special-casing
//! - one named function is accepted, `sumproduct(a, b)`, the Excel-style
//!   sum of elementwise products
//! - stored values keep the shape they were produced with; a scalar result
//!   is stored as a scalar, not coerced to a length-1 series

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::executor::{Backend, EvalError};
use crate::program::BinaryOp;

/// A series or scalar value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A single number.
    Scalar(f64),
    /// An ordered vector of numbers.
    Series(Vec<f64>),
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Value::Series(values)
    }
}

fn apply(op: BinaryOp, x: f64, y: f64) -> f64 {
    match op {
        BinaryOp::Add => x + y,
        BinaryOp::Subtract => x - y,
        BinaryOp::Multiply => x * y,
        BinaryOp::Divide => x / y,
    }
}

fn require_same_len(a: &[f64], b: &[f64]) -> Result<(), EvalError> {
    if a.len() != b.len() {
        return Err(EvalError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

/// Excel-style SUMPRODUCT over the four shape combinations.
fn sumproduct(a: &Value, b: &Value) -> Result<f64, EvalError> {
    match (a, b) {
        (Value::Series(xs), Value::Series(ys)) => {
            require_same_len(xs, ys)?;
            Ok(xs.iter().zip(ys).map(|(x, y)| x * y).sum())
        }
        (Value::Series(xs), Value::Scalar(y)) | (Value::Scalar(y), Value::Series(xs)) => {
            Ok(xs.iter().map(|x| x * y).sum())
        }
        (Value::Scalar(x), Value::Scalar(y)) => Ok(x * y),
    }
}

/// Variable environment and arithmetic for [`Value`].
///
/// Names are unique keys; insertion order is irrelevant and iteration is
/// deterministic. The store persists across program executions and is owned
/// entirely by the host.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    variables: BTreeMap<String, Value>,
}

impl SeriesStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a variable, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Looks up a variable.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if no variables are bound.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl Backend for SeriesStore {
    type Value = Value;

    fn load(&self, name: &str) -> Result<Value, EvalError> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnknownVariable {
                name: name.to_string(),
            })
    }

    fn store(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        self.variables.insert(name.to_string(), value);
        Ok(())
    }

    fn literal(&self, value: f64) -> Value {
        Value::Scalar(value)
    }

    fn negate(&self, value: Value) -> Result<Value, EvalError> {
        Ok(match value {
            Value::Scalar(x) => Value::Scalar(-x),
            Value::Series(xs) => Value::Series(xs.into_iter().map(|x| -x).collect()),
        })
    }

    fn binary(&self, op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
        Ok(match (lhs, rhs) {
            (Value::Scalar(x), Value::Scalar(y)) => Value::Scalar(apply(op, x, y)),
            (Value::Series(xs), Value::Scalar(y)) => {
                Value::Series(xs.into_iter().map(|x| apply(op, x, y)).collect())
            }
            (Value::Scalar(x), Value::Series(ys)) => {
                Value::Series(ys.into_iter().map(|y| apply(op, x, y)).collect())
            }
            (Value::Series(xs), Value::Series(ys)) => {
                require_same_len(&xs, &ys)?;
                Value::Series(xs.iter().zip(&ys).map(|(x, y)| apply(op, *x, *y)).collect())
            }
        })
    }

    fn call(&self, name: &str, args: Vec<Value>) -> Result<Value, EvalError> {
        match name {
            "sumproduct" => {
                if args.len() != 2 {
                    return Err(EvalError::WrongArity {
                        name: name.to_string(),
                        expected: 2,
                        found: args.len(),
                    });
                }
                Ok(Value::Scalar(sumproduct(&args[0], &args[1])?))
            }
            _ => Err(EvalError::UnknownFunction {
                name: name.to_string(),
            }),
        }
    }
}
