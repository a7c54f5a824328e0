//! Variadic arithmetic: `__add`, `__sub`, `__mul`, `__div`

use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use crate::broadcast::broadcast;
use crate::error::{EvalError, Result};
use crate::primitive::Operation;
use crate::resolve::{check_arity, check_operands, map_operands, value_operand};
use crate::site::Site;
use crate::value::{extract_numeric, List, Value};

/// Elementwise arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    /// `a + b`, also list concatenation
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
}

impl ArithmeticOp {
    /// Operator name as registered
    pub fn name(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "__add",
            ArithmeticOp::Sub => "__sub",
            ArithmeticOp::Mul => "__mul",
            ArithmeticOp::Div => "__div",
        }
    }

    /// Apply to one pair of elements.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            ArithmeticOp::Add => a + b,
            ArithmeticOp::Sub => a - b,
            ArithmeticOp::Mul => a * b,
            ArithmeticOp::Div => a / b,
        }
    }
}

/// Left fold of two or more operands through the broadcasting engine.
#[derive(Debug, Clone, Copy)]
pub struct Arithmetic {
    op: ArithmeticOp,
}

impl Arithmetic {
    /// Create the operation for `op`.
    pub fn new(op: ArithmeticOp) -> Self {
        Self { op }
    }
}

impl Operation for Arithmetic {
    fn eval(&self, operands: Arc<[Value]>, args: Arc<[Value]>, site: Site) -> BoxFuture<'static, Result<Value>> {
        let op = self.op;
        async move {
            check_arity(&operands, 2, usize::MAX, &site)?;
            check_operands(&operands, &site)?;

            let values = if operands.len() == 2 {
                let (lhs, rhs) = future::try_join(
                    value_operand(&operands[0], &args, &site),
                    value_operand(&operands[1], &args, &site),
                )
                .await?;
                vec![lhs, rhs]
            } else {
                map_operands(&operands, &args, &site).await?
            };

            fold(op, values, &site)
        }
        .boxed()
    }
}

/// Combine resolved operands left to right.
///
/// A `List` first operand to `__add` switches to list concatenation. For
/// numbers the accumulator is owned after the first step, so later steps
/// write into it whenever the shapes agree.
pub fn fold(op: ArithmeticOp, values: Vec<Value>, site: &Site) -> Result<Value> {
    let mut values = values.into_iter();
    let first = values
        .next()
        .ok_or_else(|| EvalError::arity(site, format!("{} requires operands", op.name())))?;

    if let Value::List(list) = first {
        if op != ArithmeticOp::Add {
            let rhs = values.next().unwrap_or(Value::Nil);
            return Err(EvalError::incompatible(site, op.name(), &Value::List(list), &rhs));
        }
        let joined = values.fold(list, List::append);
        return Ok(Value::List(joined));
    }

    let mut acc = extract_numeric(first, site)?;
    for value in values {
        if matches!(value, Value::List(_)) {
            return Err(EvalError::incompatible(site, op.name(), &Value::Float(acc), &value));
        }
        let rhs = extract_numeric(value, site)?;
        acc = broadcast(acc, rhs, |a, b| op.apply(a, b), site)?;
    }
    Ok(Value::Float(acc))
}
