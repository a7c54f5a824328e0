//! Comparisons: `__gt`, `__ge`, `__lt`, `__le`, `__eq`, `__ne`

use std::cmp::Ordering;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::broadcast::broadcast;
use crate::error::{EvalError, Result};
use crate::primitive::Operation;
use crate::resolve::{check_arity, check_operands, map_operands};
use crate::site::Site;
use crate::value::{extract_bool, NodeData, Value};

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `a > b`
    Gt,
    /// `a >= b`
    Ge,
    /// `a < b`
    Lt,
    /// `a <= b`
    Le,
    /// `a == b`
    Eq,
    /// `a != b`
    Ne,
}

impl CompareOp {
    /// Operator name as registered
    pub fn name(self) -> &'static str {
        match self {
            CompareOp::Gt => "__gt",
            CompareOp::Ge => "__ge",
            CompareOp::Lt => "__lt",
            CompareOp::Le => "__le",
            CompareOp::Eq => "__eq",
            CompareOp::Ne => "__ne",
        }
    }

    /// Test two comparable values.
    pub fn test<T: PartialOrd + ?Sized>(self, a: &T, b: &T) -> bool {
        match self {
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
        }
    }

    fn ordering(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Ge => ord != Ordering::Less,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Le => ord != Ordering::Greater,
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Ne => ord != Ordering::Equal,
        }
    }
}

/// Elementwise comparison producing a boolean array, or a float array of
/// `1.0`/`0.0` when the optional third operand is true.
#[derive(Debug, Clone, Copy)]
pub struct Comparison {
    op: CompareOp,
}

impl Comparison {
    /// Create the operation for `op`.
    pub fn new(op: CompareOp) -> Self {
        Self { op }
    }
}

impl Operation for Comparison {
    fn eval(&self, operands: Arc<[Value]>, args: Arc<[Value]>, site: Site) -> BoxFuture<'static, Result<Value>> {
        let op = self.op;
        async move {
            check_arity(&operands, 2, 3, &site)?;
            check_operands(&operands, &site)?;

            let mut values = map_operands(&operands, &args, &site).await?.into_iter();
            let (lhs, rhs) = match (values.next(), values.next()) {
                (Some(lhs), Some(rhs)) => (lhs, rhs),
                _ => return Err(EvalError::arity(&site, "comparison requires two operands")),
            };
            let as_float = match values.next() {
                Some(flag) => extract_bool(&flag, &site)?,
                None => false,
            };

            compare(op, lhs, rhs, as_float, &site)
        }
        .boxed()
    }
}

/// Nonzero integers become 1, so they line up with boolean arrays.
fn to_truth(data: &NodeData<i64>) -> NodeData<f64> {
    data.map(|x| if x != 0 { 1.0 } else { 0.0 })
}

/// Compare two resolved operands.
pub fn compare(op: CompareOp, lhs: Value, rhs: Value, as_float: bool, site: &Site) -> Result<Value> {
    let (l, r) = match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => return Ok(scalar_result(op.ordering(a.cmp(&b)), as_float)),
        (Value::String(a), Value::String(b)) => {
            return Ok(scalar_result(op.ordering(a.as_str().cmp(b.as_str())), as_float))
        }

        (Value::Float(a), Value::Float(b)) => (a, b),
        (Value::Float(a), Value::Int(b)) => (a, b.to_f64()),
        (Value::Int(a), Value::Float(b)) => (a.to_f64(), b),
        (Value::Int(a), Value::Int(b)) => (a.to_f64(), b.to_f64()),

        (Value::Mask(a), Value::Int(b)) => (a.to_f64(), to_truth(&b)),
        (Value::Int(a), Value::Mask(b)) => (to_truth(&a), b.to_f64()),

        (lhs, rhs) => return Err(EvalError::incompatible(site, op.name(), &lhs, &rhs)),
    };

    let flags = broadcast(l, r, |a, b| if op.test(&a, &b) { 1.0 } else { 0.0 }, site)?;
    if as_float {
        Ok(Value::Float(flags))
    } else {
        Ok(Value::Mask(flags.map(|x| u8::from(x != 0.0))))
    }
}

fn scalar_result(flag: bool, as_float: bool) -> Value {
    if as_float {
        Value::float(if flag { 1.0 } else { 0.0 })
    } else {
        Value::Mask(NodeData::scalar(u8::from(flag)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Site {
        Site::new("__gt", "")
    }

    #[test]
    fn test_int_float_mix() {
        let out = compare(
            CompareOp::Gt,
            Value::int_vector(vec![1, 5, 3]),
            Value::float(2.5),
            false,
            &site(),
        )
        .unwrap();
        assert_eq!(out, Value::mask(vec![false, true, true]));
    }

    #[test]
    fn test_float_output_flag() {
        let out = compare(CompareOp::Le, Value::float(1.0), Value::float(2.0), true, &site()).unwrap();
        assert_eq!(out, Value::float(1.0));
    }

    #[test]
    fn test_mask_against_int_uses_truth() {
        let out = compare(
            CompareOp::Eq,
            Value::mask(vec![true, false, true]),
            Value::int_vector(vec![7, 0, 0]),
            false,
            &site(),
        )
        .unwrap();
        assert_eq!(out, Value::mask(vec![true, true, false]));
    }

    #[test]
    fn test_mask_pairs_rejected() {
        for rhs in [Value::mask(vec![true]), Value::float(1.0)] {
            let err = compare(CompareOp::Gt, Value::mask(vec![true]), rhs, false, &site()).unwrap_err();
            assert!(matches!(err, EvalError::TypeMismatch { .. }));
        }
    }

    #[test]
    fn test_strings_and_bools() {
        assert_eq!(
            compare(CompareOp::Gt, Value::string("b"), Value::string("a"), false, &site()).unwrap(),
            Value::Mask(NodeData::scalar(1))
        );
        assert_eq!(
            compare(CompareOp::Ne, Value::Bool(true), Value::Bool(true), false, &site()).unwrap(),
            Value::Mask(NodeData::scalar(0))
        );
    }

    #[test]
    fn test_list_rejected() {
        let err = compare(CompareOp::Lt, Value::list(vec![]), Value::int(1), false, &site()).unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch { .. }));
    }
}
