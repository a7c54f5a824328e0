//! `make_list` and `len`

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::error::{type_name, EvalError, Result};
use crate::primitive::Operation;
use crate::resolve::{check_arity, check_operands, map_operands, value_operand};
use crate::site::Site;
use crate::value::{List, Shape, Value};

/// Collect every operand, in order, into a new list.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeList;

impl Operation for MakeList {
    fn eval(&self, operands: Arc<[Value]>, args: Arc<[Value]>, site: Site) -> BoxFuture<'static, Result<Value>> {
        async move {
            let items = map_operands(&operands, &args, &site).await?;
            Ok(Value::List(List::new(items)))
        }
        .boxed()
    }
}

/// Number of elements of a list, characters of a string, or leading
/// extent of an array.
#[derive(Debug, Clone, Copy, Default)]
pub struct Len;

impl Operation for Len {
    fn eval(&self, operands: Arc<[Value]>, args: Arc<[Value]>, site: Site) -> BoxFuture<'static, Result<Value>> {
        async move {
            check_arity(&operands, 1, 1, &site)?;
            check_operands(&operands, &site)?;
            let value = value_operand(&operands[0], &args, &site).await?;
            length(&value, &site).map(|n| Value::int(n as i64))
        }
        .boxed()
    }
}

/// Length of a resolved value.
pub fn length(value: &Value, site: &Site) -> Result<usize> {
    let leading = |shape: Shape| match shape {
        Shape::Scalar => Err(EvalError::invalid_operand(site, "a scalar has no length")),
        Shape::Vector(n) => Ok(n),
        Shape::Matrix { rows, .. } => Ok(rows),
    };

    match value {
        Value::List(list) => Ok(list.len()),
        Value::String(s) => Ok(s.chars().count()),
        Value::Float(d) => leading(d.shape()),
        Value::Int(d) => leading(d.shape()),
        Value::Mask(d) => leading(d.shape()),
        other => Err(EvalError::type_mismatch(
            site,
            format!("`{}` has no length", type_name(other)),
        )),
    }
}
