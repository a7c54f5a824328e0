//! `variable` and `access-argument`

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::error::{EvalError, Result};
use crate::primitive::Operation;
use crate::resolve::{check_arity, value_operand};
use crate::site::Site;
use crate::value::{extract_integer, Value};

/// Holds a value; evaluating it hands out a reference view. `Nil` is a
/// legitimate value to hold, e.g. an axis meaning "all".
#[derive(Debug, Clone, Copy, Default)]
pub struct Variable;

impl Operation for Variable {
    fn eval(&self, operands: Arc<[Value]>, args: Arc<[Value]>, site: Site) -> BoxFuture<'static, Result<Value>> {
        async move {
            check_arity(&operands, 1, 1, &site)?;
            value_operand(&operands[0], &args, &site).await
        }
        .boxed()
    }
}

/// Reads one of the call arguments by position.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessArgument;

impl Operation for AccessArgument {
    fn eval(&self, operands: Arc<[Value]>, args: Arc<[Value]>, site: Site) -> BoxFuture<'static, Result<Value>> {
        async move {
            check_arity(&operands, 1, 1, &site)?;
            let index = value_operand(&operands[0], &args, &site).await?;
            let index = extract_integer(&index, &site)?;

            usize::try_from(index)
                .ok()
                .and_then(|i| args.get(i))
                .map(Value::share)
                .ok_or_else(|| {
                    EvalError::unbound(&site, format!("argument {} of {}", index, args.len()))
                })
        }
        .boxed()
    }
}
