//! User-defined callables: `lambda` and `call`

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::error::{type_name, EvalError, Result};
use crate::primitive::Operation;
use crate::resolve::{check_arity, map_operands, value_operand};
use crate::site::Site;
use crate::value::{extract_integer, Value};

/// A callable body: operands are `[arity, body]`.
///
/// Evaluating the lambda checks the argument count, then evaluates `body`
/// against the arguments it was called with.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lambda;

impl Operation for Lambda {
    fn eval(&self, operands: Arc<[Value]>, args: Arc<[Value]>, site: Site) -> BoxFuture<'static, Result<Value>> {
        async move {
            check_arity(&operands, 2, 2, &site)?;
            let arity = value_operand(&operands[0], &args, &site).await?;
            let arity = extract_integer(&arity, &site)?;
            if usize::try_from(arity).ok() != Some(args.len()) {
                return Err(EvalError::arity(
                    &site,
                    format!("expected {} arguments, got {}", arity, args.len()),
                ));
            }
            value_operand(&operands[1], &args, &site).await
        }
        .boxed()
    }
}

/// A call site: operand 0 is the callee, the rest are its arguments.
///
/// The callee itself is not evaluated; the arguments are, against the
/// caller's own arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Call;

impl Operation for Call {
    fn eval(&self, operands: Arc<[Value]>, args: Arc<[Value]>, site: Site) -> BoxFuture<'static, Result<Value>> {
        async move {
            check_arity(&operands, 1, usize::MAX, &site)?;
            let callee = match &operands[0] {
                Value::Primitive(handle) => handle.clone(),
                other => {
                    return Err(EvalError::type_mismatch(
                        &site,
                        format!("cannot call a `{}`", type_name(other)),
                    ))
                }
            };

            let call_args = map_operands(&operands[1..], &args, &site).await?;
            callee
                .invoke(call_args.into_iter().map(Value::into_shared).collect())
                .await
        }
        .boxed()
    }
}
