//! Operand resolution
//!
//! Turns a primitive's static operands into ready values. Literals resolve
//! immediately to reference views; nested nodes are evaluated (spawned as
//! their own task on a multi-threaded runtime so siblings run in parallel).

use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::trace;

use crate::error::{EvalError, Result};
use crate::site::Site;
use crate::value::Value;

/// Resolve one operand to a value.
///
/// `args` are the call arguments of the enclosing evaluation and are passed
/// on to nested nodes unchanged.
pub fn value_operand(operand: &Value, args: &Arc<[Value]>, site: &Site) -> BoxFuture<'static, Result<Value>> {
    let handle = match operand {
        Value::Primitive(handle) => handle.clone(),
        literal => return future::ready(Ok(literal.share())).boxed(),
    };

    let pending = handle.invoke(Arc::clone(args));
    let site = site.clone();
    async move {
        let parallel = Handle::try_current()
            .map(|rt| rt.runtime_flavor() == RuntimeFlavor::MultiThread)
            .unwrap_or(false);
        if !parallel {
            return pending.await;
        }

        trace!(node = %site, operand = %handle.site(), "spawning operand");
        match tokio::spawn(pending).await {
            Ok(result) => result,
            Err(err) => Err(EvalError::TaskFailed {
                site,
                message: err.to_string(),
            }),
        }
    }
    .boxed()
}

/// Resolve a list of operands, preserving order, failing on the first error.
pub fn map_operands(operands: &[Value], args: &Arc<[Value]>, site: &Site) -> BoxFuture<'static, Result<Vec<Value>>> {
    let pending: Vec<_> = operands
        .iter()
        .map(|operand| value_operand(operand, args, site))
        .collect();
    future::try_join_all(pending).boxed()
}

/// Fail with `InvalidOperand` if any operand is `Nil`.
pub fn check_operands(operands: &[Value], site: &Site) -> Result<()> {
    match operands.iter().position(|v| !v.is_valid()) {
        Some(index) => Err(EvalError::invalid_operand(
            site,
            format!("operand {} is not initialized", index),
        )),
        None => Ok(()),
    }
}

/// Fail with `Arity` unless `min <= operands.len() <= max`.
pub fn check_arity(operands: &[Value], min: usize, max: usize, site: &Site) -> Result<()> {
    let n = operands.len();
    if n < min || n > max {
        let expected = if min == max {
            format!("exactly {}", min)
        } else if max == usize::MAX {
            format!("at least {}", min)
        } else {
            format!("between {} and {}", min, max)
        };
        return Err(EvalError::arity(
            site,
            format!("{} requires {} operands, got {}", site.name(), expected, n),
        ));
    }
    Ok(())
}
