//! `file_read`

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::error::{EvalError, Result};
use crate::primitive::Operation;
use crate::resolve::{check_arity, check_operands, value_operand};
use crate::site::Site;
use crate::value::{extract_string, Value};

/// Read a UTF-8 file into a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRead;

impl Operation for FileRead {
    fn eval(&self, operands: Arc<[Value]>, args: Arc<[Value]>, site: Site) -> BoxFuture<'static, Result<Value>> {
        async move {
            check_arity(&operands, 1, 1, &site)?;
            check_operands(&operands, &site)?;
            let path = value_operand(&operands[0], &args, &site).await?;
            let path = extract_string(&path, &site)?;

            let contents = tokio::fs::read_to_string(path.as_str())
                .await
                .map_err(|err| EvalError::Io {
                    site: site.clone(),
                    message: format!("{}: {}", path, err),
                })?;
            Ok(Value::string(contents))
        }
        .boxed()
    }
}
