//! Primitive nodes and the evaluation contract

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, trace};

use crate::counters::PrimitiveCounters;
use crate::error::Result;
use crate::locality::{Invoke, LocalityId};
use crate::site::Site;
use crate::value::Value;

/// The computation a primitive runs.
///
/// Implementations receive the node's operands (unresolved, so they decide
/// what to evaluate and when) and the call arguments of this evaluation.
pub trait Operation: Send + Sync {
    /// Produce the node's value.
    fn eval(&self, operands: Arc<[Value]>, args: Arc<[Value]>, site: Site) -> BoxFuture<'static, Result<Value>>;
}

/// A node in a primitive tree.
///
/// Immutable once built. Literal operands are converted to shared storage
/// up front, so every evaluation hands out reference views instead of
/// copies.
pub struct Primitive {
    site: Site,
    operands: Arc<[Value]>,
    operation: Arc<dyn Operation>,
    locality: LocalityId,
    counters: Option<Arc<PrimitiveCounters>>,
}

impl Primitive {
    /// Create a node on `locality`.
    pub fn new(site: Site, operands: Vec<Value>, operation: Arc<dyn Operation>, locality: LocalityId) -> Self {
        Self {
            site,
            operands: operands.into_iter().map(Value::into_shared).collect(),
            operation,
            locality,
            counters: None,
        }
    }

    /// Attach evaluation counters (builder pattern).
    pub fn with_counters(mut self, counters: Arc<PrimitiveCounters>) -> Self {
        self.counters = Some(counters);
        self
    }

    /// The static operands
    pub fn operands(&self) -> &[Value] {
        &self.operands
    }

    /// Evaluate this node.
    ///
    /// A node without static operands evaluates against `args` as its
    /// operand list, and its operands then see no call arguments.
    pub fn eval(&self, args: Vec<Value>) -> BoxFuture<'static, Result<Value>> {
        self.eval_shared(args.into_iter().map(Value::into_shared).collect())
    }

    fn eval_shared(&self, args: Arc<[Value]>) -> BoxFuture<'static, Result<Value>> {
        let (operands, args): (Arc<[Value]>, Arc<[Value]>) = if self.operands.is_empty() {
            (args, Arc::from(Vec::new()))
        } else {
            (Arc::clone(&self.operands), args)
        };
        let pending = self.operation.eval(operands, args, self.site.clone());
        let site = self.site.clone();
        let counters = self.counters.clone();

        async move {
            trace!(node = %site, "evaluating");
            let started = Instant::now();
            let result = pending.await;
            if let Some(counters) = counters {
                counters.record(started.elapsed());
            }
            if let Err(err) = &result {
                debug!(node = %site, error = %err, "evaluation failed");
            }
            result
        }
        .boxed()
    }
}

impl Invoke for Primitive {
    fn invoke(&self, args: Arc<[Value]>) -> BoxFuture<'static, Result<Value>> {
        self.eval_shared(args)
    }

    fn locality(&self) -> LocalityId {
        self.locality
    }

    fn site(&self) -> &Site {
        &self.site
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitive")
            .field("site", &self.site.to_string())
            .field("operands", &self.operands)
            .field("locality", &self.locality)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future;

    struct Echo;

    impl Operation for Echo {
        fn eval(&self, operands: Arc<[Value]>, _args: Arc<[Value]>, _site: Site) -> BoxFuture<'static, Result<Value>> {
            future::ready(Ok(Value::list(operands.to_vec()))).boxed()
        }
    }

    struct EchoArgs;

    impl Operation for EchoArgs {
        fn eval(&self, _operands: Arc<[Value]>, args: Arc<[Value]>, _site: Site) -> BoxFuture<'static, Result<Value>> {
            future::ready(Ok(Value::list(args.to_vec()))).boxed()
        }
    }

    #[test]
    fn test_literals_stored_shared() {
        let node = Primitive::new(
            Site::new("echo", ""),
            vec![Value::vector(vec![1.0])],
            Arc::new(Echo),
            LocalityId::ROOT,
        );
        assert!(node.operands()[0].is_ref());
    }

    #[test]
    fn test_zero_operands_use_args() {
        let node = Primitive::new(Site::new("echo", ""), vec![], Arc::new(Echo), LocalityId::ROOT);
        let out = futures::executor::block_on(node.eval(vec![Value::int(7)])).unwrap();
        assert_eq!(out, Value::list(vec![Value::int(7)]));
    }

    #[test]
    fn test_zero_operands_pass_no_args_down() {
        let bare = Primitive::new(Site::new("args", ""), vec![], Arc::new(EchoArgs), LocalityId::ROOT);
        let out = futures::executor::block_on(bare.eval(vec![Value::int(7)])).unwrap();
        assert_eq!(out, Value::list(vec![]));

        let bound = Primitive::new(Site::new("args", ""), vec![Value::Nil], Arc::new(EchoArgs), LocalityId::ROOT);
        let out = futures::executor::block_on(bound.eval(vec![Value::int(7)])).unwrap();
        assert_eq!(out, Value::list(vec![Value::int(7)]));
    }

    #[test]
    fn test_counters_record_each_evaluation() {
        let counters = Arc::new(PrimitiveCounters::default());
        let node = Primitive::new(Site::new("echo", ""), vec![Value::Nil], Arc::new(Echo), LocalityId::ROOT)
            .with_counters(Arc::clone(&counters));
        futures::executor::block_on(node.eval(vec![])).unwrap();
        futures::executor::block_on(node.eval(vec![])).unwrap();
        assert_eq!(counters.eval_count(), 2);
    }
}
