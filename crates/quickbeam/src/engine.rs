//! The engine: runtime, registry and counters in one place

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::config::EngineConfig;
use crate::counters::CounterRegistry;
use crate::error::{EvalError, Result};
use crate::locality::{LocalityId, PrimitiveHandle, RemoteLocality};
use crate::primitive::Primitive;
use crate::registry::PatternRegistry;
use crate::resolve::value_operand;
use crate::site::Site;
use crate::value::Value;

/// Builds primitive trees and evaluates them on its own runtime.
///
/// ```
/// use quickbeam::{Engine, EngineConfig, Value};
///
/// let engine = Engine::new(EngineConfig::default()).unwrap();
/// let sum = engine
///     .create("__add", vec![Value::int(2), Value::float(0.5)], "doc(1, 1)")
///     .unwrap();
/// assert_eq!(engine.run(&sum, vec![]).unwrap(), Value::float(2.5));
/// ```
pub struct Engine {
    runtime: Runtime,
    registry: Arc<PatternRegistry>,
    counters: Arc<CounterRegistry>,
    config: EngineConfig,
    home: LocalityId,
    next_locality: AtomicU32,
}

impl Engine {
    /// Create an engine with the built-in operators.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_registry(config, Arc::new(PatternRegistry::builtin()))
    }

    /// Create an engine with a caller-supplied registry.
    pub fn with_registry(config: EngineConfig, registry: Arc<PatternRegistry>) -> Result<Self> {
        config.validate()?;
        let mut builder = Builder::new_multi_thread();
        builder.enable_all().thread_name(config.thread_name.clone());
        if let Some(threads) = config.worker_threads {
            builder.worker_threads(threads);
        }
        let runtime = builder
            .build()
            .map_err(|err| EvalError::Runtime(err.to_string()))?;

        debug!(
            worker_threads = ?config.worker_threads,
            patterns = registry.len(),
            "engine started"
        );

        Ok(Self {
            runtime,
            registry,
            counters: Arc::new(CounterRegistry::new()),
            config,
            home: LocalityId::ROOT,
            next_locality: AtomicU32::new(LocalityId::ROOT.0 + 1),
        })
    }

    /// The operator registry
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Per-primitive evaluation counters
    pub fn counters(&self) -> &CounterRegistry {
        &self.counters
    }

    /// The engine's configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The locality [`create`](Engine::create) places primitives on
    pub fn home(&self) -> LocalityId {
        self.home
    }

    fn build(&self, name: &str, operands: Vec<Value>, codename: &str, locality: LocalityId) -> Result<Primitive> {
        let pattern = self.registry.lookup(name).map_err(|_| {
            EvalError::unbound(&Site::new(name, codename), format!("pattern `{}`", name))
        })?;
        let (site, counters) = self.counters.register(Site::new(name, codename));
        let primitive = Primitive::new(site, operands, pattern.create(), locality);
        Ok(if self.config.instrument {
            primitive.with_counters(counters)
        } else {
            primitive
        })
    }

    /// Create a primitive on the home locality.
    pub fn create(&self, name: &str, operands: Vec<Value>, codename: &str) -> Result<Value> {
        let primitive = self.build(name, operands, codename, self.home)?;
        Ok(Value::Primitive(PrimitiveHandle::new(primitive)))
    }

    /// Start a new message-passing locality served on this engine's runtime.
    pub fn spawn_locality(&self) -> RemoteLocality {
        let id = LocalityId(self.next_locality.fetch_add(1, Ordering::Relaxed));
        RemoteLocality::start(id, self.runtime.handle())
    }

    /// Create a primitive hosted on `locality`. The returned handle is
    /// interchangeable with a local one.
    pub fn create_on(&self, locality: &RemoteLocality, name: &str, operands: Vec<Value>, codename: &str) -> Result<Value> {
        let primitive = self.build(name, operands, codename, locality.id())?;
        let handle = locality.install(PrimitiveHandle::new(primitive))?;
        Ok(Value::Primitive(handle))
    }

    /// Evaluate `value` on the engine's runtime.
    ///
    /// The returned future can be awaited from any executor.
    pub fn evaluate(&self, value: &Value, args: Vec<Value>) -> impl Future<Output = Result<Value>> + Send + 'static {
        let site = match value {
            Value::Primitive(handle) => handle.site().clone(),
            _ => Site::new("evaluate", ""),
        };
        let args: Arc<[Value]> = args.into_iter().map(Value::into_shared).collect();
        let task = self.runtime.spawn(value_operand(value, &args, &site));
        async move {
            task.await.map_err(|err| EvalError::TaskFailed {
                site,
                message: err.to_string(),
            })?
        }
    }

    /// Evaluate `value` and wait for the result.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime.
    pub fn run(&self, value: &Value, args: Vec<Value>) -> Result<Value> {
        self.runtime.block_on(self.evaluate(value, args))
    }
}
