//! Engine configuration

use serde::Deserialize;

use crate::error::{EvalError, Result};

/// Configuration for an [`Engine`](crate::Engine).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use quickbeam::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{ "worker_threads": 2 }"#).unwrap();
/// assert_eq!(config.worker_threads, Some(2));
/// assert!(config.instrument);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Runtime worker threads; `None` lets tokio pick
    pub worker_threads: Option<usize>,

    /// Name given to runtime worker threads
    pub thread_name: String,

    /// Whether primitives record evaluation counts and times
    pub instrument: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name: "quickbeam-worker".to_string(),
            instrument: true,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with a fixed number of worker threads.
    pub fn with_worker_threads(threads: usize) -> Self {
        Self {
            worker_threads: Some(threads),
            ..Default::default()
        }
    }

    /// Turn per-primitive instrumentation on or off (builder pattern).
    pub fn instrument(mut self, enabled: bool) -> Self {
        self.instrument = enabled;
        self
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| EvalError::Runtime(format!("invalid engine config: {}", err)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings the runtime builder would otherwise panic on.
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == Some(0) {
            return Err(EvalError::Runtime(
                "invalid engine config: worker_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
