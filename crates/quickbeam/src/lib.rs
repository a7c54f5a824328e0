//! # Quickbeam
//!
//! An asynchronous dataflow engine for array expressions.
//!
//! A compiler turns source expressions into a tree of *primitives*. Each
//! primitive resolves its operands (literals, call arguments or other
//! primitives, possibly on another locality), waits for all of them, and
//! runs a synchronous kernel over the results. Binary numeric operators
//! share a single rank-polymorphic broadcasting engine.
//!
//! ## Architecture
//!
//! - **Values**: tagged union with owned/shared array storage
//! - **Broadcasting**: shape rules, nine 2-D kernels, in-place reuse of owned buffers
//! - **Primitives**: the eval contract, operand resolution, instrumentation
//! - **Localities**: location-transparent handles, message-passing remote nodes
//! - **Engine**: tokio runtime, pattern registry, counters

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod broadcast;
pub mod config;
pub mod counters;
pub mod engine;
pub mod error;
pub mod locality;
pub mod ops;
pub mod primitive;
pub mod registry;
pub mod resolve;
pub mod site;
pub mod value;

// Re-export main types
pub use broadcast::broadcast;
pub use config::EngineConfig;
pub use counters::{node_data_counts, CounterRegistry, NodeDataCounts, PrimitiveCounts};
pub use engine::Engine;
pub use error::{type_name, EvalError, Result};
pub use locality::{Invoke, LocalityId, PrimitiveHandle, RemoteLocality};
pub use primitive::{Operation, Primitive};
pub use registry::{MatchPattern, PatternRegistry};
pub use resolve::{map_operands, value_operand};
pub use site::Site;
pub use value::{Buffer, Element, List, NodeData, Shape, Value};

/// Quickbeam version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
