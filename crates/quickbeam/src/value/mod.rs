//! Value representation for primitive operands and results

mod buffer;
mod display;
mod impls;
mod list;
mod node_data;

pub use buffer::Buffer;
pub use impls::{extract_bool, extract_integer, extract_numeric, extract_string};
pub use list::List;
pub use node_data::{Element, NodeData, Shape};

use std::sync::Arc;

use crate::locality::PrimitiveHandle;

/// A primitive operand or result.
///
/// Arrays carry their own owned/shared storage, so passing a `Value` on
/// to another primitive never implies a copy unless someone wants to
/// mutate it.
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Scalars
    // ═══════════════════════════════════════════════════════════════════
    /// No value
    Nil,

    /// Scalar boolean
    Bool(bool),

    // ═══════════════════════════════════════════════════════════════════
    // Arrays (rank 0 to 2)
    // ═══════════════════════════════════════════════════════════════════
    /// 64-bit integer array; scalar integers are rank 0
    Int(NodeData<i64>),

    /// 64-bit floating point array
    Float(NodeData<f64>),

    /// Boolean array produced by comparisons, 1 or 0 per element
    Mask(NodeData<u8>),

    // ═══════════════════════════════════════════════════════════════════
    // Heap-allocated
    // ═══════════════════════════════════════════════════════════════════
    /// Text
    String(Arc<String>),

    /// Ordered sequence of values
    List(List),

    /// Unevaluated source fragment, opaque to the engine
    Expression(Arc<String>),

    // ═══════════════════════════════════════════════════════════════════
    // Nodes
    // ═══════════════════════════════════════════════════════════════════
    /// Reference to another primitive, local or remote
    Primitive(PrimitiveHandle),
}
