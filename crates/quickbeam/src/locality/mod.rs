//! Location-transparent primitive references
//!
//! A [`PrimitiveHandle`] is what a parent node holds for each child. Behind
//! it sits either a local [`Primitive`](crate::primitive::Primitive) or a
//! stub forwarding to a node hosted by a [`RemoteLocality`]. Both implement
//! [`Invoke`], and nothing upstream can tell which one it got.

mod remote;

pub use remote::RemoteLocality;

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::Result;
use crate::site::Site;
use crate::value::Value;

/// Identifies a locality (an execution domain hosting primitives).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalityId(pub u32);

impl LocalityId {
    /// The locality an engine runs its own primitives on
    pub const ROOT: LocalityId = LocalityId(0);
}

impl fmt::Display for LocalityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything that can be evaluated as a primitive node.
pub trait Invoke: Send + Sync {
    /// Evaluate the node against a set of call arguments.
    fn invoke(&self, args: Arc<[Value]>) -> BoxFuture<'static, Result<Value>>;

    /// The locality hosting the node
    fn locality(&self) -> LocalityId;

    /// The node's diagnostic label
    fn site(&self) -> &Site;
}

/// Shared, cloneable reference to a primitive node, local or remote.
#[derive(Clone)]
pub struct PrimitiveHandle(Arc<dyn Invoke>);

impl PrimitiveHandle {
    /// Wrap a node.
    pub fn new(node: impl Invoke + 'static) -> Self {
        Self(Arc::new(node))
    }

    /// Evaluate the referenced node.
    pub fn invoke(&self, args: Arc<[Value]>) -> BoxFuture<'static, Result<Value>> {
        self.0.invoke(args)
    }

    /// Evaluate the referenced node with owned arguments.
    pub fn eval(&self, args: Vec<Value>) -> BoxFuture<'static, Result<Value>> {
        self.invoke(args.into_iter().map(Value::into_shared).collect())
    }

    /// The node's diagnostic label
    pub fn site(&self) -> &Site {
        self.0.site()
    }

    /// The locality hosting the node
    pub fn locality(&self) -> LocalityId {
        self.0.locality()
    }

    /// Whether two handles refer to the same node
    pub fn ptr_eq(&self, other: &PrimitiveHandle) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for PrimitiveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveHandle")
            .field("site", &self.site().to_string())
            .field("locality", &self.locality())
            .finish()
    }
}
