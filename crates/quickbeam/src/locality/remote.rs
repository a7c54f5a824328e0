//! Message-passing localities
//!
//! A remote locality is a task owning a table of installed nodes and a
//! request channel. Callers hold stubs that turn `invoke` into an `Eval`
//! message answered over a oneshot reply. Dropping the last handle to a
//! stub sends `Release`, and the locality forgets the node.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use super::{Invoke, LocalityId, PrimitiveHandle};
use crate::error::{EvalError, Result};
use crate::site::Site;
use crate::value::Value;

type NodeId = u64;

enum Request {
    Install {
        node: NodeId,
        primitive: PrimitiveHandle,
    },
    Eval {
        node: NodeId,
        args: Arc<[Value]>,
        reply: oneshot::Sender<Reply>,
    },
    Release {
        node: NodeId,
    },
    Shutdown,
}

enum Reply {
    Done(Result<Value>),
    UnknownNode,
}

fn unreachable(site: &Site, locality: LocalityId, message: &str) -> EvalError {
    EvalError::RemoteUnreachable {
        site: site.clone(),
        locality,
        message: message.to_string(),
    }
}

/// Handle to a locality served by its own task.
///
/// Cloning the handle is cheap; all clones talk to the same task.
#[derive(Clone)]
pub struct RemoteLocality {
    id: LocalityId,
    requests: mpsc::UnboundedSender<Request>,
    next_node: Arc<AtomicU64>,
}

impl RemoteLocality {
    /// Start serving a new locality on `runtime`.
    pub(crate) fn start(id: LocalityId, runtime: &Handle) -> Self {
        let (requests, inbox) = mpsc::unbounded_channel();
        runtime.spawn(serve(id, inbox));
        Self {
            id,
            requests,
            next_node: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The locality's id
    pub fn id(&self) -> LocalityId {
        self.id
    }

    /// Host `primitive` on this locality and return a handle that forwards
    /// every evaluation to it.
    pub fn install(&self, primitive: PrimitiveHandle) -> Result<PrimitiveHandle> {
        let node = self.next_node.fetch_add(1, Ordering::Relaxed);
        let site = primitive.site().clone();
        self.requests
            .send(Request::Install { node, primitive })
            .map_err(|_| unreachable(&site, self.id, "request channel closed"))?;
        trace!(locality = %self.id, node, site = %site, "installed");
        Ok(PrimitiveHandle::new(RemoteNode {
            node,
            site,
            locality: self.clone(),
        }))
    }

    /// Stop the locality. Queued and later requests fail with
    /// `RemoteUnreachable`; evaluations already running complete.
    pub fn shutdown(&self) {
        let _ = self.requests.send(Request::Shutdown);
    }

    /// Whether the serving task has gone away
    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }
}

impl fmt::Debug for RemoteLocality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteLocality")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

async fn serve(id: LocalityId, mut inbox: mpsc::UnboundedReceiver<Request>) {
    let mut nodes: HashMap<NodeId, PrimitiveHandle> = HashMap::new();
    debug!(locality = %id, "locality started");

    while let Some(request) = inbox.recv().await {
        match request {
            Request::Install { node, primitive } => {
                nodes.insert(node, primitive);
            }
            Request::Eval { node, args, reply } => match nodes.get(&node) {
                Some(primitive) => {
                    let pending = primitive.invoke(args);
                    tokio::spawn(async move {
                        // The caller may have given up; nothing to do then.
                        let _ = reply.send(Reply::Done(pending.await));
                    });
                }
                None => {
                    let _ = reply.send(Reply::UnknownNode);
                }
            },
            Request::Release { node } => {
                nodes.remove(&node);
                trace!(locality = %id, node, "released");
            }
            Request::Shutdown => break,
        }
    }

    debug!(locality = %id, live_nodes = nodes.len(), "locality stopped");
}

/// Caller-side stub for a node hosted on a remote locality.
struct RemoteNode {
    node: NodeId,
    site: Site,
    locality: RemoteLocality,
}

impl Invoke for RemoteNode {
    fn invoke(&self, args: Arc<[Value]>) -> BoxFuture<'static, Result<Value>> {
        let (reply, response) = oneshot::channel();
        let sent = self.locality.requests.send(Request::Eval {
            node: self.node,
            args,
            reply,
        });
        let locality = self.locality.id;
        let node = self.node;
        let site = self.site.clone();

        async move {
            if sent.is_err() {
                return Err(unreachable(&site, locality, "request channel closed"));
            }
            match response.await {
                Ok(Reply::Done(result)) => result,
                Ok(Reply::UnknownNode) => Err(EvalError::unbound(
                    &site,
                    format!("node {} on locality {}", node, locality),
                )),
                Err(_) => Err(unreachable(&site, locality, "reply dropped")),
            }
        }
        .boxed()
    }

    fn locality(&self) -> LocalityId {
        self.locality.id
    }

    fn site(&self) -> &Site {
        &self.site
    }
}

impl Drop for RemoteNode {
    fn drop(&mut self) {
        let _ = self.locality.requests.send(Request::Release { node: self.node });
    }
}
