use super::{GraphError, Node, NodeProcessor};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// State shared between a graph handle and every node it owns.
pub(crate) struct GraphState {
    name: String,
    /// Serializes structural mutation (node creation and chaining). Never
    /// taken on the execution path.
    mutation: Mutex<()>,
    closed: AtomicBool,
    next_id: AtomicUsize,
    /// Ids of every node ever created under this graph, insertion order
    registry: Mutex<Vec<usize>>,
}

impl GraphState {
    pub(crate) fn structural_lock(&self) -> MutexGuard<'_, ()> {
        self.mutation.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Allocate an id for a new node and record it in the registry.
    /// Fails once the graph has been closed.
    pub(crate) fn register_node(&self) -> Result<usize, GraphError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(GraphError::Closed {
                graph: self.name.clone(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry.push(id);
        Ok(id)
    }
}

/// Owning registry for one pipeline's nodes.
///
/// A graph is built once during a module's setup phase by chaining nodes, then
/// sealed with [`Graph::close`] before runtime traffic starts. Execution never
/// takes the structural-mutation lock, so processors must tolerate concurrent
/// invocation if the surrounding system pushes from multiple threads.
pub struct Graph {
    state: Arc<GraphState>,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            state: Arc::new(GraphState {
                name: name.into(),
                mutation: Mutex::new(()),
                closed: AtomicBool::new(false),
                next_id: AtomicUsize::new(0),
                registry: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Register an entry-point node wrapping `processor`.
    pub fn create_node<P>(&self, processor: P) -> Result<Arc<Node<P>>, GraphError>
    where
        P: NodeProcessor,
    {
        let _guard = self.state.structural_lock();
        let node = Node::create(Arc::clone(&self.state), processor)?;
        debug!(graph = %self.state.name, node = node.id(), "registered entry node");
        Ok(node)
    }

    /// Seal the graph: all later `create_node`/`add_next` calls fail with
    /// [`GraphError::Closed`]. Call at the end of the setup phase, before
    /// runtime traffic is pushed in.
    pub fn close(&self) {
        self.state.closed.store(true, Ordering::Release);
        debug!(graph = %self.state.name, nodes = self.node_count(), "graph closed");
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::Acquire)
    }

    /// Number of nodes ever created under this graph
    pub fn node_count(&self) -> usize {
        self.state
            .registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}
