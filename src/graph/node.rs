use super::graph::GraphState;
use super::{GraphError, NodeProcessor};
use anyhow::Result;
use std::sync::{Arc, RwLock};

/// Type-erased entry for a downstream node: the input type stays checked,
/// the node's own output type is hidden behind the trait object.
pub(crate) trait NodeInput<I>: Send + Sync {
    fn execute(&self, input: &I) -> Result<()>;
}

/// Broadcast fan-out container owned by exactly one node.
///
/// Downstream nodes are appended during graph construction and never removed.
/// `execute` delivers a value to every downstream node in registration order,
/// synchronously, on the calling thread.
pub struct Next<O> {
    nodes: RwLock<Vec<Arc<dyn NodeInput<O>>>>,
}

impl<O> Next<O> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn add_node(&self, node: Arc<dyn NodeInput<O>>) {
        let mut nodes = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        nodes.push(node);
    }

    /// Number of downstream nodes registered so far
    pub fn len(&self) -> usize {
        self.nodes.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Broadcast a produced value to all downstream nodes in registration
    /// order. The first downstream failure aborts the remainder of the
    /// broadcast and propagates to the caller.
    pub fn execute(&self, value: &O) -> Result<()> {
        let nodes = self.nodes.read().unwrap_or_else(|e| e.into_inner());
        for node in nodes.iter() {
            node.execute(value)?;
        }
        Ok(())
    }
}

/// One stage in a processing chain: a processor bound to its broadcast set.
///
/// Nodes are created only through [`Graph::create_node`](super::Graph::create_node)
/// or [`Node::add_next`], which keeps every node registered with its owning
/// graph. Chaining is statically typed: `add_next` only accepts a processor
/// whose `Input` equals this node's `Output`.
pub struct Node<P: NodeProcessor> {
    id: usize,
    processor: P,
    next: Next<P::Output>,
    graph: Arc<GraphState>,
}

impl<P: NodeProcessor> std::fmt::Debug for Node<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node").field("id", &self.id).finish()
    }
}

impl<P: NodeProcessor> Node<P> {
    pub(crate) fn create(graph: Arc<GraphState>, processor: P) -> Result<Arc<Self>, GraphError> {
        let id = graph.register_node()?;
        Ok(Arc::new(Self {
            id,
            processor,
            next: Next::new(),
            graph,
        }))
    }

    /// Graph-unique id assigned at registration time
    pub fn id(&self) -> usize {
        self.id
    }

    /// Chain a downstream processor onto this node.
    ///
    /// Takes the owning graph's structural-mutation lock, registers the new
    /// node with the graph, appends it to this node's broadcast set and
    /// returns it, so chains can be built fluently:
    /// `a.add_next(p1)?.add_next(p2)?`.
    pub fn add_next<Q>(&self, processor: Q) -> Result<Arc<Node<Q>>, GraphError>
    where
        Q: NodeProcessor<Input = P::Output> + 'static,
        Q::Output: 'static,
        P::Output: 'static,
    {
        let _guard = self.graph.structural_lock();
        let node = Node::create(Arc::clone(&self.graph), processor)?;
        self.next.add_node(node.clone());
        Ok(node)
    }

    /// Push one input value into this node.
    ///
    /// Runs the bound processor synchronously; any downstream emission
    /// happens as nested calls on the current stack before this returns.
    pub fn execute(&self, input: &P::Input) -> Result<()> {
        self.processor.process(input, &self.next)
    }
}

impl<P: NodeProcessor> NodeInput<P::Input> for Node<P> {
    fn execute(&self, input: &P::Input) -> Result<()> {
        self.processor.process(input, &self.next)
    }
}
