pub mod error;
#[allow(clippy::module_inception)]
pub mod graph;
pub mod node;
pub mod processor;

pub use error::GraphError;
pub use graph::Graph;
pub use node::{Next, Node};
pub use processor::NodeProcessor;
