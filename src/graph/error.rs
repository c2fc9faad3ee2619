use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    /// Structural mutation attempted after the graph was sealed
    #[error("graph '{graph}' is closed, no nodes can be added")]
    Closed { graph: String },
}
