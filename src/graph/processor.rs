use super::Next;
use anyhow::Result;

/// Transformation bound to one graph node.
///
/// The processor alone decides how many times it invokes `next.execute`:
/// zero or once for a filter, exactly once for a map, several times for an
/// expand. Errors propagate synchronously up the call stack and abort the
/// remainder of the in-flight broadcast.
pub trait NodeProcessor: Send + Sync {
    type Input;
    type Output;

    fn process(&self, input: &Self::Input, next: &Next<Self::Output>) -> Result<()>;
}
