use crate::core::{Span, TraceSegment};
use crate::graph::{Next, NodeProcessor};
use anyhow::Result;

/// Decomposes a segment into its spans, forwarding each one downstream.
pub struct SpanExtractor;

impl NodeProcessor for SpanExtractor {
    type Input = TraceSegment;
    type Output = Span;

    fn process(&self, input: &TraceSegment, next: &Next<Span>) -> Result<()> {
        for span in &input.spans {
            next.execute(span)?;
        }
        Ok(())
    }
}
