use crate::core::TraceSegment;
use crate::graph::{Next, NodeProcessor};
use anyhow::Result;

/// Forwards only segments whose duration reaches a threshold.
pub struct MinDurationFilter {
    threshold_ms: u64,
}

impl MinDurationFilter {
    pub fn new(threshold_ms: u64) -> Self {
        Self { threshold_ms }
    }
}

impl NodeProcessor for MinDurationFilter {
    type Input = TraceSegment;
    type Output = TraceSegment;

    fn process(&self, input: &TraceSegment, next: &Next<TraceSegment>) -> Result<()> {
        if input.duration() >= self.threshold_ms {
            next.execute(input)?;
        }
        Ok(())
    }
}
