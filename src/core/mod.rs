pub mod segment;

pub use segment::{Span, TraceSegment};
