use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One span inside a trace segment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Span {
    /// Span id, unique inside its segment
    pub span_id: i32,

    /// Parent span id, -1 for the entry span
    pub parent_span_id: i32,

    /// Logical operation, e.g. "/api/orders" or "mysql/query"
    pub operation_name: String,

    /// Start timestamp in milliseconds since epoch
    pub start_time: u64,

    /// End timestamp in milliseconds since epoch
    pub end_time: u64,

    /// Whether the span recorded an error
    pub is_error: bool,
}

/// Basic telemetry unit pushed through processing graphs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceSegment {
    /// Globally unique segment id
    pub segment_id: String,

    /// Id of the reporting application instance
    pub application_id: i32,

    /// Service the entry span belongs to
    pub service_name: String,

    /// Segment start timestamp in milliseconds since epoch
    pub start_time: u64,

    /// Segment end timestamp in milliseconds since epoch
    pub end_time: u64,

    /// Whether any span in the segment errored
    pub is_error: bool,

    /// Spans in reporting order
    pub spans: Vec<Span>,

    /// Side-channel information (agent version, sampling flags, etc)
    pub metadata: HashMap<String, String>,
}

impl TraceSegment {
    pub fn new(segment_id: impl Into<String>, application_id: i32) -> Self {
        Self {
            segment_id: segment_id.into(),
            application_id,
            service_name: String::new(),
            start_time: 0,
            end_time: 0,
            is_error: false,
            spans: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Wall-clock duration of the whole segment in milliseconds
    pub fn duration(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }
}
