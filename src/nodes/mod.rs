pub mod duration_mapper;
pub mod merge_sink;
pub mod min_duration_filter;
pub mod span_extractor;

pub use duration_mapper::SegmentDurationMapper;
pub use merge_sink::{RecordMergeSink, RecordStore};
pub use min_duration_filter::MinDurationFilter;
pub use span_extractor::SpanExtractor;
