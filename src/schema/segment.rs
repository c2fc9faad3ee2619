use super::{ColumnType, MergePolicy, RecordSchema, SchemaError};

/// Column positions for the segment-duration record
pub mod columns {
    pub const ID: usize = 0;
    pub const SEGMENT_ID: usize = 1;
    pub const APPLICATION_ID: usize = 2;
    pub const SERVICE_NAME: usize = 3;
    pub const DURATION: usize = 4;
    pub const START_TIME: usize = 5;
    pub const END_TIME: usize = 6;
    pub const IS_ERROR: usize = 7;
    pub const TIME_BUCKET: usize = 8;
}

/// Schema for per-segment duration records.
///
/// The identity key and the time bucket are written once (`Keep`); the
/// measurement columns take the latest write (`Overwrite`).
pub fn segment_duration_schema() -> Result<RecordSchema, SchemaError> {
    RecordSchema::builder("segment_duration", 9)
        .column(columns::ID, "id", ColumnType::String, MergePolicy::Keep)
        .column(
            columns::SEGMENT_ID,
            "segment_id",
            ColumnType::String,
            MergePolicy::Overwrite,
        )
        .column(
            columns::APPLICATION_ID,
            "application_id",
            ColumnType::Integer,
            MergePolicy::Overwrite,
        )
        .column(
            columns::SERVICE_NAME,
            "service_name",
            ColumnType::String,
            MergePolicy::Overwrite,
        )
        .column(
            columns::DURATION,
            "duration",
            ColumnType::Long,
            MergePolicy::Overwrite,
        )
        .column(
            columns::START_TIME,
            "start_time",
            ColumnType::Long,
            MergePolicy::Overwrite,
        )
        .column(
            columns::END_TIME,
            "end_time",
            ColumnType::Long,
            MergePolicy::Overwrite,
        )
        .column(
            columns::IS_ERROR,
            "is_error",
            ColumnType::Boolean,
            MergePolicy::Overwrite,
        )
        .column(
            columns::TIME_BUCKET,
            "time_bucket",
            ColumnType::Long,
            MergePolicy::Keep,
        )
        .build()
}

/// Minute-resolution time bucket for a millisecond timestamp
pub fn minute_bucket(timestamp_ms: u64) -> i64 {
    (timestamp_ms / 60_000) as i64
}
