pub mod column;
pub mod define;
pub mod record;
pub mod segment;

pub use column::{ColumnDefine, ColumnType, MergePolicy};
pub use define::{RecordSchema, SchemaBuilder, SchemaError};
pub use record::{FieldValue, Record};
pub use segment::{minute_bucket, segment_duration_schema};
