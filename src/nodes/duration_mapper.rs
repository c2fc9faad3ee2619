use crate::core::TraceSegment;
use crate::graph::{Next, NodeProcessor};
use crate::schema::segment::columns;
use crate::schema::{minute_bucket, FieldValue, Record, RecordSchema};
use anyhow::Result;
use std::sync::Arc;

/// Maps a trace segment to a schema-aligned duration record.
///
/// The record id follows the `timeBucket_segmentId` convention so that
/// re-reported segments land on the same identity key and get merged.
pub struct SegmentDurationMapper {
    schema: Arc<RecordSchema>,
}

impl SegmentDurationMapper {
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        Self { schema }
    }

    fn to_record(&self, segment: &TraceSegment) -> Result<Record> {
        let bucket = minute_bucket(segment.start_time);
        let id = format!("{}_{}", bucket, segment.segment_id);

        let mut record = self.schema.new_record();
        self.schema
            .set(&mut record, columns::ID, FieldValue::String(id))?;
        self.schema.set(
            &mut record,
            columns::SEGMENT_ID,
            FieldValue::String(segment.segment_id.clone()),
        )?;
        self.schema.set(
            &mut record,
            columns::APPLICATION_ID,
            FieldValue::Integer(segment.application_id),
        )?;
        self.schema.set(
            &mut record,
            columns::SERVICE_NAME,
            FieldValue::String(segment.service_name.clone()),
        )?;
        self.schema.set(
            &mut record,
            columns::DURATION,
            FieldValue::Long(segment.duration() as i64),
        )?;
        self.schema.set(
            &mut record,
            columns::START_TIME,
            FieldValue::Long(segment.start_time as i64),
        )?;
        self.schema.set(
            &mut record,
            columns::END_TIME,
            FieldValue::Long(segment.end_time as i64),
        )?;
        self.schema.set(
            &mut record,
            columns::IS_ERROR,
            FieldValue::Boolean(segment.is_error),
        )?;
        self.schema.set(
            &mut record,
            columns::TIME_BUCKET,
            FieldValue::Long(bucket),
        )?;
        Ok(record)
    }
}

impl NodeProcessor for SegmentDurationMapper {
    type Input = TraceSegment;
    type Output = Record;

    fn process(&self, input: &TraceSegment, next: &Next<Record>) -> Result<()> {
        let record = self.to_record(input)?;
        next.execute(&record)
    }
}
