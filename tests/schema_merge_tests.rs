use telegraph::schema::{
    ColumnType, FieldValue, MergePolicy, Record, RecordSchema, SchemaError,
};

fn key_value_schema() -> RecordSchema {
    RecordSchema::builder("kv", 2)
        .column(0, "key", ColumnType::String, MergePolicy::Keep)
        .column(1, "value", ColumnType::Long, MergePolicy::Overwrite)
        .build()
        .unwrap()
}

fn kv_record(schema: &RecordSchema, key: &str, value: i64) -> Record {
    let mut record = schema.new_record();
    schema
        .set(&mut record, 0, FieldValue::String(key.to_string()))
        .unwrap();
    schema.set(&mut record, 1, FieldValue::Long(value)).unwrap();
    record
}

#[test]
fn overwrite_column_takes_latest_write() {
    let schema = key_value_schema();
    let mut stored = kv_record(&schema, "1", 10);
    let incoming = kv_record(&schema, "1", 20);

    schema.merge(&mut stored, incoming).unwrap();

    assert_eq!(stored.get(0), Some(&FieldValue::String("1".to_string())));
    assert_eq!(stored.get(1), Some(&FieldValue::Long(20)));
}

#[test]
fn keep_column_retains_first_write() {
    let schema = key_value_schema();
    let mut stored = kv_record(&schema, "1", 10);
    let incoming = kv_record(&schema, "2", 30);

    schema.merge(&mut stored, incoming).unwrap();

    // Key carries Keep: the stored value survives a conflicting write
    assert_eq!(stored.get(0), Some(&FieldValue::String("1".to_string())));
    assert_eq!(stored.get(1), Some(&FieldValue::Long(30)));
}

#[test]
fn keep_column_fills_an_unset_slot() {
    let schema = key_value_schema();
    let mut stored = schema.new_record();
    schema
        .set(&mut stored, 1, FieldValue::Long(5))
        .unwrap();

    let incoming = kv_record(&schema, "7", 9);
    schema.merge(&mut stored, incoming).unwrap();

    assert_eq!(stored.get(0), Some(&FieldValue::String("7".to_string())));
    assert_eq!(stored.get(1), Some(&FieldValue::Long(9)));
}

#[test]
fn unset_incoming_columns_leave_stored_values_alone() {
    let schema = key_value_schema();
    let mut stored = kv_record(&schema, "1", 10);

    // Incoming carries only the key
    let mut incoming = schema.new_record();
    schema
        .set(&mut incoming, 0, FieldValue::String("1".to_string()))
        .unwrap();

    schema.merge(&mut stored, incoming).unwrap();
    assert_eq!(stored.get(1), Some(&FieldValue::Long(10)));
}

#[test]
fn set_rejects_wrong_value_kind() {
    let schema = key_value_schema();
    let mut record = schema.new_record();

    let err = schema
        .set(&mut record, 1, FieldValue::String("oops".to_string()))
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::TypeMismatch {
            table: "kv".to_string(),
            column: "value".to_string(),
            expected: ColumnType::Long,
            found: ColumnType::String,
        }
    );

    let err = schema
        .set(&mut record, 5, FieldValue::Long(1))
        .unwrap_err();
    assert!(matches!(err, SchemaError::PositionOutOfRange { .. }));
}

#[test]
fn merge_rejects_misaligned_records() {
    let schema = key_value_schema();
    let other = RecordSchema::builder("wide", 3)
        .column(0, "a", ColumnType::String, MergePolicy::Keep)
        .column(1, "b", ColumnType::Long, MergePolicy::Overwrite)
        .column(2, "c", ColumnType::Long, MergePolicy::Overwrite)
        .build()
        .unwrap();

    let mut stored = kv_record(&schema, "1", 10);
    let incoming = other.new_record();

    let err = schema.merge(&mut stored, incoming).unwrap_err();
    assert!(matches!(err, SchemaError::Arity { expected: 2, found: 3, .. }));
}

#[test]
fn builder_enforces_dense_positions() {
    let err = RecordSchema::builder("t", 2)
        .column(0, "a", ColumnType::String, MergePolicy::Keep)
        .column(0, "b", ColumnType::Long, MergePolicy::Overwrite)
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateColumn { position: 0, .. }));

    let err = RecordSchema::builder("t", 2)
        .column(0, "a", ColumnType::String, MergePolicy::Keep)
        .column(2, "c", ColumnType::Long, MergePolicy::Overwrite)
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::PositionOutOfRange { position: 2, .. }));

    let err = RecordSchema::builder("t", 2)
        .column(0, "a", ColumnType::String, MergePolicy::Keep)
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::MissingColumn { position: 1, .. }));
}

#[test]
fn schema_exposes_ordered_column_list() {
    let schema = key_value_schema();
    let names: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["key", "value"]);
    assert_eq!(schema.capacity(), 2);
    assert_eq!(schema.table(), "kv");
}
