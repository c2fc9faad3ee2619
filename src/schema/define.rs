use super::{ColumnDefine, ColumnType, FieldValue, MergePolicy, Record};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema '{table}': column position {position} is outside capacity {capacity}")]
    PositionOutOfRange {
        table: String,
        position: usize,
        capacity: usize,
    },

    #[error("schema '{table}': column position {position} declared twice")]
    DuplicateColumn { table: String, position: usize },

    #[error("schema '{table}': column position {position} missing from declaration")]
    MissingColumn { table: String, position: usize },

    #[error("schema '{table}': column '{column}' expects {expected:?}, got {found:?}")]
    TypeMismatch {
        table: String,
        column: String,
        expected: ColumnType,
        found: ColumnType,
    },

    #[error("schema '{table}': record carries {found} values, schema declares {expected}")]
    Arity {
        table: String,
        expected: usize,
        found: usize,
    },
}

/// Declarative column list for one record kind, with per-column merge policy.
///
/// Built once through [`RecordSchema::builder`] and immutable afterwards.
/// Column positions must form a dense `0..capacity` range.
#[derive(Debug)]
pub struct RecordSchema {
    table: String,
    columns: Vec<ColumnDefine>,
}

impl RecordSchema {
    pub fn builder(table: impl Into<String>, capacity: usize) -> SchemaBuilder {
        SchemaBuilder {
            table: table.into(),
            capacity,
            columns: vec![None; capacity],
            error: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn capacity(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, position: usize) -> Option<&ColumnDefine> {
        self.columns.get(position)
    }

    /// Ordered column list, position 0 first
    pub fn columns(&self) -> &[ColumnDefine] {
        &self.columns
    }

    /// Fresh record aligned to this schema, all columns unset
    pub fn new_record(&self) -> Record {
        Record::with_capacity(self.columns.len())
    }

    /// Set one column, checking the value kind against the column type
    pub fn set(
        &self,
        record: &mut Record,
        position: usize,
        value: FieldValue,
    ) -> Result<(), SchemaError> {
        let column = self
            .columns
            .get(position)
            .ok_or_else(|| SchemaError::PositionOutOfRange {
                table: self.table.clone(),
                position,
                capacity: self.columns.len(),
            })?;
        if value.kind() != column.column_type {
            return Err(SchemaError::TypeMismatch {
                table: self.table.clone(),
                column: column.name.clone(),
                expected: column.column_type,
                found: value.kind(),
            });
        }
        record.set_value(position, Some(value));
        Ok(())
    }

    /// Merge `incoming` into `stored` column by column, applying each
    /// column's conflict policy. Only columns the incoming record actually
    /// carries participate; value kinds are checked on the way in.
    pub fn merge(&self, stored: &mut Record, mut incoming: Record) -> Result<(), SchemaError> {
        if incoming.len() != self.columns.len() || stored.len() != self.columns.len() {
            let found = if incoming.len() != self.columns.len() {
                incoming.len()
            } else {
                stored.len()
            };
            return Err(SchemaError::Arity {
                table: self.table.clone(),
                expected: self.columns.len(),
                found,
            });
        }

        for (position, column) in self.columns.iter().enumerate() {
            let Some(value) = incoming.take(position) else {
                continue;
            };
            if value.kind() != column.column_type {
                return Err(SchemaError::TypeMismatch {
                    table: self.table.clone(),
                    column: column.name.clone(),
                    expected: column.column_type,
                    found: value.kind(),
                });
            }
            match column.policy {
                MergePolicy::Overwrite => record_overwrite(stored, position, value),
                MergePolicy::Keep => {
                    if stored.get(position).is_none() {
                        record_overwrite(stored, position, value);
                    }
                }
            }
        }
        Ok(())
    }
}

fn record_overwrite(record: &mut Record, position: usize, value: FieldValue) {
    record.set_value(position, Some(value));
}

/// Builder enforcing the dense-position contract at `build` time
pub struct SchemaBuilder {
    table: String,
    capacity: usize,
    columns: Vec<Option<ColumnDefine>>,
    error: Option<SchemaError>,
}

impl SchemaBuilder {
    pub fn column(
        mut self,
        position: usize,
        name: impl Into<String>,
        column_type: ColumnType,
        policy: MergePolicy,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        if position >= self.capacity {
            self.error = Some(SchemaError::PositionOutOfRange {
                table: self.table.clone(),
                position,
                capacity: self.capacity,
            });
            return self;
        }
        if self.columns[position].is_some() {
            self.error = Some(SchemaError::DuplicateColumn {
                table: self.table.clone(),
                position,
            });
            return self;
        }
        self.columns[position] = Some(ColumnDefine::new(name, column_type, policy));
        self
    }

    pub fn build(self) -> Result<RecordSchema, SchemaError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let mut columns = Vec::with_capacity(self.capacity);
        for (position, column) in self.columns.into_iter().enumerate() {
            match column {
                Some(column) => columns.push(column),
                None => {
                    return Err(SchemaError::MissingColumn {
                        table: self.table,
                        position,
                    })
                }
            }
        }
        Ok(RecordSchema {
            table: self.table,
            columns,
        })
    }
}
