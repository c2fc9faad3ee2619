use serde::{Deserialize, Serialize};

/// Value kind a column accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    String,
    Integer,
    Long,
    Boolean,
    Bytes,
    Double,
}

/// Conflict resolution when two records sharing an identity key merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergePolicy {
    /// Incoming value replaces the stored one
    Overwrite,
    /// First-written value is retained, later writes are ignored
    Keep,
}

/// One column of a record schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDefine {
    pub name: String,
    pub column_type: ColumnType,
    pub policy: MergePolicy,
}

impl ColumnDefine {
    pub fn new(name: impl Into<String>, column_type: ColumnType, policy: MergePolicy) -> Self {
        Self {
            name: name.into(),
            column_type,
            policy,
        }
    }
}
