//! Column descriptors
//!
//! Columns are immutable value objects created once per schema declaration.
//! Dialect-specific SQL type names are the compiler's concern; the tags here
//! are dialect-neutral.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Dialect-neutral column data types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ColumnType {
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal { precision: u32, scale: u32 },
    Char { length: u32 },
    Varchar { length: u32 },
    Text,
    Bool,
    Date,
    Time,
    DateTime,
    Uuid,
    Blob,
}

impl ColumnType {
    /// The semantic type name reported in result metadata, used by clients
    /// for row hydration.
    pub fn semantic_type(&self) -> &'static str {
        match self {
            ColumnType::TinyInt
            | ColumnType::SmallInt
            | ColumnType::Int
            | ColumnType::BigInt
            | ColumnType::Float
            | ColumnType::Double
            | ColumnType::Decimal { .. } => "number",
            ColumnType::Char { .. } | ColumnType::Varchar { .. } | ColumnType::Text => "string",
            ColumnType::Bool => "boolean",
            ColumnType::Date | ColumnType::Time | ColumnType::DateTime => "date",
            ColumnType::Uuid => "uuid",
            ColumnType::Blob => "blob",
        }
    }
}

/// A table, view, or procedure-parameter column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name. Can't be empty.
    pub name: String,
    /// Dialect-neutral data type tag.
    pub data_type: ColumnType,
    /// Whether NULL is allowed. Defaults to false.
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    /// Default value literal, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Whether the column value is generated by the database.
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto_increment: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            default: None,
            auto_increment: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}
